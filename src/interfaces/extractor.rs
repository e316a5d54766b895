use linked_hash_map::LinkedHashMap;
use log::{debug, info};
use thiserror::Error;

use crate::generator::{generate_links, GenerateOptions};
use crate::models::{CanonicalNode, LinkResult};
use crate::parser::explode_document;
use crate::utils::base64::base64_decode_lenient;
use crate::utils::http_std::{web_get_async, FetchError, FetchOptions};

/// Where the subscription content comes from.
#[derive(Debug, Clone)]
pub enum SubscriptionSource {
    Url(String),
    Upload(Vec<u8>),
    Inline(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no {0} provided")]
    MissingInput(&'static str),
    #[error(
        "no valid nodes found; make sure the subscription returns a Clash/Sing-box config or a node list"
    )]
    NoNodes,
    #[error("found {nodes_found} nodes but none could be turned into a link; required fields may be missing")]
    NoLinks { nodes_found: usize },
    #[error("failed to fetch subscription: {0}")]
    Fetch(#[from] FetchError),
}

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub nodes_found: usize,
    pub results: Vec<LinkResult>,
    /// Link count per protocol label, in order of first appearance
    pub protocol_counts: LinkedHashMap<String, usize>,
}

impl ExtractOutcome {
    fn new(nodes_found: usize, results: Vec<LinkResult>) -> Self {
        let mut protocol_counts = LinkedHashMap::new();
        for result in &results {
            *protocol_counts
                .entry(result.info.kind.to_uppercase())
                .or_insert(0) += 1;
        }
        ExtractOutcome {
            nodes_found,
            results,
            protocol_counts,
        }
    }

    pub fn all_links(&self) -> String {
        self.results
            .iter()
            .map(|r| r.link.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `"VLESS: 2, SS: 1"`
    pub fn summary(&self) -> String {
        self.protocol_counts
            .iter()
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn message(&self) -> String {
        format!("Extracted {} nodes", self.results.len())
    }
}

/// Read the raw subscription text from `source`.
pub async fn load_source(
    source: &SubscriptionSource,
    fetch: &FetchOptions,
) -> Result<String, ExtractError> {
    match source {
        SubscriptionSource::Url(url) => {
            let url = url.trim();
            if url.is_empty() {
                return Err(ExtractError::MissingInput("url"));
            }
            Ok(web_get_async(url, fetch).await?)
        }
        SubscriptionSource::Upload(bytes) => {
            if bytes.is_empty() {
                return Err(ExtractError::MissingInput("file"));
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        SubscriptionSource::Inline(text) => {
            if text.trim().is_empty() {
                return Err(ExtractError::MissingInput("input"));
            }
            Ok(text.clone())
        }
    }
}

/// Parse `content` into nodes, retrying once on its base64-decoded form when
/// the text itself yields nothing.
pub fn extract_nodes(content: &str) -> Vec<CanonicalNode> {
    let nodes = explode_document(content);
    if !nodes.is_empty() || content.trim().is_empty() {
        return nodes;
    }

    match base64_decode_lenient(content.trim()) {
        Some(decoded) => {
            let nodes = explode_document(&decoded);
            debug!("Base64 fallback found {} nodes", nodes.len());
            nodes
        }
        None => nodes,
    }
}

/// Run the whole pipeline over already loaded content.
pub fn extract_links(
    content: &str,
    options: &GenerateOptions,
) -> Result<ExtractOutcome, ExtractError> {
    let nodes = extract_nodes(content);
    if nodes.is_empty() {
        return Err(ExtractError::NoNodes);
    }

    let results = generate_links(&nodes, options);
    if results.is_empty() {
        return Err(ExtractError::NoLinks {
            nodes_found: nodes.len(),
        });
    }

    let outcome = ExtractOutcome::new(nodes.len(), results);
    info!(
        "Generated {} links from {} nodes ({})",
        outcome.results.len(),
        outcome.nodes_found,
        outcome.summary()
    );
    Ok(outcome)
}

/// Load `source` and run the pipeline over it.
pub async fn extract_from_source(
    source: &SubscriptionSource,
    fetch: &FetchOptions,
    options: &GenerateOptions,
) -> Result<ExtractOutcome, ExtractError> {
    let content = load_source(source, fetch).await?;
    extract_links(&content, options)
}
