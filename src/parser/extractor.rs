use log::debug;
use serde_yaml::Value;

use super::normalizer::normalize_node;
use crate::models::CanonicalNode;

/// Sing-box outbound types that route traffic instead of proxying it.
const SINGBOX_CONTROL_TYPES: [&str; 5] = ["selector", "urltest", "direct", "block", "dns"];

/// Parse a subscription document and normalize every proxy record in it.
///
/// The container is detected from the document's shape, first match wins:
/// Clash `proxies` (or the legacy `Proxy` key), Sing-box `outbounds` with
/// routing outbounds removed, a bare sequence, then a `nodes` list.
///
/// Returns an empty vector when the text does not parse or no known container
/// is found, so callers can try another decoding of the same content.
pub fn explode_document(content: &str) -> Vec<CanonicalNode> {
    let document = match parse_document(content) {
        Some(doc) => doc,
        None => return Vec::new(),
    };

    locate_records(&document)
        .into_iter()
        .map(normalize_node)
        .collect()
}

/// YAML first; JSON as a fallback for documents YAML rejects (tab-indented JSON).
fn parse_document(content: &str) -> Option<Value> {
    let content = content.trim_start_matches('\u{feff}');

    match serde_yaml::from_str::<Value>(content) {
        Ok(doc) => Some(merged(doc)),
        Err(yaml_err) => {
            let trimmed = content.trim_start();
            if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
                debug!("Content is not a YAML document: {}", yaml_err);
                return None;
            }
            match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(json) => serde_yaml::to_value(json).ok().map(merged),
                Err(json_err) => {
                    debug!("Content is neither YAML nor JSON: {}", json_err);
                    None
                }
            }
        }
    }
}

/// Expand `<<: *anchor` merge keys so inherited fields reach the normalizer.
fn merged(mut document: Value) -> Value {
    if let Err(e) = document.apply_merge() {
        debug!("Failed to apply YAML merge keys: {}", e);
    }
    document
}

fn sequence_at<'a>(document: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    document.get(key).and_then(Value::as_sequence)
}

fn locate_records(document: &Value) -> Vec<&Value> {
    // Clash
    if let Some(proxies) =
        sequence_at(document, "proxies").or_else(|| sequence_at(document, "Proxy"))
    {
        debug!("Found Clash proxies list with {} entries", proxies.len());
        return proxies.iter().collect();
    }

    // Sing-box
    if let Some(outbounds) = sequence_at(document, "outbounds") {
        let records: Vec<&Value> = outbounds
            .iter()
            .filter(|ob| is_proxy_outbound(ob))
            .collect();
        debug!(
            "Found Sing-box outbounds: {} of {} are proxies",
            records.len(),
            outbounds.len()
        );
        return records;
    }

    if let Some(seq) = document.as_sequence() {
        return seq.iter().collect();
    }

    if let Some(nodes) = sequence_at(document, "nodes") {
        return nodes.iter().collect();
    }

    Vec::new()
}

fn is_proxy_outbound(outbound: &Value) -> bool {
    match outbound.get("type").and_then(Value::as_str) {
        Some(kind) if !kind.is_empty() => {
            let kind = kind.to_lowercase();
            !SINGBOX_CONTROL_TYPES.contains(&kind.as_str())
        }
        _ => false,
    }
}
