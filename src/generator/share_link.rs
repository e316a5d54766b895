use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use super::formats::{http, hysteria, ss, trojan, vless, vmess};
use crate::models::{CanonicalNode, LinkInfo, LinkResult, ProxyType};
use crate::utils::url::url_encode;

/// How the Shadowsocks password is written inside the base64 user info.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsPasswordEncoding {
    /// Percent-encode the password before joining it with the cipher, so
    /// passwords containing `:` or `@` survive clients that split naively.
    #[default]
    Percent,
    /// Use the password verbatim.
    Raw,
}

/// Knobs that change how links are rendered.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub ss_password_encoding: SsPasswordEncoding,
}

/// A node that had every required field but still could not be encoded.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize vmess config: {0}")]
    VmessJson(#[from] serde_json::Error),
}

/// Convert a single node into a share link.
///
/// Returns `Ok(None)` when the node cannot produce a link: missing server or
/// port, unknown protocol, or missing protocol credentials.
pub fn node_to_link(
    node: &CanonicalNode,
    options: &GenerateOptions,
) -> Result<Option<LinkResult>, EncodeError> {
    let (server, port) = match node.endpoint() {
        Some(endpoint) => endpoint,
        None => return Ok(None),
    };
    let remark = url_encode(&node.name);

    let link = match node.proxy_type() {
        ProxyType::Vless => vless::proxy_to_vless(node, server, port, &remark),
        ProxyType::VMess => vmess::proxy_to_vmess(node, server, port)?,
        ProxyType::Shadowsocks => {
            ss::proxy_to_ss(node, server, port, &remark, options.ss_password_encoding)
        }
        ProxyType::Trojan => trojan::proxy_to_trojan(node, server, port, &remark),
        ProxyType::Hysteria2 => hysteria::proxy_to_hysteria2(node, server, port, &remark),
        ProxyType::Hysteria => hysteria::proxy_to_hysteria(node, server, port, &remark),
        ProxyType::HTTP => http::proxy_to_http(node, server, port, &remark),
        ProxyType::Unknown => None,
    };

    Ok(link.map(|link| LinkResult {
        link,
        info: LinkInfo {
            name: node.name.clone(),
            kind: node.kind_str().to_string(),
            server: server.to_string(),
            port,
        },
    }))
}

/// Convert nodes to share links, preserving input order.
///
/// Nodes that cannot produce a link are skipped. An encoding failure on one
/// node is logged and does not affect the others.
pub fn generate_links(nodes: &[CanonicalNode], options: &GenerateOptions) -> Vec<LinkResult> {
    let mut results = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node_to_link(node, options) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => debug!(
                "Skipping node '{}' ({}, type '{}'): incomplete or unsupported",
                node.name,
                node.proxy_type().to_str(),
                node.kind_str()
            ),
            Err(e) => warn!(
                "Failed to generate {} link for node '{}': {}",
                node.proxy_type().to_str(),
                node.name,
                e
            ),
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: &str) -> CanonicalNode {
        CanonicalNode {
            name: "n".to_string(),
            kind: Some(kind.to_string()),
            server: Some("example.com".to_string()),
            port: Some(443),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_endpoint_is_skipped() {
        let mut n = node("http");
        n.port = None;
        assert!(node_to_link(&n, &GenerateOptions::default()).unwrap().is_none());

        let mut n = node("http");
        n.server = None;
        assert!(node_to_link(&n, &GenerateOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_unknown_protocol_is_skipped() {
        let n = node("wireguard");
        assert!(node_to_link(&n, &GenerateOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_info_carries_declared_type() {
        let result = node_to_link(&node("http"), &GenerateOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(result.info.kind, "http");
        assert_eq!(result.info.server, "example.com");
        assert_eq!(result.info.port, 443);
        assert_eq!(result.link, "http://example.com:443#n");
    }

    #[test]
    fn test_generate_links_keeps_order_and_skips_incomplete() {
        let mut vless_without_uuid = node("vless");
        vless_without_uuid.name = "skip".to_string();
        let mut first = node("http");
        first.name = "first".to_string();
        let mut last = node("http");
        last.name = "last".to_string();

        let results = generate_links(
            &[first, vless_without_uuid, last],
            &GenerateOptions::default(),
        );
        let names: Vec<&str> = results.iter().map(|r| r.info.name.as_str()).collect();
        assert_eq!(names, vec!["first", "last"]);
    }
}
