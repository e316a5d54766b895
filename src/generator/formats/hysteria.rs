use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CanonicalNode;
use crate::utils::url::{format_authority, url_encode, QueryParams};

static BANDWIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*[A-Za-z/]*\s*$").unwrap());

/// Strip the unit from a bandwidth hint: `"100 Mbps"` and `100` both give `"100"`.
/// Values that are not a number followed by a unit are passed through trimmed.
pub fn strip_bandwidth_unit(value: &str) -> String {
    match BANDWIDTH_RE.captures(value) {
        Some(caps) => caps[1].to_string(),
        None => value.trim().to_string(),
    }
}

fn set_bandwidth(params: &mut QueryParams, node: &CanonicalNode) {
    if let Some(up) = node.up.as_deref() {
        params.set("upmbps", strip_bandwidth_unit(up));
    }
    if let Some(down) = node.down.as_deref() {
        params.set("downmbps", strip_bandwidth_unit(down));
    }
}

/// Format: hysteria2://auth@server:port?sni=...&obfs=salamander&obfs-password=...#remark
pub fn proxy_to_hysteria2(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
) -> Option<String> {
    let auth = node.auth.as_deref().or(node.password.as_deref())?;

    let mut params = QueryParams::new();
    params.set_opt("sni", node.server_name());
    if node.skip_cert_verify {
        params.set("insecure", "1");
    }
    params.set_opt("obfs", node.obfs.as_deref());
    params.set_opt("obfs-password", node.obfs_password.as_deref());
    set_bandwidth(&mut params, node);
    if !node.alpn.is_empty() {
        params.set("alpn", node.alpn.join(","));
    }

    Some(format!(
        "hysteria2://{}@{}{}#{}",
        url_encode(auth),
        format_authority(server, port),
        params.to_query_suffix(),
        remark
    ))
}

/// Format: hysteria://auth@server:port?sni=...&upmbps=...&downmbps=...#remark
///
/// Hysteria v1 obfuscation is not representable in the common client
/// conventions, so it is left out.
pub fn proxy_to_hysteria(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
) -> Option<String> {
    let auth = node
        .auth_str
        .as_deref()
        .or(node.auth.as_deref())
        .or(node.password.as_deref())?;

    let mut params = QueryParams::new();
    params.set_opt("sni", node.server_name());
    if node.skip_cert_verify {
        params.set("insecure", "1");
    }
    if !node.alpn.is_empty() {
        params.set("alpn", node.alpn.join(","));
    }
    set_bandwidth(&mut params, node);

    Some(format!(
        "hysteria://{}@{}{}#{}",
        url_encode(auth),
        format_authority(server, port),
        params.to_query_suffix(),
        remark
    ))
}
