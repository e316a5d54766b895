use crate::models::CanonicalNode;
use crate::utils::url::{format_authority, url_encode, QueryParams};

/// Format: trojan://password@server:port?sni=sni&allowInsecure=1#remark
pub fn proxy_to_trojan(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
) -> Option<String> {
    let password = node.password.as_deref()?;

    let mut params = QueryParams::new();
    params.set_opt("sni", node.server_name());
    if !node.alpn.is_empty() {
        params.set("alpn", node.alpn.join(","));
    }
    if node.skip_cert_verify {
        params.set("allowInsecure", "1");
    }

    if node.network_is("ws") {
        params.set("type", "ws");
        params.set_opt("path", node.ws_path());
        params.set_opt("host", node.ws_host());
    } else if node.network_is("grpc") {
        params.set("type", "grpc");
        params.set_opt("serviceName", node.grpc_service_name());
    }

    Some(format!(
        "trojan://{}@{}{}#{}",
        url_encode(password),
        format_authority(server, port),
        params.to_query_suffix(),
        remark
    ))
}
