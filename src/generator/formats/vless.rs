use crate::models::CanonicalNode;
use crate::utils::url::{format_authority, QueryParams};

/// Format: vless://uuid@server:port?type=ws&security=tls&sni=...#remark
///
/// TLS-scoped parameters (`security`, `pbk`, `sid`, `sni`, `alpn`,
/// `allowInsecure`, `flow`) are only written when TLS is on.
pub fn proxy_to_vless(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
) -> Option<String> {
    let uuid = node.uuid.as_deref()?;

    let mut params = QueryParams::new();
    params.set_opt("type", node.network.as_deref());

    if node.tls {
        match node.reality_public_key() {
            Some(public_key) => {
                params.set("security", "reality");
                params.set("pbk", public_key);
                params.set_opt(
                    "sid",
                    node.reality_opts
                        .as_ref()
                        .and_then(|reality| reality.short_id.as_deref()),
                );
            }
            None => params.set("security", "tls"),
        }
        params.set_opt("sni", node.server_name());
        if !node.alpn.is_empty() {
            params.set("alpn", node.alpn.join(","));
        }
        if node.skip_cert_verify {
            params.set("allowInsecure", "1");
        }
        params.set_opt("flow", node.flow.as_deref());
    }

    params.set_opt("fp", node.client_fingerprint.as_deref());

    if node.network_is("ws") {
        params.set_opt("path", node.ws_path());
        params.set_opt("host", node.ws_host());
    }
    if node.network_is("grpc") {
        params.set_opt("serviceName", node.grpc_service_name());
    }

    Some(format!(
        "vless://{}@{}{}#{}",
        uuid,
        format_authority(server, port),
        params.to_query_suffix(),
        remark
    ))
}
