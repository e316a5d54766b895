use serde::Serialize;

use crate::generator::share_link::EncodeError;
use crate::models::CanonicalNode;
use crate::utils::base64::base64_encode;

/// The v2rayN share format. Field order is part of the format as seen by
/// users, so it is a struct rather than a map.
#[derive(Debug, Serialize)]
struct VmessShare<'a> {
    v: &'static str,
    ps: &'a str,
    add: &'a str,
    port: u16,
    id: &'a str,
    aid: u32,
    scy: &'a str,
    net: &'a str,
    #[serde(rename = "type")]
    header_type: &'static str,
    host: &'a str,
    path: &'a str,
    tls: &'static str,
    sni: &'a str,
}

/// Format: vmess://BASE64(JSON)
///
/// `host` and `path` come from `ws-opts` first and `http-opts` second; a gRPC
/// node carries its service name in `path`.
pub fn proxy_to_vmess(
    node: &CanonicalNode,
    server: &str,
    port: u16,
) -> Result<Option<String>, EncodeError> {
    let uuid = match node.uuid.as_deref() {
        Some(uuid) => uuid,
        None => return Ok(None),
    };

    let http_opts = node.http_opts.as_ref();
    let host = node
        .ws_host()
        .or_else(|| http_opts.and_then(|opts| opts.host()))
        .unwrap_or("");
    let path = node
        .ws_path()
        .or_else(|| http_opts.and_then(|opts| opts.first_path()))
        .or_else(|| {
            if node.network_is("grpc") {
                node.grpc_service_name()
            } else {
                None
            }
        })
        .unwrap_or("");

    let share = VmessShare {
        v: "2",
        ps: &node.name,
        add: server,
        port,
        id: uuid,
        aid: node.alter_id.unwrap_or(0),
        scy: node.cipher.as_deref().unwrap_or("auto"),
        net: node.network.as_deref().unwrap_or("tcp"),
        header_type: "none",
        host,
        path,
        tls: if node.tls { "tls" } else { "" },
        sni: node.server_name().unwrap_or(""),
    };

    let json = serde_json::to_string(&share)?;
    Ok(Some(format!("vmess://{}", base64_encode(&json))))
}
