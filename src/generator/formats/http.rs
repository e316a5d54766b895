use crate::models::CanonicalNode;
use crate::utils::url::{format_authority, url_encode};

/// Format: http(s)://username:password@server:port#remark
///
/// The credentials segment is only written when both halves are present.
pub fn proxy_to_http(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
) -> Option<String> {
    let scheme = if node.tls { "https" } else { "http" };

    let auth = match (node.username.as_deref(), node.password.as_deref()) {
        (Some(username), Some(password)) => {
            format!("{}:{}@", url_encode(username), url_encode(password))
        }
        _ => String::new(),
    };

    Some(format!(
        "{}://{}{}#{}",
        scheme,
        auth,
        format_authority(server, port),
        remark
    ))
}
