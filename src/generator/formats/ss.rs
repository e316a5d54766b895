use crate::generator::share_link::SsPasswordEncoding;
use crate::models::CanonicalNode;
use crate::utils::base64::base64_encode;
use crate::utils::url::{format_authority, url_encode};

/// Format: ss://BASE64(method:password)@server:port#remark
pub fn proxy_to_ss(
    node: &CanonicalNode,
    server: &str,
    port: u16,
    remark: &str,
    encoding: SsPasswordEncoding,
) -> Option<String> {
    let cipher = node.cipher.as_deref()?;
    let password = node.password.as_deref()?;

    let password = match encoding {
        SsPasswordEncoding::Percent => url_encode(password),
        SsPasswordEncoding::Raw => password.to_string(),
    };
    let user_info = base64_encode(&format!("{}:{}", cipher, password));

    Some(format!(
        "ss://{}@{}#{}",
        user_info,
        format_authority(server, port),
        remark
    ))
}
