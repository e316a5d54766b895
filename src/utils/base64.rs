use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Reverses a URL-safe Base64 string to standard Base64 format.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

/// Decodes Base64 the way subscription providers actually serve it.
///
/// Whitespace and line breaks are dropped, the URL-safe alphabet is accepted
/// and missing padding is restored. Invalid UTF-8 in the payload is replaced
/// rather than rejected.
///
/// # Returns
/// The decoded string, or `None` if the input is empty or not Base64.
pub fn base64_decode_lenient(input: &str) -> Option<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let mut standard = url_safe_base64_reverse(compact.trim_end_matches('='));
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    general_purpose::STANDARD
        .decode(standard)
        .ok()
        .map(|decoded| String::from_utf8_lossy(&decoded).into_owned())
}
