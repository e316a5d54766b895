//! URL encoding utilities

use url::form_urlencoded;

/// Encodes a string using URL encoding
///
/// Everything outside the unreserved set is percent-encoded, which makes the
/// result safe for userinfo segments and fragments alike.
///
/// # Examples
/// ```
/// use sublink::utils::url::url_encode;
///
/// let encoded = url_encode("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Ordered `application/x-www-form-urlencoded` query string.
///
/// Setting a key twice replaces the earlier value in place, so the key keeps
/// its first position.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Set `key` only when a value is present.
    pub fn set_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize, or an empty string when no parameter was set.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// `?<query>` when parameters exist, otherwise nothing.
    pub fn to_query_suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.encode())
        }
    }
}

/// `host:port`, bracketing IPv6 literals.
pub fn format_authority(server: &str, port: u16) -> String {
    if server.contains(':') && !server.starts_with('[') {
        format!("[{}]:{}", server, port)
    } else {
        format!("{}:{}", server, port)
    }
}
