//! Proxy protocol identification
//!
//! Every canonical node carries the lower-cased protocol tag it was declared
//! with. The tag is resolved into [`ProxyType`], the closed set of protocols
//! the link generator knows how to encode.

/// Represents the type of a proxy.
/// This is the canonical enum used for protocol dispatch across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Unknown,
    Vless,
    VMess,
    Shadowsocks,
    Trojan,
    HTTP,
    Hysteria,
    Hysteria2,
}

impl ProxyType {
    /// Resolve a protocol tag as found in Clash `type` or Sing-box `type`.
    ///
    /// Matching is case-insensitive; unrecognized tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "vless" => ProxyType::Vless,
            "vmess" => ProxyType::VMess,
            "ss" | "shadowsocks" => ProxyType::Shadowsocks,
            "trojan" => ProxyType::Trojan,
            "http" => ProxyType::HTTP,
            "hysteria" => ProxyType::Hysteria,
            "hysteria2" | "hy2" => ProxyType::Hysteria2,
            _ => ProxyType::Unknown,
        }
    }

    /// Human-readable protocol name.
    pub fn to_str(self) -> &'static str {
        match self {
            ProxyType::Vless => "VLESS",
            ProxyType::VMess => "VMess",
            ProxyType::Shadowsocks => "SS",
            ProxyType::Trojan => "Trojan",
            ProxyType::HTTP => "HTTP",
            ProxyType::Hysteria => "Hysteria",
            ProxyType::Hysteria2 => "Hysteria2",
            ProxyType::Unknown => "Unknown",
        }
    }
}

/// Placeholder display name for records without `name` or `tag`.
pub const UNNAMED_NODE: &str = "unnamed-node";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_is_case_insensitive() {
        assert_eq!(ProxyType::from_tag("Vless"), ProxyType::Vless);
        assert_eq!(ProxyType::from_tag("VMESS"), ProxyType::VMess);
        assert_eq!(ProxyType::from_tag(" ss "), ProxyType::Shadowsocks);
    }

    #[test]
    fn test_from_tag_aliases() {
        assert_eq!(ProxyType::from_tag("shadowsocks"), ProxyType::Shadowsocks);
        assert_eq!(ProxyType::from_tag("hy2"), ProxyType::Hysteria2);
        assert_eq!(ProxyType::from_tag("hysteria"), ProxyType::Hysteria);
        assert_eq!(ProxyType::from_tag("wireguard"), ProxyType::Unknown);
        assert_eq!(ProxyType::from_tag(""), ProxyType::Unknown);
    }
}
