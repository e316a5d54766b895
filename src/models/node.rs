//! Canonical node definitions
//!
//! A [`CanonicalNode`] is the single shape every share-link encoder consumes.
//! It is produced by the normalizer from a raw Clash or Sing-box record and is
//! never modified afterwards.
//!
//! The struct serializes back into the Clash-flavored canonical vocabulary
//! (`skip-cert-verify`, `ws-opts`, `alterId`, ...), so feeding its serialized
//! form through the normalizer again yields the same node.

use serde::Serialize;
use std::collections::BTreeMap;

use super::proxy::ProxyType;

fn is_false(b: &bool) -> bool {
    !*b
}

/// VLESS Reality parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RealityOpts {
    #[serde(rename = "public-key", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(rename = "short-id", skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

/// Websocket transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WsOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl WsOpts {
    /// The `Host` header, matched case-insensitively.
    pub fn host(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("host"))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP/1.1 obfuscated transport options. Clash writes both fields as lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpOpts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,
}

impl HttpOpts {
    pub fn host(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("host"))
            .and_then(|(_, v)| v.first())
            .map(String::as_str)
    }

    pub fn first_path(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// gRPC transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrpcOpts {
    #[serde(rename = "grpc-service-name", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

/// The normalized, schema-independent representation of one proxy endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalNode {
    pub name: String,
    /// Lower-cased protocol tag as declared by the source document.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(rename = "auth-str", skip_serializing_if = "Option::is_none")]
    pub auth_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub tls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(rename = "skip-cert-verify", skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(rename = "reality-opts", skip_serializing_if = "Option::is_none")]
    pub reality_opts: Option<RealityOpts>,
    #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
    #[serde(rename = "http-opts", skip_serializing_if = "Option::is_none")]
    pub http_opts: Option<HttpOpts>,
    #[serde(rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOpts>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(rename = "client-fingerprint", skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,
    #[serde(rename = "alterId", skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
    #[serde(rename = "obfs-password", skip_serializing_if = "Option::is_none")]
    pub obfs_password: Option<String>,
    /// Upload bandwidth hint, unit suffix preserved as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
}

impl CanonicalNode {
    pub fn proxy_type(&self) -> ProxyType {
        self.kind
            .as_deref()
            .map(ProxyType::from_tag)
            .unwrap_or(ProxyType::Unknown)
    }

    /// Lower-cased protocol tag, empty when the record declared none.
    pub fn kind_str(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }

    /// TLS server name, `servername` taking precedence over `sni`.
    pub fn server_name(&self) -> Option<&str> {
        self.servername.as_deref().or(self.sni.as_deref())
    }

    pub fn network_is(&self, network: &str) -> bool {
        self.network.as_deref() == Some(network)
    }

    pub fn ws_path(&self) -> Option<&str> {
        self.ws_opts.as_ref().and_then(|ws| ws.path.as_deref())
    }

    pub fn ws_host(&self) -> Option<&str> {
        self.ws_opts.as_ref().and_then(WsOpts::host)
    }

    pub fn grpc_service_name(&self) -> Option<&str> {
        self.grpc_opts
            .as_ref()
            .and_then(|grpc| grpc.service_name.as_deref())
    }

    /// Reality public key, only meaningful when `tls` is on.
    pub fn reality_public_key(&self) -> Option<&str> {
        self.reality_opts
            .as_ref()
            .and_then(|reality| reality.public_key.as_deref())
    }

    /// Both `server` and `port`, the minimum needed to build any link.
    pub fn endpoint(&self) -> Option<(&str, u16)> {
        match (self.server.as_deref(), self.port) {
            (Some(server), Some(port)) => Some((server, port)),
            _ => None,
        }
    }
}
