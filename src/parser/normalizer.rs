use serde_yaml::Value;

use crate::models::{CanonicalNode, GrpcOpts, HttpOpts, RealityOpts, WsOpts, UNNAMED_NODE};
use crate::utils::yaml::{
    bool_field, field, first_str_field, is_truthy, mapping_field, port_field, scalar_to_string,
    str_field, string_list_field, string_list_map_field, string_map_field, u32_field,
};

/// Normalize one raw proxy record into a [`CanonicalNode`].
///
/// Accepts both the Clash shape (flat, kebab-case keys, `tls: true`) and the
/// Sing-box shape (`server_port`, `tag`, nested `tls` and `transport` objects).
/// Never fails: whatever cannot be read is simply absent in the output. A
/// non-mapping record yields a node with only the placeholder name.
pub fn normalize_node(raw: &Value) -> CanonicalNode {
    let kind = str_field(raw, "type").map(|t| t.to_lowercase());

    // vmess in Sing-box carries its cipher in `security`
    let cipher = if kind.as_deref() == Some("vmess") {
        first_str_field(raw, &["cipher", "method", "security"])
    } else {
        first_str_field(raw, &["cipher", "method"])
    };

    let mut node = CanonicalNode {
        name: first_str_field(raw, &["name", "tag"]).unwrap_or_else(|| UNNAMED_NODE.to_string()),
        kind,
        server: str_field(raw, "server"),
        port: port_field(raw, "port").or_else(|| port_field(raw, "server_port")),
        uuid: str_field(raw, "uuid"),
        password: str_field(raw, "password"),
        auth: str_field(raw, "auth"),
        auth_str: first_str_field(raw, &["auth-str", "auth_str"]),
        cipher,
        username: str_field(raw, "username"),
        network: str_field(raw, "network"),
        servername: str_field(raw, "servername"),
        sni: str_field(raw, "sni"),
        alpn: string_list_field(raw, "alpn"),
        skip_cert_verify: bool_field(raw, "skip-cert-verify"),
        reality_opts: mapping_field(raw, "reality-opts").map(|opts| RealityOpts {
            public_key: str_field(opts, "public-key"),
            short_id: str_field(opts, "short-id"),
        }),
        ws_opts: read_ws_opts(raw),
        http_opts: mapping_field(raw, "http-opts").map(|opts| HttpOpts {
            path: string_list_field(opts, "path"),
            headers: string_list_map_field(opts, "headers"),
        }),
        grpc_opts: mapping_field(raw, "grpc-opts").map(|opts| GrpcOpts {
            service_name: str_field(opts, "grpc-service-name"),
        }),
        flow: str_field(raw, "flow"),
        client_fingerprint: str_field(raw, "client-fingerprint"),
        alter_id: u32_field(raw, "alterId").or_else(|| u32_field(raw, "alter_id")),
        up: first_str_field(raw, &["up_mbps", "up"]),
        down: first_str_field(raw, &["down_mbps", "down"]),
        ..Default::default()
    };

    read_obfs(raw, &mut node);

    match field(raw, "tls") {
        Some(tls) if tls.is_mapping() => unnest_tls(tls, &mut node),
        Some(flag) => node.tls = is_truthy(flag),
        None => {}
    }

    if let Some(transport) = mapping_field(raw, "transport") {
        unnest_transport(transport, &mut node);
    }

    node
}

fn read_ws_opts(raw: &Value) -> Option<WsOpts> {
    if let Some(opts) = mapping_field(raw, "ws-opts") {
        return Some(WsOpts {
            path: str_field(opts, "path"),
            headers: string_map_field(opts, "headers"),
        });
    }

    // legacy Clash fields
    let path = str_field(raw, "ws-path");
    let headers = string_map_field(raw, "ws-headers");
    if path.is_none() && headers.is_empty() {
        None
    } else {
        Some(WsOpts { path, headers })
    }
}

/// Hysteria2 obfuscation: Sing-box nests it as `{type, password}`, Clash
/// writes `obfs` and `obfs-password` side by side.
fn read_obfs(raw: &Value, node: &mut CanonicalNode) {
    match field(raw, "obfs") {
        Some(obfs) if obfs.is_mapping() => {
            node.obfs = str_field(obfs, "type");
            node.obfs_password = str_field(obfs, "password");
        }
        Some(obfs) => {
            node.obfs = scalar_to_string(obfs);
            node.obfs_password = str_field(raw, "obfs-password");
        }
        None => node.obfs_password = str_field(raw, "obfs-password"),
    }
}

/// Hoist the Sing-box `tls` object into flat canonical fields and collapse
/// `tls` into a flag.
///
/// A present `enabled` decides the flag; a missing one counts as enabled.
fn unnest_tls(tls: &Value, node: &mut CanonicalNode) {
    if let Some(server_name) = str_field(tls, "server_name") {
        node.servername = Some(server_name);
    }

    let alpn = string_list_field(tls, "alpn");
    if !alpn.is_empty() {
        node.alpn = alpn;
    }

    if bool_field(tls, "insecure") {
        node.skip_cert_verify = true;
    }

    if let Some(reality) = mapping_field(tls, "reality") {
        if bool_field(reality, "enabled") {
            node.reality_opts = Some(RealityOpts {
                public_key: str_field(reality, "public_key"),
                short_id: str_field(reality, "short_id"),
            });
        }
    }

    if node.client_fingerprint.is_none() {
        node.client_fingerprint =
            mapping_field(tls, "utls").and_then(|utls| str_field(utls, "fingerprint"));
    }

    node.tls = field(tls, "enabled").map_or(true, is_truthy);
}

fn unnest_transport(transport: &Value, node: &mut CanonicalNode) {
    node.network = str_field(transport, "type");

    match node.network.as_deref() {
        Some("ws") => {
            node.ws_opts = Some(WsOpts {
                path: str_field(transport, "path"),
                headers: string_map_field(transport, "headers"),
            });
        }
        Some("grpc") => {
            node.grpc_opts = Some(GrpcOpts {
                service_name: str_field(transport, "service_name"),
            });
        }
        Some("http") => {
            let hosts = string_list_field(transport, "host");
            let mut opts = HttpOpts {
                path: str_field(transport, "path").into_iter().collect(),
                ..Default::default()
            };
            if !hosts.is_empty() {
                opts.headers.insert("Host".to_string(), hosts);
            }
            node.http_opts = Some(opts);
        }
        _ => {}
    }
}
