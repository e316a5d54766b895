use sublink::generator::{generate_links, GenerateOptions, SsPasswordEncoding};
use sublink::utils::base64::base64_decode_lenient;
use sublink::{explode_document, CanonicalNode};

fn links_of(document: &str, options: &GenerateOptions) -> Vec<String> {
    let nodes = explode_document(document);
    generate_links(&nodes, options)
        .into_iter()
        .map(|result| result.link)
        .collect()
}

fn single_link(document: &str) -> String {
    let links = links_of(document, &GenerateOptions::default());
    assert_eq!(links.len(), 1, "expected exactly one link, got {:?}", links);
    links.into_iter().next().unwrap()
}

/// Decoded `vmess://` payload
fn vmess_json(link: &str) -> (String, serde_json::Value) {
    let payload = link.strip_prefix("vmess://").expect("not a vmess link");
    let json = base64_decode_lenient(payload).expect("payload is not base64");
    let value = serde_json::from_str(&json).expect("payload is not JSON");
    (json, value)
}

#[cfg(test)]
mod share_link_tests {
    use super::*;

    #[test]
    fn test_vless_ws_tls() {
        let link = single_link(
            r#"
proxies:
  - name: ws node
    type: vless
    server: v.example.com
    port: 443
    uuid: 11111111-2222-3333-4444-555555555555
    network: ws
    tls: true
    servername: sni.example.com
    ws-opts:
      path: /x
      headers:
        Host: h
"#,
        );
        assert_eq!(
            link,
            "vless://11111111-2222-3333-4444-555555555555@v.example.com:443\
             ?type=ws&security=tls&sni=sni.example.com&path=%2Fx&host=h#ws%20node"
        );
    }

    #[test]
    fn test_vless_reality_from_singbox() {
        let link = single_link(
            r#"{
  "outbounds": [
    {
      "type": "vless",
      "tag": "reality",
      "server": "r.example.com",
      "server_port": 443,
      "uuid": "u-1",
      "flow": "xtls-rprx-vision",
      "tls": {
        "enabled": true,
        "server_name": "www.microsoft.com",
        "utls": { "enabled": true, "fingerprint": "chrome" },
        "reality": { "enabled": true, "public_key": "PBK", "short_id": "ab" }
      }
    }
  ]
}"#,
        );
        assert_eq!(
            link,
            "vless://u-1@r.example.com:443?security=reality&pbk=PBK&sid=ab\
             &sni=www.microsoft.com&flow=xtls-rprx-vision&fp=chrome#reality"
        );
    }

    #[test]
    fn test_vless_tls_params_need_tls() {
        let link = single_link(
            "proxies:\n  - {name: plain, type: vless, server: p.example.com, port: 80, uuid: u, sni: s.example.com, flow: xtls-rprx-vision}\n",
        );
        assert_eq!(link, "vless://u@p.example.com:80#plain");
    }

    #[test]
    fn test_vless_grpc_with_tls_options() {
        let link = single_link(
            r#"
proxies:
  - name: vg
    type: vless
    server: g.example.com
    port: 443
    uuid: u
    network: grpc
    tls: true
    servername: g.example.com
    alpn: "h2, http/1.1"
    skip-cert-verify: true
    client-fingerprint: chrome
    grpc-opts:
      grpc-service-name: svc
"#,
        );
        assert_eq!(
            link,
            "vless://u@g.example.com:443?type=grpc&security=tls&sni=g.example.com\
             &alpn=h2%2Chttp%2F1.1&allowInsecure=1&fp=chrome&serviceName=svc#vg"
        );
    }

    #[test]
    fn test_mixed_case_type_dispatches() {
        let link = single_link(
            "proxies:\n  - {name: m, type: Vless, server: m.example.com, port: 443, uuid: u}\n",
        );
        assert!(link.starts_with("vless://u@m.example.com:443"));

        let mut node = CanonicalNode::default();
        node.kind = Some("Vless".to_string());
        node.server = Some("m.example.com".to_string());
        node.port = Some(443);
        node.uuid = Some("u".to_string());
        let results = generate_links(&[node], &GenerateOptions::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].link.starts_with("vless://"));
    }

    #[test]
    fn test_vmess_ws() {
        let link = single_link(
            r#"
proxies:
  - name: vm
    type: vmess
    server: m.example.com
    port: 8443
    uuid: u-2
    alterId: 0
    cipher: auto
    network: ws
    tls: true
    servername: m.example.com
    ws-opts:
      path: /ray
      headers:
        Host: cdn.example.com
"#,
        );
        let (json, value) = vmess_json(&link);
        assert!(json.starts_with(r#"{"v":"2","ps":"vm","add":"m.example.com","port":8443"#));
        assert_eq!(value["id"], "u-2");
        assert_eq!(value["aid"], 0);
        assert_eq!(value["scy"], "auto");
        assert_eq!(value["net"], "ws");
        assert_eq!(value["type"], "none");
        assert_eq!(value["host"], "cdn.example.com");
        assert_eq!(value["path"], "/ray");
        assert_eq!(value["tls"], "tls");
        assert_eq!(value["sni"], "m.example.com");
    }

    #[test]
    fn test_vmess_grpc_from_singbox_with_defaults() {
        let link = single_link(
            r#"{"outbounds":[{"type":"vmess","tag":"g","server":"g.example.com","server_port":443,
                "uuid":"u-3","security":"aes-128-gcm",
                "transport":{"type":"grpc","service_name":"svc"}}]}"#,
        );
        let (_, value) = vmess_json(&link);
        assert_eq!(value["scy"], "aes-128-gcm");
        assert_eq!(value["net"], "grpc");
        assert_eq!(value["path"], "svc");
        assert_eq!(value["host"], "");
        assert_eq!(value["tls"], "");
        assert_eq!(value["aid"], 0);
    }

    #[test]
    fn test_vmess_http_opts() {
        let link = single_link(
            r#"
proxies:
  - name: h2
    type: vmess
    server: h.example.com
    port: 80
    uuid: u-4
    network: http
    http-opts:
      path: [/a, /b]
      headers:
        Host: [one.example.com, two.example.com]
"#,
        );
        let (_, value) = vmess_json(&link);
        assert_eq!(value["net"], "http");
        assert_eq!(value["path"], "/a");
        assert_eq!(value["host"], "one.example.com");
        assert_eq!(value["scy"], "auto");
    }

    #[test]
    fn test_vmess_requires_uuid() {
        let links = links_of(
            "proxies:\n  - {name: x, type: vmess, server: x.example.com, port: 443}\n",
            &GenerateOptions::default(),
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_ss_password_encoding() {
        let document = r#"
proxies:
  - name: ss node
    type: ss
    server: s.example.com
    port: 8388
    cipher: aes-256-gcm
    password: "p@ss:word"
"#;
        let user_info = |link: &str| {
            let rest = link.strip_prefix("ss://").unwrap();
            let (encoded, _) = rest.split_once('@').unwrap();
            base64_decode_lenient(encoded).unwrap()
        };

        let percent = links_of(document, &GenerateOptions::default());
        assert_eq!(user_info(&percent[0]), "aes-256-gcm:p%40ss%3Aword");
        assert!(percent[0].ends_with("@s.example.com:8388#ss%20node"));

        let raw = links_of(
            document,
            &GenerateOptions {
                ss_password_encoding: SsPasswordEncoding::Raw,
            },
        );
        assert_eq!(user_info(&raw[0]), "aes-256-gcm:p@ss:word");
    }

    #[test]
    fn test_ss_from_singbox_method() {
        let link = single_link(
            r#"{"outbounds":[{"type":"shadowsocks","tag":"sb","server":"1.2.3.4","server_port":8388,
                "method":"chacha20-ietf-poly1305","password":"pw"}]}"#,
        );
        let encoded = link
            .strip_prefix("ss://")
            .and_then(|rest| rest.split_once('@'))
            .map(|(encoded, _)| encoded)
            .unwrap();
        assert_eq!(
            base64_decode_lenient(encoded).unwrap(),
            "chacha20-ietf-poly1305:pw"
        );
        assert!(link.ends_with("@1.2.3.4:8388#sb"));
    }

    #[test]
    fn test_trojan_grpc() {
        let link = single_link(
            r#"
proxies:
  - name: t
    type: trojan
    server: t.example.com
    port: 443
    password: "pa ss"
    sni: t.example.com
    skip-cert-verify: true
    network: grpc
    grpc-opts:
      grpc-service-name: svc
"#,
        );
        assert_eq!(
            link,
            "trojan://pa%20ss@t.example.com:443\
             ?sni=t.example.com&allowInsecure=1&type=grpc&serviceName=svc#t"
        );
    }

    #[test]
    fn test_trojan_ws_with_alpn() {
        let link = single_link(
            r#"
proxies:
  - name: tw
    type: trojan
    server: t.example.com
    port: 443
    password: pw
    sni: t.example.com
    alpn: [h2, http/1.1]
    network: ws
    ws-opts:
      path: /tr
      headers:
        Host: cdn.example.com
"#,
        );
        assert_eq!(
            link,
            "trojan://pw@t.example.com:443?sni=t.example.com&alpn=h2%2Chttp%2F1.1\
             &type=ws&path=%2Ftr&host=cdn.example.com#tw"
        );
    }

    #[test]
    fn test_hysteria2_clash_flat_obfs() {
        let link = single_link(
            r#"
proxies:
  - name: hf
    type: hysteria2
    server: h.example.com
    port: 443
    password: pw
    sni: h.example.com
    obfs: salamander
    obfs-password: ob
"#,
        );
        assert_eq!(
            link,
            "hysteria2://pw@h.example.com:443?sni=h.example.com&obfs=salamander&obfs-password=ob#hf"
        );
    }

    #[test]
    fn test_hysteria2_from_singbox() {
        let link = single_link(
            r#"{"outbounds":[{"type":"hysteria2","tag":"hy2","server":"h.example.com","server_port":8443,
                "password":"secret","up_mbps":100,"down_mbps":200,
                "obfs":{"type":"salamander","password":"ob"},
                "tls":{"enabled":true,"server_name":"h.example.com","insecure":true,"alpn":["h3"]}}]}"#,
        );
        assert_eq!(
            link,
            "hysteria2://secret@h.example.com:8443?sni=h.example.com&insecure=1\
             &obfs=salamander&obfs-password=ob&upmbps=100&downmbps=200&alpn=h3#hy2"
        );
    }

    #[test]
    fn test_hysteria_v1() {
        let link = single_link(
            r#"
proxies:
  - name: hy1
    type: hysteria
    server: 1.2.3.4
    port: 443
    auth-str: tok
    up: "30 Mbps"
    down: "100 Mbps"
    sni: x.example.com
"#,
        );
        assert_eq!(
            link,
            "hysteria://tok@1.2.3.4:443?sni=x.example.com&upmbps=30&downmbps=100#hy1"
        );
    }

    #[test]
    fn test_http_with_tls_and_ipv6() {
        let link = single_link(
            r#"
proxies:
  - name: h
    type: http
    server: "2001:db8::1"
    port: 8080
    username: u
    password: "p w"
    tls: true
"#,
        );
        assert_eq!(link, "https://u:p%20w@[2001:db8::1]:8080#h");
    }

    #[test]
    fn test_http_without_complete_credentials() {
        let link = single_link(
            "proxies:\n  - {name: h, type: http, server: h.example.com, port: 3128, username: u}\n",
        );
        assert_eq!(link, "http://h.example.com:3128#h");
    }
}
