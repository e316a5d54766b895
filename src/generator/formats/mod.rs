//! One share-link encoder per protocol.
//!
//! Each encoder returns `None` when the node lacks the protocol's mandatory
//! credentials.

pub mod http;
pub mod hysteria;
pub mod ss;
pub mod trojan;
pub mod vless;
pub mod vmess;
