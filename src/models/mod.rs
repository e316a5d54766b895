//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use sublink::models::{CanonicalNode, ProxyType};
//!
//! let mut node = CanonicalNode::default();
//! node.kind = Some("vless".to_string());
//! node.server = Some("example.com".to_string());
//! node.port = Some(443);
//!
//! assert_eq!(node.proxy_type(), ProxyType::Vless);
//! assert_eq!(node.endpoint(), Some(("example.com", 443)));
//! ```
//!
//! # Working with Option fields
//!
//! Almost every field of `CanonicalNode` is optional because subscription
//! providers omit whatever their client does not need:
//!
//! ```rust
//! use sublink::CanonicalNode;
//!
//! let node = CanonicalNode::default();
//! let cipher = node.cipher.as_deref().unwrap_or("auto");
//! assert_eq!(cipher, "auto");
//! ```

mod link;
mod node;
mod proxy;

pub use link::*;
pub use node::*;
pub use proxy::*;
