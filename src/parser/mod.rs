//! Subscription document parsing
//!
//! [`explode_document`] finds the proxy records inside a Clash or Sing-box
//! document; [`normalize_node`] maps each record onto a `CanonicalNode`.

pub mod extractor;
pub mod normalizer;

pub use extractor::explode_document;
pub use normalizer::normalize_node;
