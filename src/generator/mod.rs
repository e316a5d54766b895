pub mod formats;
pub mod share_link;

pub use share_link::{
    generate_links, node_to_link, EncodeError, GenerateOptions, SsPasswordEncoding,
};
