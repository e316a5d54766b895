pub mod extractor;

pub use extractor::{
    extract_from_source, extract_links, extract_nodes, load_source, ExtractError,
    ExtractOutcome, SubscriptionSource,
};
