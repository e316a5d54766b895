pub mod base64;
pub mod http_std;
pub mod url;
pub mod yaml;

pub use http_std::{web_get_async, FetchError, FetchOptions};
