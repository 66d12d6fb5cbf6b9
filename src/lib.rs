pub mod archive_list;
pub mod asset_source;
pub mod config;
pub mod content;
pub mod content_cache;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod manifest_store;
pub mod navigation;
pub mod post_resolver;
pub mod route;
pub mod server;
pub mod view;
mod test_data;
