pub mod analysis;
pub mod api;
pub mod aspects;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod recommend;
pub mod scrape;
pub mod sentiment;
