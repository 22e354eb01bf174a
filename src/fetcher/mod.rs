pub mod client;
pub mod decode;
pub mod errors;
pub mod identity;

pub use client::fetch;
pub use errors::FetchError;
pub use identity::FetchPolicy;
