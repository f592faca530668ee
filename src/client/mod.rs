//! Jira client modules
//!
//! The client is split into the HTTP layer ([`JiraApi`]), URL construction
//! ([`endpoint`]), the pagination engine ([`pagination`]) and the collection
//! operations built on top of it ([`JiraService`]).

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod page;
pub mod pagination;
pub mod service;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use api::JiraApi;
pub use config::ClientConfig;
pub use endpoint::{ApiFamily, Endpoint};
pub use error::ClientError;
pub use page::{Page, Record};
pub use pagination::{PageFetcher, Paginator, Strategy};
pub use service::JiraService;

pub type Result<T> = std::result::Result<T, ClientError>;
