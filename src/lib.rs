//! Read-only client for the Jira REST API
//!
//! Single resources are fetched as plain JSON; collections are walked page by
//! page under the pagination convention of their endpoint family and returned as
//! one ordered `Vec` of records.
//!
//! ```no_run
//! use jira_fetch::client::{ClientConfig, JiraService};
//!
//! # async fn run() -> jira_fetch::client::Result<()> {
//! let config = ClientConfig::new("https://company.atlassian.net", "jdoe", "api-token");
//! let service = JiraService::new(config)?;
//!
//! for issue in service.search("project = ABC").await? {
//!     println!("{}", issue["key"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod result;
