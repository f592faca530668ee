//! High-level Jira collection operations

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::{
    api::JiraApi,
    config::ClientConfig,
    endpoint::Endpoint,
    error::Result,
    page::Record,
    pagination::Strategy,
};

const OPEN_ISSUES_JQL: &str = "status != Closed";
const CLOSED_ISSUES_JQL: &str = "status = Closed";

/// High-level service for Jira collections
///
/// Each operation knows which endpoint family it talks to and therefore which
/// pagination convention and data key apply. The service is cheap to clone and
/// independent runs may proceed concurrently.
#[derive(Debug, Clone)]
pub struct JiraService {
    api: Arc<JiraApi>,
}

impl JiraService {
    /// Create a new Jira service
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = Arc::new(JiraApi::new(config)?);
        Ok(Self { api })
    }

    /// Create service from existing API client
    pub fn from_api(api: Arc<JiraApi>) -> Self {
        Self { api }
    }

    /// All agile boards
    #[instrument(skip(self))]
    pub async fn boards(&self) -> Result<Vec<Record>> {
        let endpoint = Endpoint::agile().segment("board");
        self.collect(&endpoint, "values", Strategy::OffsetIsLast, "boards")
            .await
    }

    /// Epics of a board
    #[instrument(skip(self))]
    pub async fn board_epics(&self, board_id: u64) -> Result<Vec<Record>> {
        let endpoint = Endpoint::agile()
            .segment("board")
            .segment(board_id)
            .segment("epic");
        self.collect(&endpoint, "values", Strategy::OffsetIsLast, "board_epics")
            .await
    }

    /// Issues on a board
    #[instrument(skip(self))]
    pub async fn board_issues(&self, board_id: u64) -> Result<Vec<Record>> {
        let endpoint = Endpoint::agile()
            .segment("board")
            .segment(board_id)
            .segment("issue");
        self.collect(&endpoint, "issues", Strategy::OffsetIsLast, "board_issues")
            .await
    }

    /// Issues of one epic on a board
    #[instrument(skip(self))]
    pub async fn board_epic_issues(&self, board_id: u64, epic_id: u64) -> Result<Vec<Record>> {
        let endpoint = Endpoint::agile()
            .segment("board")
            .segment(board_id)
            .segment("epic")
            .segment(epic_id)
            .segment("issue");
        self.collect(&endpoint, "issues", Strategy::OffsetIsLast, "board_epic_issues")
            .await
    }

    /// Worklogs of an issue
    #[instrument(skip(self))]
    pub async fn issue_worklogs(&self, issue_key: &str) -> Result<Vec<Record>> {
        let endpoint = Endpoint::platform()
            .segment("issue")
            .segment(issue_key)
            .segment("worklog");
        self.collect(&endpoint, "worklogs", Strategy::Cursor, "issue_worklogs")
            .await
    }

    /// Dashboards visible to the user
    #[instrument(skip(self))]
    pub async fn dashboards(&self) -> Result<Vec<Record>> {
        let endpoint = Endpoint::platform().segment("dashboard");
        self.collect(&endpoint, "dashboards", Strategy::Cursor, "dashboards")
            .await
    }

    /// Issues matching a JQL query
    #[instrument(skip(self))]
    pub async fn search(&self, jql: &str) -> Result<Vec<Record>> {
        info!("Searching issues");
        self.search_as(jql, "search").await
    }

    /// Issues not in the `Closed` status
    #[instrument(skip(self))]
    pub async fn open_issues(&self) -> Result<Vec<Record>> {
        self.search_as(OPEN_ISSUES_JQL, "open_issues").await
    }

    /// Issues in the `Closed` status
    #[instrument(skip(self))]
    pub async fn closed_issues(&self) -> Result<Vec<Record>> {
        self.search_as(CLOSED_ISSUES_JQL, "closed_issues").await
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Get reference to the underlying API client
    pub fn api(&self) -> &JiraApi {
        &self.api
    }

    async fn search_as(&self, jql: &str, operation: &str) -> Result<Vec<Record>> {
        let endpoint = Endpoint::platform().segment("search").query("jql", jql);
        self.collect(&endpoint, "issues", Strategy::CountThreshold, operation)
            .await
    }

    async fn collect(
        &self,
        endpoint: &Endpoint,
        data_key: &str,
        strategy: Strategy,
        operation: &str,
    ) -> Result<Vec<Record>> {
        match self.api.get_all(endpoint, data_key, strategy, operation).await {
            Ok(records) => {
                debug!(record_count = records.len(), operation, "Successfully fetched collection");
                Ok(records)
            },
            Err(e) => {
                error!(error = %e, operation, "Failed to fetch collection");
                Err(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::new("https://jira.example.com", "jdoe", "secret")
    }

    #[test]
    fn test_service_creation() {
        let service = JiraService::new(test_config());
        assert!(service.is_ok());
    }

    #[test]
    fn test_service_creation_invalid_config() {
        let config = ClientConfig::new("ftp://jira.example.com", "jdoe", "secret");
        let service = JiraService::new(config);
        assert!(service.is_err());
    }

    #[test]
    fn test_config_access() {
        let config = test_config();
        let service = JiraService::new(config.clone()).unwrap();

        assert_eq!(service.config().base_url, config.base_url);
        assert_eq!(service.config().username, config.username);
    }

    #[test]
    fn test_from_api_shares_client() {
        let api = Arc::new(JiraApi::new(test_config()).unwrap());
        let service = JiraService::from_api(Arc::clone(&api));

        assert_eq!(Arc::strong_count(&api), 2);
        assert_eq!(service.api().config().base_url, "https://jira.example.com/");
    }
}
