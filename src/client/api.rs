//! Core HTTP client for the Jira REST API

use chrono::{DateTime, Local, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::{
    config::ClientConfig,
    endpoint::Endpoint,
    error::{ClientError, Result},
    page::Record,
    pagination::{PageFetcher, Paginator, Strategy},
};

/// Pure HTTP client for the Jira REST API
///
/// Every request is a single authenticated GET; nothing is retried.
#[derive(Debug, Clone)]
pub struct JiraApi {
    client: Client,
    config: ClientConfig,
}

impl JiraApi {
    /// Create a new Jira API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::transport("build_client", e))?;

        Ok(Self { client, config })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint against the configured base URL
    pub fn url(&self, endpoint: &Endpoint) -> Result<String> {
        endpoint.url(&self.config.base_url)
    }

    /// Fetch a single resource
    pub async fn get(&self, endpoint: &Endpoint, operation: &str) -> Result<Value> {
        let url = self.url(endpoint)?;
        self.get_json(&url, operation).await
    }

    /// Fetch every page of a collection, returning the items stored under `data_key`
    pub async fn get_all(
        &self,
        endpoint: &Endpoint,
        data_key: &str,
        strategy: Strategy,
        operation: &str,
    ) -> Result<Vec<Record>> {
        let seed = self.url(endpoint)?;
        Paginator::new(self, self.config.request.max_pages)
            .paginate(&seed, data_key, strategy, operation)
            .await
    }

    /// All issue types
    #[instrument(skip(self))]
    pub async fn issue_types(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("issuetype"), "issue_types")
            .await
    }

    #[instrument(skip(self))]
    pub async fn issue_type(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("issuetype").segment(id);
        self.get(&endpoint, "issue_type").await
    }

    #[instrument(skip(self))]
    pub async fn priorities(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("priority"), "priorities")
            .await
    }

    #[instrument(skip(self))]
    pub async fn priority(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("priority").segment(id);
        self.get(&endpoint, "priority").await
    }

    /// All visible projects, expanded with description, lead, url and keys
    #[instrument(skip(self))]
    pub async fn projects(&self) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("project")
            .query("expand", "description,lead,url,projectKeys");
        self.get(&endpoint, "projects").await
    }

    #[instrument(skip(self))]
    pub async fn project(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("project").segment(id);
        self.get(&endpoint, "project").await
    }

    #[instrument(skip(self))]
    pub async fn project_properties(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("project")
            .segment(id)
            .segment("properties");
        self.get(&endpoint, "project_properties").await
    }

    #[instrument(skip(self))]
    pub async fn project_types(&self) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("project").segment("type");
        self.get(&endpoint, "project_types").await
    }

    #[instrument(skip(self))]
    pub async fn project_type(&self, key: &str) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("project")
            .segment("type")
            .segment(key);
        self.get(&endpoint, "project_type").await
    }

    #[instrument(skip(self))]
    pub async fn project_categories(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("projectCategory"), "project_categories")
            .await
    }

    #[instrument(skip(self))]
    pub async fn project_category(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("projectCategory").segment(id);
        self.get(&endpoint, "project_category").await
    }

    #[instrument(skip(self))]
    pub async fn statuses(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("status"), "statuses")
            .await
    }

    #[instrument(skip(self))]
    pub async fn status(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("status").segment(id);
        self.get(&endpoint, "status").await
    }

    #[instrument(skip(self))]
    pub async fn status_categories(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("statuscategory"), "status_categories")
            .await
    }

    #[instrument(skip(self))]
    pub async fn status_category(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("statuscategory").segment(id);
        self.get(&endpoint, "status_category").await
    }

    /// Users whose name, display name or email matches `query`
    #[instrument(skip(self))]
    pub async fn find_users(&self, query: &str) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("user")
            .segment("search")
            .query("username", query);
        self.get(&endpoint, "find_users").await
    }

    #[instrument(skip(self))]
    pub async fn user(&self, username: &str) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("user")
            .query("username", username);
        self.get(&endpoint, "user").await
    }

    /// System and custom fields
    #[instrument(skip(self))]
    pub async fn fields(&self) -> Result<Value> {
        self.get(&Endpoint::platform().segment("field"), "fields")
            .await
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::platform().segment("dashboard").segment(id);
        self.get(&endpoint, "dashboard").await
    }

    /// One issue, expanded with its changelog and transitions
    #[instrument(skip(self))]
    pub async fn issue(&self, key: &str) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("issue")
            .segment(key)
            .query("expand", "changelog,transitions");
        self.get(&endpoint, "issue").await
    }

    /// Ids of worklogs changed since `since`
    #[instrument(skip(self))]
    pub async fn worklogs_updated_since(&self, since: DateTime<Utc>) -> Result<Value> {
        let endpoint = Endpoint::platform()
            .segment("worklog")
            .segment("updated")
            .query("since", since.timestamp_millis());
        self.get(&endpoint, "worklogs_updated_since").await
    }

    /// A worklog from the Tempo timesheets add-on
    #[instrument(skip(self))]
    pub async fn tempo_worklog(&self, id: &str) -> Result<Value> {
        let endpoint = Endpoint::tempo().segment("worklogs").segment(id);
        self.get(&endpoint, "tempo_worklog").await
    }

    #[instrument(skip(self))]
    pub async fn board(&self, id: u64) -> Result<Value> {
        let endpoint = Endpoint::agile().segment("board").segment(id);
        self.get(&endpoint, "board").await
    }

    /// Validate API connection and credentials
    #[instrument(skip(self))]
    pub async fn validate_connection(&self) -> Result<()> {
        let endpoint = Endpoint::platform().segment("myself");
        self.get(&endpoint, "validate_connection").await?;
        debug!("Connection validation successful");
        Ok(())
    }

    // Private helper methods

    /// Perform authenticated GET request and parse the JSON response
    async fn get_json(&self, url: &str, operation: &str) -> Result<Value> {
        debug!(%url, operation, "GET");
        let response = self
            .authenticated_request(url)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, operation, "Request failed without a response");
                ClientError::transport(operation, e)
            })?;

        self.handle_response(response, operation).await
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(self.config.username.as_str(), Some(self.config.password.as_str()))
    }

    /// Classify the status and parse the body
    async fn handle_response(&self, response: Response, operation: &str) -> Result<Value> {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(operation, e))?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        if status != StatusCode::OK {
            let err = ClientError::from_status(operation, status.as_u16());
            error!(status = status.as_u16(), path = %url_path, "{err}");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| ClientError::json_parse(operation, url_path, e))
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

impl PageFetcher for JiraApi {
    async fn fetch_page(&self, url: &str, operation: &str) -> Result<Value> {
        self.get_json(url, operation).await
    }
}
