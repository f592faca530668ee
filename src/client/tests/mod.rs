//! Test utilities and common test fixtures for client modules

use serde_json::{json, Value};

use crate::client::config::ClientConfig;


/// `Authorization` header for `jdoe:secret`
pub const BASIC_AUTH: &str = "Basic amRvZTpzZWNyZXQ=";

/// Create a sample board record
pub fn sample_board_json(id: u64) -> Value {
    json!({
        "id": id,
        "self": format!("https://jira.example.com/rest/agile/1.0/board/{id}"),
        "name": format!("Board {id}"),
        "type": "scrum"
    })
}

/// Create a sample issue record
pub fn sample_issue_json(id: u64) -> Value {
    json!({
        "id": id.to_string(),
        "key": format!("PROJ-{id}"),
        "fields": {
            "summary": format!("Issue {id}"),
            "status": { "name": "Open" }
        }
    })
}

/// Create a sample worklog record
pub fn sample_worklog_json(id: u64) -> Value {
    json!({
        "id": id.to_string(),
        "author": { "name": "jdoe" },
        "timeSpentSeconds": 3600,
        "started": "2023-01-01T09:00:00.000+0000"
    })
}

/// One page of an agile (`isLast`) collection
pub fn agile_page_json(start_at: u64, max_results: u64, is_last: bool, values: Vec<Value>) -> Value {
    json!({
        "startAt": start_at,
        "maxResults": max_results,
        "total": 0,
        "isLast": is_last,
        "values": values
    })
}

/// One page of a search result
pub fn search_page_json(start_at: u64, max_results: u64, total: u64, issues: Vec<Value>) -> Value {
    json!({
        "expand": "schema,names",
        "startAt": start_at,
        "maxResults": max_results,
        "total": total,
        "issues": issues
    })
}

/// One page of an issue worklog list linked by `next`
pub fn worklog_page_json(next: Option<String>, worklogs: Vec<Value>) -> Value {
    json!({
        "startAt": 0,
        "maxResults": worklogs.len(),
        "total": 10,
        "next": next,
        "worklogs": worklogs
    })
}

/// Create Jira API error response
pub fn jira_error_response(message: &str) -> Value {
    json!({
        "errorMessages": [message],
        "errors": {}
    })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url(), "jdoe", "secret")
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_creation() {
        let board = sample_board_json(7);
        assert_eq!(board["id"], 7);
        assert_eq!(board["name"], "Board 7");

        let issue = sample_issue_json(3);
        assert_eq!(issue["key"], "PROJ-3");
    }

    #[test]
    fn test_page_fixtures() {
        let page = agile_page_json(50, 50, true, vec![sample_board_json(1)]);
        assert_eq!(page["isLast"], true);
        assert_eq!(page["values"].as_array().unwrap().len(), 1);

        let page = worklog_page_json(None, vec![sample_worklog_json(1), sample_worklog_json(2)]);
        assert!(page["next"].is_null());
        assert_eq!(page["maxResults"], 2);
    }

    #[test]
    fn test_error_responses() {
        let error = jira_error_response("Board does not exist");
        assert_eq!(error["errorMessages"][0], "Board does not exist");
    }
}
