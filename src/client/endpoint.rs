//! URL construction for the Jira REST families

use std::fmt::Display;

use compact_str::{CompactString, ToCompactString};
use url::Url;

use super::error::{ClientError, Result};

/// REST API family and version an endpoint lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// `rest/api/2`
    Platform,
    /// `rest/agile/1.0`
    Agile,
    /// `rest/tempo-timesheets/3`
    Tempo,
}

impl ApiFamily {
    fn segments(self) -> [&'static str; 2] {
        match self {
            ApiFamily::Platform => ["api", "2"],
            ApiFamily::Agile => ["agile", "1.0"],
            ApiFamily::Tempo => ["tempo-timesheets", "3"],
        }
    }
}

/// A resource path relative to `<base>rest/<family>/<version>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    family: ApiFamily,
    segments: Vec<CompactString>,
    query: Vec<(CompactString, CompactString)>,
}

impl Endpoint {
    pub fn new(family: ApiFamily) -> Self {
        Self { family, segments: Vec::new(), query: Vec::new() }
    }

    pub fn platform() -> Self {
        Self::new(ApiFamily::Platform)
    }

    pub fn agile() -> Self {
        Self::new(ApiFamily::Agile)
    }

    pub fn tempo() -> Self {
        Self::new(ApiFamily::Tempo)
    }

    /// Append a path segment; it is percent-encoded when the URL is built
    pub fn segment(mut self, segment: impl Display) -> Self {
        self.segments.push(segment.to_compact_string());
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<CompactString>, value: impl Display) -> Self {
        self.query.push((key.into(), value.to_compact_string()));
        self
    }

    /// Resolve against the instance base URL
    pub fn url(&self, base_url: &str) -> Result<String> {
        let mut url = Url::parse(base_url).map_err(|_| ClientError::invalid_url(base_url))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::invalid_url(base_url))?
            .pop_if_empty()
            .push("rest")
            .extend(self.family.segments())
            .extend(self.segments.iter().map(CompactString::as_str));

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        Ok(url.into())
    }
}
