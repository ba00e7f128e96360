//! Document sources
//!
//! `WikipediaSource` fetches plain-text page extracts from the MediaWiki
//! action API by exact title. `DirectorySource` reads pages saved as
//! `<dir>/<title>.txt` for offline runs and fixtures.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use oie_core::{DocumentSource, OieError, Result, SourceConfig};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

/// Matches `== Heading ==` lines of any level
static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*=+[^=\n]*=+[ \t]*(\r?\n|$)").expect("heading pattern is valid")
});

/// Remove section heading lines from a plain-text extract
pub fn strip_headings(text: &str) -> String {
    HEADING.replace_all(text, "").into_owned()
}

// ============================================================================
// MediaWiki response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Link {
    title: String,
}

/// Outcome of the extract query for one title
#[derive(Debug, PartialEq, Eq)]
enum PageLookup {
    Content(String),
    Disambiguation(String),
}

fn lookup_page(title: &str, response: QueryResponse) -> Result<PageLookup> {
    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| OieError::Retrieval(format!("Empty query response for {title}")))?;

    if page.missing || page.invalid {
        return Err(OieError::NotFound(title.to_string()));
    }

    let is_disambiguation = page
        .pageprops
        .as_ref()
        .is_some_and(|p| p.disambiguation.is_some());
    if is_disambiguation {
        return Ok(PageLookup::Disambiguation(page.title));
    }

    Ok(PageLookup::Content(strip_headings(
        page.extract.as_deref().unwrap_or_default(),
    )))
}

fn link_titles(response: QueryResponse) -> Vec<String> {
    response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .map(|p| p.links.into_iter().map(|l| l.title).collect())
        .unwrap_or_default()
}

// ============================================================================
// Wikipedia
// ============================================================================

/// Wikipedia page source (exact titles, no search suggestions)
pub struct WikipediaSource {
    client: Client,
    api_url: String,
}

impl WikipediaSource {
    /// Create from config
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OieError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.wikipedia_api_url.clone(),
        })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<QueryResponse> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| OieError::Retrieval(format!("Wikipedia request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(OieError::Retrieval(format!(
                "Wikipedia returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OieError::Retrieval(format!("Failed to parse Wikipedia response: {e}")))
    }

    /// Article links of a disambiguation page
    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>> {
        let response = self
            .query(&[
                ("titles", title),
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
            ])
            .await?;
        Ok(link_titles(response))
    }
}

#[async_trait]
impl DocumentSource for WikipediaSource {
    async fn fetch(&self, title: &str) -> Result<String> {
        tracing::debug!(title, "Fetching Wikipedia page");

        let response = self
            .query(&[
                ("titles", title),
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("explaintext", "1"),
                ("redirects", "1"),
            ])
            .await?;

        match lookup_page(title, response)? {
            PageLookup::Content(text) => Ok(text),
            PageLookup::Disambiguation(resolved) => {
                let options = self.disambiguation_options(&resolved).await?;
                Err(OieError::Disambiguation {
                    title: title.to_string(),
                    options,
                })
            }
        }
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

// ============================================================================
// Local directory
// ============================================================================

/// Reads `<dir>/<title>.txt`
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing a title; path separators in titles become `_`
    pub fn path_for(&self, title: &str) -> PathBuf {
        let file_name = title.replace(['/', '\\'], "_");
        self.dir.join(format!("{file_name}.txt"))
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn fetch(&self, title: &str) -> Result<String> {
        let path = self.path_for(title);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(strip_headings(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OieError::NotFound(title.to_string()))
            }
            Err(e) => Err(OieError::Retrieval(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn name(&self) -> &str {
        "directory"
    }
}

// ============================================================================
// Tests
// ============================================================================
