//! arXiv literature search client.
//!
//! Queries the arXiv export API and pulls the fields we need out of the
//! Atom feed. Failed queries are skipped rather than failing the whole
//! search, matching how flaky the endpoint can be under load.

use std::sync::LazyLock;

use async_trait::async_trait;
use papermill_core::request::PaperRecord;
use papermill_core::stages::LiteratureSource;
use papermill_core::{Error, Result};
use regex::Regex;
use tracing::warn;

const QUERY_URL: &str = "http://export.arxiv.org/api/query";

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("valid regex"));
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<summary>(.*?)</summary>").expect("valid regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<name>(.*?)</name>").expect("valid regex"));
static PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<published>(\d{4})").expect("valid regex"));
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<id>(.*?)</id>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

pub struct ArxivClient {
    client: reqwest::Client,
}

impl ArxivClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<PaperRecord>> {
        let url = format!(
            "{QUERY_URL}?search_query=all:{}&start=0&max_results={max_results}",
            urlencoding::encode(query)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Literature(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Literature(format!(
                "arXiv returned {}",
                response.status()
            )));
        }
        let feed = response
            .text()
            .await
            .map_err(|e| Error::Literature(e.to_string()))?;
        Ok(parse_feed(&feed))
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiteratureSource for ArxivClient {
    async fn search(&self, queries: &[String], max_results: usize) -> Result<Vec<PaperRecord>> {
        let mut all_papers = Vec::new();
        for query in queries {
            match self.fetch(query, max_results).await {
                Ok(papers) => all_papers.extend(papers),
                Err(e) => {
                    warn!(query = %query, error = %e, "arXiv query failed, skipping");
                    continue;
                }
            }
        }
        Ok(all_papers)
    }
}

/// Extract paper records from an Atom feed body.
fn parse_feed(feed: &str) -> Vec<PaperRecord> {
    ENTRY_RE
        .captures_iter(feed)
        .filter_map(|entry| {
            let entry = entry.get(1)?.as_str();
            let title = TITLE_RE
                .captures(entry)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_else(|| "No Title".to_string());
            let abstract_text = SUMMARY_RE
                .captures(entry)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();
            let authors: Vec<String> = NAME_RE
                .captures_iter(entry)
                .map(|c| clean_text(&c[1]))
                .collect();
            let year = PUBLISHED_RE
                .captures(entry)
                .and_then(|c| c[1].parse::<i32>().ok());
            let url = ID_RE.captures(entry).map(|c| clean_text(&c[1]));

            Some(PaperRecord {
                title,
                authors: (!authors.is_empty()).then(|| authors.join(", ")),
                abstract_text,
                year,
                url,
                source: "arXiv".to_string(),
                enriched_metadata: None,
            })
        })
        .collect()
}

/// Collapse whitespace and undo the handful of entities arXiv emits.
fn clean_text(raw: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    collapsed
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
