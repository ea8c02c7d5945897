//! arXiv paper metadata search over the public Atom API.

use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{config::Config, models::paper::PaperEntry, utils::text::collapse_whitespace};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("paper search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unreadable paper feed: {0}")]
    Feed(#[from] quick_xml::DeError),
}

#[async_trait]
pub trait PaperSearch: Send + Sync {
    /// Entries in feed order; empty when nothing matches.
    async fn search(&self, query: &str) -> Result<Vec<PaperEntry>, SearchError>;
}

pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
    max_results: u32,
}

impl ArxivClient {
    pub fn new(config: &Config) -> Self {
        ArxivClient {
            http: reqwest::Client::new(),
            base_url: config.arxiv_api_url.clone(),
            max_results: config.arxiv_max_results,
        }
    }

    fn query_url(&self, query: &str) -> Result<Url, SearchError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("search_query", format!("all:{}", query.trim())),
                ("start", "0".to_string()),
                ("max_results", self.max_results.to_string()),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl PaperSearch for ArxivClient {
    async fn search(&self, query: &str) -> Result<Vec<PaperEntry>, SearchError> {
        let url = self.query_url(query)?;
        debug!("Searching arXiv: {}", url);

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_feed(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    title: String,
    summary: String,
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

/// Parses an Atom feed as returned by the arXiv query API.
pub fn parse_feed(xml: &str) -> Result<Vec<PaperEntry>, SearchError> {
    let feed: Feed = quick_xml::de::from_str(xml)?;

    let papers = feed
        .entries
        .into_iter()
        .map(|entry| {
            let url = entry.id.trim().to_string();
            let id = url
                .split_once("/abs/")
                .map(|(_, id)| id.to_string())
                .unwrap_or_else(|| url.clone());
            let year = DateTime::parse_from_rfc3339(entry.published.trim())
                .map(|published| published.year())
                .unwrap_or_default();

            PaperEntry {
                id,
                title: collapse_whitespace(&entry.title),
                abstract_text: collapse_whitespace(&entry.summary),
                authors: entry
                    .authors
                    .into_iter()
                    .map(|a| collapse_whitespace(&a.name))
                    .collect(),
                year,
                url,
            }
        })
        .collect();

    Ok(papers)
}
