// NewsAPI response types.
// Structs for deserializing NewsAPI v2 listing responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article source attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A single article in a listing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: Source,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

/// Listing response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Error body the upstream embeds in a 2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Sort orders accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    PublishedAt,
    Relevancy,
    Popularity,
}

impl SortOrder {
    /// Query-parameter value.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PublishedAt => "publishedAt",
            SortOrder::Relevancy => "relevancy",
            SortOrder::Popularity => "popularity",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::PublishedAt => "Latest First",
            SortOrder::Relevancy => "Most Relevant",
            SortOrder::Popularity => "Most Popular",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortOrder::PublishedAt => SortOrder::Relevancy,
            SortOrder::Relevancy => SortOrder::Popularity,
            SortOrder::Popularity => SortOrder::PublishedAt,
        }
    }
}
