// Article feed state.
// Tracks what listing is on screen (headlines for a country/category, or a
// search) and the parameters the next fetch will use.

use crate::config;
use crate::news::{Article, NewsResponse, SortOrder};

use super::list::SelectableList;

/// What the feed currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedMode {
    /// Top headlines for the selected country/category.
    #[default]
    Headlines,
    /// Free-text search across all articles.
    Search { query: String },
}

/// The article listing and the parameters that produced it.
#[derive(Debug)]
pub struct ArticleFeed {
    pub list: SelectableList<Article>,
    pub mode: FeedMode,
    pub country: String,
    pub category: String,
    pub sort: SortOrder,
    pub total_results: u64,
}

impl ArticleFeed {
    pub fn new() -> Self {
        Self {
            list: SelectableList::new(),
            mode: FeedMode::Headlines,
            country: config::DEFAULT_COUNTRY.to_string(),
            category: config::DEFAULT_CATEGORY.to_string(),
            sort: SortOrder::default(),
            total_results: 0,
        }
    }

    /// Install a fetched listing.
    pub fn set_listing(&mut self, listing: NewsResponse) {
        self.total_results = listing.total_results;
        self.list.set_loaded(listing.articles);
    }

    /// Advance to the next category, wrapping around.
    pub fn cycle_category(&mut self) {
        self.category = next_in(config::CATEGORIES, &self.category).to_string();
    }

    /// Advance to the next country, wrapping around.
    pub fn cycle_country(&mut self) {
        let codes: Vec<&str> = config::COUNTRIES.iter().map(|(code, _)| *code).collect();
        self.country = next_in(&codes, &self.country).to_string();
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    /// Switch to search mode; an empty query returns to headlines.
    pub fn set_query(&mut self, query: &str) {
        let query = query.trim();
        self.mode = if query.is_empty() {
            FeedMode::Headlines
        } else {
            FeedMode::Search {
                query: query.to_string(),
            }
        };
    }

    /// One-line description of what is on screen, for the header.
    pub fn describe(&self) -> String {
        match &self.mode {
            FeedMode::Headlines => format!(
                "Top headlines · {} · {}",
                config::country_name(&self.country),
                self.category
            ),
            FeedMode::Search { query } => {
                format!("Search \"{}\" · {}", query, self.sort.label())
            }
        }
    }
}

/// The element after `current` in `options`, wrapping; the first element
/// when `current` is not present.
fn next_in<'a>(options: &[&'a str], current: &str) -> &'a str {
    let position = options.iter().position(|o| *o == current);
    match position {
        Some(i) => options[(i + 1) % options.len()],
        None => options[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::Source;

    fn listing(urls: &[&str]) -> NewsResponse {
        NewsResponse {
            status: "ok".to_string(),
            total_results: urls.len() as u64,
            articles: urls
                .iter()
                .map(|url| Article {
                    source: Source {
                        id: None,
                        name: None,
                    },
                    author: None,
                    title: url.to_string(),
                    description: None,
                    url: url.to_string(),
                    url_to_image: None,
                    published_at: None,
                    content: None,
                })
                .collect(),
        }
    }

    #[test]
    fn set_listing_resets_selection() {
        let mut feed = ArticleFeed::new();
        feed.set_listing(listing(&["a", "b"]));
        feed.list.select_next();
        assert_eq!(feed.list.selected(), Some(1));

        feed.set_listing(listing(&["c"]));
        assert_eq!(feed.list.selected(), Some(0));
        assert_eq!(feed.total_results, 1);
    }

    #[test]
    fn category_and_country_cycles_wrap() {
        let mut feed = ArticleFeed::new();
        assert_eq!(feed.category, "all");
        for _ in 0..config::CATEGORIES.len() {
            feed.cycle_category();
        }
        assert_eq!(feed.category, "all");

        for _ in 0..config::COUNTRIES.len() {
            feed.cycle_country();
        }
        assert_eq!(feed.country, config::DEFAULT_COUNTRY);
    }

    #[test]
    fn blank_query_returns_to_headlines() {
        let mut feed = ArticleFeed::new();
        feed.set_query("  rust  ");
        assert_eq!(
            feed.mode,
            FeedMode::Search {
                query: "rust".to_string()
            }
        );

        feed.set_query("   ");
        assert_eq!(feed.mode, FeedMode::Headlines);
    }

    #[test]
    fn describe_names_the_active_listing() {
        let mut feed = ArticleFeed::new();
        assert_eq!(feed.describe(), "Top headlines · United States · all");

        feed.set_query("rust");
        assert_eq!(feed.describe(), "Search \"rust\" · Latest First");
    }
}
