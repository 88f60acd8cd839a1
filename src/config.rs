// Application configuration.
// Deployment defaults: API endpoint, cache policy, storage keys, and the
// country/category tables offered in the reader.

use std::time::Duration;

pub const APP_NAME: &str = "kiosk";

pub const API_BASE_URL: &str = "https://newsapi.org/v2";

/// Cached responses stay fresh for 30 minutes.
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_CATEGORY: &str = "all";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Country codes selectable in the reader, with display names.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("gb", "United Kingdom"),
    ("ca", "Canada"),
    ("au", "Australia"),
    ("in", "India"),
    ("de", "Germany"),
    ("fr", "France"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("cn", "China"),
    ("rw", "Rwanda"),
];

/// Headline categories. "all" is a pseudo-category meaning no filter.
pub const CATEGORIES: &[&str] = &[
    "all",
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// Keys under which application records live in the key-value store.
pub mod storage_keys {
    /// Map of registered accounts.
    pub const USERS: &str = "users";
    /// Username of the active session.
    pub const CURRENT_USER: &str = "currentUser";
    /// Per-user API key, suffixed with the username.
    pub const API_KEY_PREFIX: &str = "newsApiKey_";
    /// Per-user saved-article list, suffixed with the username.
    pub const SAVED_PREFIX: &str = "savedArticles_";
    /// Cached API responses, suffixed with the request URL.
    pub const CACHE_PREFIX: &str = "cache_";
}

/// Display name for a country code, falling back to the code itself.
pub fn country_name(code: &str) -> &str {
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}
