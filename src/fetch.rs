// Cache-then-fetch orchestration.
// Single entry point for retrieving a resource by URL: consult the cache,
// hit the network only on a miss, store the parsed body on success. The
// transport and the status observer are injected, so this layer knows
// nothing about any particular upstream API or UI.

use std::fmt;

use serde_json::Value;

use crate::cache::store as cache;
use crate::cache::KeyValueStore;
use crate::error::{KioskError, Result};

/// Minimal view of an HTTP response: status code plus raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs an HTTP GET with optional headers.
///
/// `Err` means no response was obtained at all; HTTP-level failures come
/// back as an [`HttpResponse`] with a non-2xx status.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Coarse fetch status, surfaced to the UI at each transition point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Served from the cache, no network I/O.
    Cached,
    /// Cache miss, request in flight.
    Fetching,
    /// Fresh data fetched and stored.
    Active,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchStatus::Cached => "Cached",
            FetchStatus::Fetching => "Fetching",
            FetchStatus::Active => "Active",
        };
        f.write_str(label)
    }
}

/// Observer for fetch status transitions.
pub trait StatusSink {
    fn status(&mut self, status: FetchStatus);
}

/// Sink that ignores all status updates.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&mut self, _status: FetchStatus) {}
}

/// Fetch `url`, consulting the cache first.
///
/// A fresh cached entry is returned without any network I/O. On a miss the
/// request is performed; a non-2xx status, an unparsable body, or an
/// application-level error detected by `check_body` fails the call with
/// [`KioskError::Upstream`] and caches nothing. A successful body is cached
/// best-effort and returned. No retries, no request deduplication.
pub async fn fetch_with_cache<T, S, F>(
    transport: &T,
    store: &mut S,
    url: &str,
    headers: &[(&str, &str)],
    sink: &mut dyn StatusSink,
    check_body: F,
) -> Result<Value>
where
    T: Transport,
    S: KeyValueStore,
    F: Fn(&Value) -> std::result::Result<(), String>,
{
    // A failing cache read degrades to a miss.
    if let Ok(Some(content)) = cache::get(store, url) {
        sink.status(FetchStatus::Cached);
        return Ok(content);
    }

    sink.status(FetchStatus::Fetching);
    let response = transport.get(url, headers).await?;

    if !(200..300).contains(&response.status) {
        return Err(KioskError::Upstream {
            status: response.status,
            message: response.body.trim().to_string(),
        });
    }

    let content: Value =
        serde_json::from_str(&response.body).map_err(|e| KioskError::Upstream {
            status: response.status,
            message: format!("unparsable response body: {e}"),
        })?;

    if let Err(message) = check_body(&content) {
        return Err(KioskError::Upstream {
            status: response.status,
            message,
        });
    }

    cache::put(store, url, &content);
    sink.status(FetchStatus::Active);
    Ok(content)
}
