// NewsAPI module.
// Client and types for the NewsAPI v2 REST endpoints.

#![allow(dead_code)]

pub mod client;
pub mod types;

pub use client::{HttpTransport, NewsClient};
pub use types::*;
