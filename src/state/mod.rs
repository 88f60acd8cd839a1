// State management module.
// Holds the article feed, list selection, and loading state for the UI.

#![allow(dead_code)]

pub mod articles;
pub mod list;

pub use articles::{ArticleFeed, FeedMode};
pub use list::{LoadingState, SelectableList};
