// App state and main event loop.
// Owns the store, client, session, and feed; handles keyboard input and
// performs fetches between frames. Fetches are awaited inline, so there is
// a single logical thread of control.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;

use crate::cache::KeyValueStore;
use crate::error::Result;
use crate::fetch::{FetchStatus, StatusSink};
use crate::news::{Article, HttpTransport, NewsClient};
use crate::session::{self, Session};
use crate::state::{ArticleFeed, FeedMode, SelectableList};
use crate::ui;

/// Text prompt the app is currently showing, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Username { value: String },
    Password { username: String, value: String },
    ApiKey { value: String },
    Search { value: String },
}

impl InputMode {
    pub fn title(&self) -> &'static str {
        match self {
            InputMode::Username { .. } => " Username ",
            InputMode::Password { .. } => " Password ",
            InputMode::ApiKey { .. } => " NewsAPI Key ",
            InputMode::Search { .. } => " Search ",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            InputMode::Username { .. } => "new names create an account (demo works too)",
            InputMode::Password { .. } => "demo account password: demo123",
            InputMode::ApiKey { .. } => "paste your newsapi.org key",
            InputMode::Search { .. } => "empty query returns to headlines",
        }
    }

    /// Whether the value should render as bullets.
    pub fn masked(&self) -> bool {
        matches!(self, InputMode::Password { .. } | InputMode::ApiKey { .. })
    }

    pub fn value(&self) -> &str {
        match self {
            InputMode::Username { value }
            | InputMode::Password { value, .. }
            | InputMode::ApiKey { value }
            | InputMode::Search { value } => value,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self {
            InputMode::Username { value }
            | InputMode::Password { value, .. }
            | InputMode::ApiKey { value }
            | InputMode::Search { value } => value,
        }
    }
}

/// Header and status-line state; doubles as the fetch status sink.
#[derive(Debug, Default)]
pub struct StatusLine {
    /// Last fetch transition ("Cached", "Fetching", "Active").
    pub fetch: Option<FetchStatus>,
    /// Last user-facing message.
    pub message: Option<String>,
}

impl StatusSink for StatusLine {
    fn status(&mut self, status: FetchStatus) {
        self.fetch = Some(status);
    }
}

/// Main application state.
pub struct App<S> {
    store: S,
    client: NewsClient<HttpTransport>,
    pub session: Option<Session>,
    pub feed: ArticleFeed,
    /// Saved-article list, rebuilt when the saved view opens.
    pub saved: SelectableList<Article>,
    pub viewing_saved: bool,
    pub status: StatusLine,
    pub input: Option<InputMode>,
    pending_fetch: bool,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S, transport: HttpTransport, session: Option<Session>) -> Self {
        let api_key = session
            .as_ref()
            .and_then(|s| s.api_key.clone())
            .unwrap_or_default();
        let input = match &session {
            None => Some(InputMode::Username {
                value: String::new(),
            }),
            Some(_) => None,
        };
        Self {
            store,
            client: NewsClient::new(transport, api_key),
            pending_fetch: session.is_some(),
            session,
            feed: ArticleFeed::new(),
            saved: SelectableList::new(),
            viewing_saved: false,
            status: StatusLine::default(),
            input,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        self.adopt_env_key()?;
        while !self.should_quit {
            if self.pending_fetch && self.input.is_none() {
                self.pending_fetch = false;
                self.feed.list.set_loading();
                // Show the loading frame before blocking on the request.
                terminal.draw(|frame| ui::draw(frame, self))?;
                self.load_feed().await;
            }
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Pick up NEWS_API_KEY for a session that has no stored key yet.
    fn adopt_env_key(&mut self) -> Result<()> {
        if let Some(session) = &mut self.session {
            if session.api_key.is_none() {
                if let Ok(key) = std::env::var("NEWS_API_KEY") {
                    session::set_api_key(&mut self.store, session, &key)?;
                    self.client.set_api_key(key);
                }
            }
        }
        Ok(())
    }

    /// Fetch the listing the feed currently describes.
    async fn load_feed(&mut self) {
        if !self.client.has_api_key() {
            self.feed.list.set_error("no API key configured".to_string());
            self.input = Some(InputMode::ApiKey {
                value: String::new(),
            });
            return;
        }

        let mode = self.feed.mode.clone();
        let result = match &mode {
            FeedMode::Headlines => {
                self.client
                    .top_headlines(
                        &mut self.store,
                        &mut self.status,
                        &self.feed.country,
                        &self.feed.category,
                    )
                    .await
            }
            FeedMode::Search { query } => {
                self.client
                    .search(&mut self.store, &mut self.status, query, self.feed.sort)
                    .await
            }
        };

        match result {
            Ok(listing) => {
                if listing.articles.is_empty() {
                    self.status.message =
                        Some("No articles found. Try different search terms.".to_string());
                }
                self.feed.set_listing(listing);
            }
            Err(e) => self.feed.list.set_error(e.to_string()),
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> Result<()> {
        if !event::poll(Duration::from_millis(100))? {
            return Ok(());
        }
        let Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.input.is_some() {
            return self.handle_input_key(key);
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.active_list().select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.active_list().select_next(),
            KeyCode::Char('r') => self.pending_fetch = true,
            KeyCode::Char('/') => {
                self.input = Some(InputMode::Search {
                    value: String::new(),
                })
            }
            KeyCode::Char('a') => {
                self.input = Some(InputMode::ApiKey {
                    value: String::new(),
                })
            }
            KeyCode::Char('s') => self.toggle_save_selected(),
            KeyCode::Char('v') => self.toggle_saved_view(),
            KeyCode::Char('c') => {
                self.feed.cycle_category();
                if self.feed.mode == FeedMode::Headlines {
                    self.pending_fetch = true;
                }
            }
            KeyCode::Char('n') => {
                self.feed.cycle_country();
                if self.feed.mode == FeedMode::Headlines {
                    self.pending_fetch = true;
                }
            }
            KeyCode::Char('o') => {
                self.feed.cycle_sort();
                if matches!(self.feed.mode, FeedMode::Search { .. }) {
                    self.pending_fetch = true;
                }
            }
            KeyCode::Char('l') => self.logout()?,
            KeyCode::Esc => {
                if self.viewing_saved {
                    self.viewing_saved = false;
                } else if self.feed.mode != FeedMode::Headlines {
                    self.feed.set_query("");
                    self.pending_fetch = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Route a key press into the open prompt.
    fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(mode) = self.input.take() {
                    self.submit_input(mode)?;
                }
            }
            KeyCode::Backspace => {
                if let Some(mode) = &mut self.input {
                    mode.value_mut().pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(mode) = &mut self.input {
                    mode.value_mut().push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_input(&mut self, mode: InputMode) -> Result<()> {
        match mode {
            InputMode::Username { value } => {
                let username = value.trim().to_string();
                if username.is_empty() {
                    self.input = Some(InputMode::Username { value });
                } else {
                    self.input = Some(InputMode::Password {
                        username,
                        value: String::new(),
                    });
                }
            }
            InputMode::Password { username, value } => {
                let existing = session::user_exists(&self.store, &username)?;
                let result = if existing {
                    session::login(&mut self.store, &username, &value)
                } else {
                    session::register(&mut self.store, &username, &value)
                };
                match result {
                    Ok(sess) => {
                        self.client
                            .set_api_key(sess.api_key.clone().unwrap_or_default());
                        self.status.message = Some(if existing {
                            format!("Welcome back, {}!", sess.username)
                        } else {
                            format!("Account created for {}", sess.username)
                        });
                        self.session = Some(sess);
                        self.adopt_env_key()?;
                        if self.client.has_api_key() {
                            self.pending_fetch = true;
                        } else {
                            self.input = Some(InputMode::ApiKey {
                                value: String::new(),
                            });
                        }
                    }
                    Err(e) => {
                        self.status.message = Some(e.to_string());
                        self.input = Some(InputMode::Username { value: username });
                    }
                }
            }
            InputMode::ApiKey { value } => {
                let key = value.trim().to_string();
                if key.is_empty() {
                    return Ok(());
                }
                if let Some(sess) = &mut self.session {
                    session::set_api_key(&mut self.store, sess, &key)?;
                }
                self.client.set_api_key(key);
                self.status.message = Some("API key configured".to_string());
                self.pending_fetch = true;
            }
            InputMode::Search { value } => {
                self.feed.set_query(&value);
                self.viewing_saved = false;
                self.pending_fetch = true;
            }
        }
        Ok(())
    }

    /// The list the navigation keys act on.
    fn active_list(&mut self) -> &mut SelectableList<Article> {
        if self.viewing_saved {
            &mut self.saved
        } else {
            &mut self.feed.list
        }
    }

    /// Save the selected article, or un-save it if already saved.
    fn toggle_save_selected(&mut self) {
        let Some(article) = (if self.viewing_saved {
            self.saved.selected_item().cloned()
        } else {
            self.feed.list.selected_item().cloned()
        }) else {
            return;
        };
        let Some(sess) = &mut self.session else {
            return;
        };

        let result = if sess.is_saved(&article.url) {
            session::remove_saved(&mut self.store, sess, &article.url)
                .map(|_| "Removed from saved articles")
        } else {
            session::save_article(&mut self.store, sess, &article)
                .map(|_| "Article saved successfully!")
        };

        match result {
            Ok(message) => {
                self.status.message = Some(message.to_string());
                if self.viewing_saved {
                    if let Some(index) = self.saved.selected() {
                        self.saved.remove(index);
                    }
                }
            }
            Err(e) => self.status.message = Some(e.to_string()),
        }
    }

    fn toggle_saved_view(&mut self) {
        let Some(sess) = &self.session else {
            return;
        };
        self.viewing_saved = !self.viewing_saved;
        if self.viewing_saved {
            self.saved.set_loaded(sess.saved.clone());
        }
    }

    fn logout(&mut self) -> Result<()> {
        session::logout(&mut self.store)?;
        self.session = None;
        self.client.set_api_key("");
        self.viewing_saved = false;
        self.feed = ArticleFeed::new();
        self.status = StatusLine::default();
        self.input = Some(InputMode::Username {
            value: String::new(),
        });
        Ok(())
    }
}
