// Local accounts, API keys, and saved articles.
// Demo-grade persistence in the shared key-value store. One Session value
// carries the active user's state instead of ambient globals; every
// operation takes the store explicitly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::KeyValueStore;
use crate::config::storage_keys;
use crate::error::{KioskError, Result};
use crate::news::Article;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// A registered account record. Passwords are stored in the clear; this is
/// a demo account switcher, not an authentication layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// The active user's view of persisted state.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub api_key: Option<String>,
    pub saved: Vec<Article>,
}

impl Session {
    fn load(store: &impl KeyValueStore, username: &str) -> Result<Self> {
        let api_key = store.get(&api_key_key(username))?;
        let saved = match store.get(&saved_key(username))? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(Self {
            username: username.to_string(),
            api_key,
            saved,
        })
    }

    pub fn is_saved(&self, url: &str) -> bool {
        self.saved.iter().any(|a| a.url == url)
    }
}

fn api_key_key(username: &str) -> String {
    format!("{}{}", storage_keys::API_KEY_PREFIX, username)
}

fn saved_key(username: &str) -> String {
    format!("{}{}", storage_keys::SAVED_PREFIX, username)
}

fn load_users(store: &impl KeyValueStore) -> Result<BTreeMap<String, Account>> {
    match store.get(storage_keys::USERS)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(BTreeMap::new()),
    }
}

fn save_users(
    store: &mut impl KeyValueStore,
    users: &BTreeMap<String, Account>,
) -> Result<()> {
    let raw = serde_json::to_string(users)?;
    store.set(storage_keys::USERS, &raw)?;
    Ok(())
}

/// Create an account and open a session for it.
pub fn register(
    store: &mut impl KeyValueStore,
    username: &str,
    password: &str,
) -> Result<Session> {
    if username.is_empty() || password.is_empty() {
        return Err(KioskError::Auth(
            "username and password must not be empty".to_string(),
        ));
    }

    let mut users = load_users(store)?;
    if users.contains_key(username) {
        return Err(KioskError::Auth("username already taken".to_string()));
    }
    users.insert(
        username.to_string(),
        Account {
            password: password.to_string(),
            created_at: Utc::now(),
        },
    );
    save_users(store, &users)?;
    store.set(storage_keys::CURRENT_USER, username)?;
    Session::load(store, username)
}

/// Open a session for an existing account.
pub fn login(
    store: &mut impl KeyValueStore,
    username: &str,
    password: &str,
) -> Result<Session> {
    let users = load_users(store)?;
    match users.get(username) {
        Some(account) if account.password == password => {
            store.set(storage_keys::CURRENT_USER, username)?;
            Session::load(store, username)
        }
        Some(_) => Err(KioskError::Auth("wrong password".to_string())),
        None => Err(KioskError::Auth("unknown user".to_string())),
    }
}

/// Whether a username is registered.
pub fn user_exists(store: &impl KeyValueStore, username: &str) -> Result<bool> {
    Ok(load_users(store)?.contains_key(username))
}

/// Resume the session recorded by the last login, if any.
pub fn resume(store: &impl KeyValueStore) -> Result<Option<Session>> {
    match store.get(storage_keys::CURRENT_USER)? {
        Some(username) => Ok(Some(Session::load(store, &username)?)),
        None => Ok(None),
    }
}

/// Close the active session.
pub fn logout(store: &mut impl KeyValueStore) -> Result<()> {
    store.remove(storage_keys::CURRENT_USER)?;
    Ok(())
}

/// Persist the user's API key and reflect it in the session.
pub fn set_api_key(
    store: &mut impl KeyValueStore,
    session: &mut Session,
    key: &str,
) -> Result<()> {
    store.set(&api_key_key(&session.username), key)?;
    session.api_key = Some(key.to_string());
    Ok(())
}

/// Add an article to the user's saved list. Returns false if an article
/// with the same URL was already saved.
pub fn save_article(
    store: &mut impl KeyValueStore,
    session: &mut Session,
    article: &Article,
) -> Result<bool> {
    if session.is_saved(&article.url) {
        return Ok(false);
    }
    session.saved.push(article.clone());
    persist_saved(store, session)?;
    Ok(true)
}

/// Remove a saved article by URL. Returns false if it was not saved.
pub fn remove_saved(
    store: &mut impl KeyValueStore,
    session: &mut Session,
    url: &str,
) -> Result<bool> {
    let before = session.saved.len();
    session.saved.retain(|a| a.url != url);
    if session.saved.len() == before {
        return Ok(false);
    }
    persist_saved(store, session)?;
    Ok(true)
}

fn persist_saved(store: &mut impl KeyValueStore, session: &Session) -> Result<()> {
    let raw = serde_json::to_string(&session.saved)?;
    store.set(&saved_key(&session.username), &raw)?;
    Ok(())
}

/// Seed the demo account on first run so the reader works out of the box.
pub fn ensure_demo_account(store: &mut impl KeyValueStore) -> Result<()> {
    let mut users = load_users(store)?;
    if users.contains_key(DEMO_USERNAME) {
        return Ok(());
    }
    users.insert(
        DEMO_USERNAME.to_string(),
        Account {
            password: DEMO_PASSWORD.to_string(),
            created_at: Utc::now(),
        },
    );
    save_users(store, &users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::news::Source;

    fn article(url: &str) -> Article {
        Article {
            source: Source {
                id: None,
                name: Some("Example".to_string()),
            },
            author: None,
            title: format!("article at {url}"),
            description: None,
            url: url.to_string(),
            url_to_image: None,
            published_at: None,
            content: None,
        }
    }

    #[test]
    fn register_then_login_round_trips() {
        let mut store = MemoryStore::new();
        register(&mut store, "alex", "pw").unwrap();

        let session = login(&mut store, "alex", "pw").unwrap();
        assert_eq!(session.username, "alex");
        assert!(session.api_key.is_none());
        assert!(session.saved.is_empty());
    }

    #[test]
    fn login_rejects_bad_credentials() {
        let mut store = MemoryStore::new();
        register(&mut store, "alex", "pw").unwrap();

        assert!(matches!(
            login(&mut store, "alex", "nope").unwrap_err(),
            KioskError::Auth(_)
        ));
        assert!(matches!(
            login(&mut store, "nobody", "pw").unwrap_err(),
            KioskError::Auth(_)
        ));
    }

    #[test]
    fn register_rejects_duplicates_and_empty_fields() {
        let mut store = MemoryStore::new();
        register(&mut store, "alex", "pw").unwrap();

        assert!(matches!(
            register(&mut store, "alex", "other").unwrap_err(),
            KioskError::Auth(_)
        ));
        assert!(register(&mut store, "", "pw").is_err());
        assert!(register(&mut store, "b", "").is_err());
    }

    #[test]
    fn resume_follows_last_login_and_logout_clears_it() {
        let mut store = MemoryStore::new();
        assert!(resume(&store).unwrap().is_none());

        register(&mut store, "alex", "pw").unwrap();
        let resumed = resume(&store).unwrap().unwrap();
        assert_eq!(resumed.username, "alex");

        logout(&mut store).unwrap();
        assert!(resume(&store).unwrap().is_none());
    }

    #[test]
    fn api_key_is_scoped_per_user() {
        let mut store = MemoryStore::new();
        let mut alex = register(&mut store, "alex", "pw").unwrap();
        set_api_key(&mut store, &mut alex, "key-a").unwrap();

        let mut sam = register(&mut store, "sam", "pw").unwrap();
        assert!(sam.api_key.is_none());
        set_api_key(&mut store, &mut sam, "key-s").unwrap();

        let alex_again = login(&mut store, "alex", "pw").unwrap();
        assert_eq!(alex_again.api_key.as_deref(), Some("key-a"));
    }

    #[test]
    fn saved_articles_persist_and_deduplicate() {
        let mut store = MemoryStore::new();
        let mut session = register(&mut store, "alex", "pw").unwrap();

        assert!(save_article(&mut store, &mut session, &article("https://e/1")).unwrap());
        assert!(save_article(&mut store, &mut session, &article("https://e/2")).unwrap());
        // Same URL again is a no-op.
        assert!(!save_article(&mut store, &mut session, &article("https://e/1")).unwrap());

        let reloaded = login(&mut store, "alex", "pw").unwrap();
        assert_eq!(reloaded.saved.len(), 2);
        assert!(reloaded.is_saved("https://e/1"));

        let mut session = reloaded;
        assert!(remove_saved(&mut store, &mut session, "https://e/1").unwrap());
        assert!(!remove_saved(&mut store, &mut session, "https://e/1").unwrap());
        assert_eq!(login(&mut store, "alex", "pw").unwrap().saved.len(), 1);
    }

    #[test]
    fn demo_account_is_seeded_once() {
        let mut store = MemoryStore::new();
        ensure_demo_account(&mut store).unwrap();
        ensure_demo_account(&mut store).unwrap();

        let session = login(&mut store, DEMO_USERNAME, DEMO_PASSWORD).unwrap();
        assert_eq!(session.username, DEMO_USERNAME);
    }
}
