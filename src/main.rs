// Terminal entry point.
// Builds the store and transport, seeds the demo account, resumes the last
// session, and runs the app.

mod app;
mod cache;
mod config;
mod error;
mod fetch;
mod news;
mod session;
mod state;
mod ui;

use app::App;
use cache::{FileStore, KeyValueStore, MemoryStore};
use error::Result;
use news::HttpTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let transport = HttpTransport::new()?;

    // Fall back to an ephemeral store when no cache directory resolves.
    match cache::paths::store_path() {
        Some(path) => run(FileStore::open(path)?, transport).await,
        None => run(MemoryStore::new(), transport).await,
    }
}

async fn run(mut store: impl KeyValueStore, transport: HttpTransport) -> Result<()> {
    session::ensure_demo_account(&mut store)?;
    let resumed = session::resume(&store)?;

    let mut terminal = ratatui::init();
    let mut app = App::new(store, transport, resumed);
    let result = app.run(&mut terminal).await;
    ratatui::restore();
    result
}
