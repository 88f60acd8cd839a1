// UI module for rendering the TUI.
// One screen: header, article list with a detail pane, and a status bar.
// Prompts render as a modal on top.

mod list;
mod modal;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::cache::KeyValueStore;
use crate::config;

/// Main draw function that renders the entire UI.
pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Article list + detail
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(input) = &app.input {
        modal::draw_input(frame, input.title(), input.value(), input.masked(), input.hint());
    }
}

/// Header: app name, what the feed shows, user, and fetch status.
fn draw_header<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let describe = if app.viewing_saved {
        format!("Saved articles ({})", app.saved.len())
    } else {
        app.feed.describe()
    };

    let mut spans = vec![
        Span::styled(
            config::APP_NAME,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(describe, Style::default().fg(Color::White)),
    ];

    if let Some(session) = &app.session {
        spans.push(Span::styled(
            format!("  ({})", session.username),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(fetch) = app.status.fetch {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("API: {fetch}"),
            Style::default().fg(match fetch {
                crate::fetch::FetchStatus::Cached => Color::Cyan,
                crate::fetch::FetchStatus::Fetching => Color::Yellow,
                crate::fetch::FetchStatus::Active => Color::Green,
            }),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let header = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(header, area);
}

/// Article list on the left, selected-article detail on the right.
fn draw_content<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let saved_urls: Vec<&str> = app
        .session
        .as_ref()
        .map(|s| s.saved.iter().map(|a| a.url.as_str()).collect())
        .unwrap_or_default();

    if app.viewing_saved {
        let selected = app.saved.selected_item().cloned();
        list::render_articles(frame, &mut app.saved, &saved_urls, chunks[0], " Saved ");
        list::render_detail(frame, selected.as_ref(), chunks[1]);
    } else {
        let selected = app.feed.list.selected_item().cloned();
        list::render_articles(frame, &mut app.feed.list, &saved_urls, chunks[0], " Articles ");
        list::render_detail(frame, selected.as_ref(), chunks[1]);
    }
}

/// Status bar: last message on the left, key help on the right.
fn draw_status_bar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    const KEY_HELP: &str =
        "q quit · r refresh · / search · s save · v saved · c category · n country · o sort · a key · l logout";

    let line = match &app.status.message {
        Some(message) => Line::from(vec![
            Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(KEY_HELP, Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            KEY_HELP,
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(line), area);
}
