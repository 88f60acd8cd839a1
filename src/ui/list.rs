// Article list and detail rendering.
// Styled list views with loading, error, and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::news::Article;
use crate::state::{LoadingState, SelectableList};

/// Format a timestamp as relative age (e.g., "2h ago"), falling back to a
/// date for anything older than a month.
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_days() > 30 {
        dt.format("%b %d").to_string()
    } else if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn centered_message(frame: &mut Frame, area: Rect, text: String, color: Color, title: &str) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(block);
    frame.render_widget(widget, area);
}

/// Render the article list with its loading/error/empty states.
pub fn render_articles(
    frame: &mut Frame,
    list: &mut SelectableList<Article>,
    saved_urls: &[&str],
    area: Rect,
    title: &str,
) {
    match &list.data {
        LoadingState::Idle => {
            centered_message(
                frame,
                area,
                "Press r to load headlines".to_string(),
                Color::DarkGray,
                title,
            );
        }
        LoadingState::Loading => {
            centered_message(
                frame,
                area,
                "⏳ Loading articles...".to_string(),
                Color::Yellow,
                title,
            );
        }
        LoadingState::Error(e) => {
            centered_message(frame, area, format!("❌ {}", e), Color::Red, title);
        }
        LoadingState::Loaded(articles) if articles.is_empty() => {
            centered_message(
                frame,
                area,
                "No articles".to_string(),
                Color::DarkGray,
                title,
            );
        }
        LoadingState::Loaded(articles) => {
            let items: Vec<ListItem> = articles
                .iter()
                .map(|article| article_item(article, saved_urls))
                .collect();

            let widget = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title.to_string()))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(widget, area, &mut list.list_state);
        }
    }
}

fn article_item<'a>(article: &'a Article, saved_urls: &[&str]) -> ListItem<'a> {
    let marker = if saved_urls.contains(&article.url.as_str()) {
        Span::styled("★ ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    };

    let age = article
        .published_at
        .map(|dt| format_relative_time(&dt))
        .unwrap_or_default();

    let source = article.source.name.as_deref().unwrap_or("unknown");

    ListItem::new(Line::from(vec![
        marker,
        Span::styled(format!("{age:>8} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{source}: "), Style::default().fg(Color::Blue)),
        Span::styled(article.title.as_str(), Style::default().fg(Color::White)),
    ]))
}

/// Render the detail pane for the selected article.
pub fn render_detail(frame: &mut Frame, article: Option<&Article>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Detail ");

    let Some(article) = article else {
        let widget = Paragraph::new("Select an article")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(widget, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            byline(article),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    if let Some(description) = &article.description {
        lines.push(Line::from(description.clone()));
        lines.push(Line::default());
    }
    if let Some(content) = &article.content {
        lines.push(Line::from(content.clone()));
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        article.url.clone(),
        Style::default().fg(Color::Cyan),
    )));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(widget, area);
}

fn byline(article: &Article) -> String {
    let source = article.source.name.as_deref().unwrap_or("unknown source");
    let when = article
        .published_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "undated".to_string());
    match &article.author {
        Some(author) => format!("{author} · {source} · {when}"),
        None => format!("{source} · {when}"),
    }
}
