// Modal input prompt.
// A centered single-line text box rendered over the main view.

use ratatui::{prelude::*, widgets::*};

/// Draw a one-line input modal with a title and a hint below it.
pub fn draw_input(frame: &mut Frame, title: &str, value: &str, masked: bool, hint: &str) {
    let area = frame.area();

    let modal_width = 56.min(area.width);
    let modal_height = 5;
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input box
            Constraint::Length(2), // Hint and instructions
        ])
        .split(modal_area);

    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let input_line = Line::from(vec![
        Span::raw(shown),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[0]);

    let instructions = vec![
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" = Submit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(instructions).alignment(Alignment::Center),
        chunks[1],
    );
}
