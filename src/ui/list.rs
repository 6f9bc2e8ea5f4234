// Results list rendering.
// Styled repository cards with loading, error, and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::query::PAGE_SIZE;
use crate::state::{ListCursor, Snapshot};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Group digits with commas for display (1234567 -> "1,234,567").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error notice in place of the result list.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("❌ {}", error),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            "press r to retry",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the repository results for a controller snapshot.
///
/// While a revalidation is in flight the previous page stays on screen
/// with a refreshing marker in the title instead of flashing empty.
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    cursor: &mut ListCursor,
    empty_message: &str,
) {
    if let Some(error) = snapshot.error {
        render_error(frame, area, error);
        return;
    }
    if snapshot.items.is_empty() {
        if snapshot.is_loading {
            render_loading(frame, area, "Loading repositories");
        } else {
            render_empty(frame, area, empty_message);
        }
        return;
    }

    // Rank numbering continues across pages
    let rank_base = (snapshot.page - 1) as u64 * PAGE_SIZE as u64;

    let items: Vec<ListItem> = snapshot
        .items
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let mut header = vec![
                Span::styled(
                    format!("{:>3}. ", rank_base + i as u64 + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    repo.full_name.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ★ {}", format_count(repo.stargazers_count)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("  ⑂ {}", format_count(repo.forks_count)),
                    Style::default().fg(Color::Green),
                ),
            ];
            if let Some(language) = &repo.language {
                header.push(Span::styled(
                    format!("  {}", language),
                    Style::default().fg(Color::Magenta),
                ));
            }
            header.push(Span::styled(
                format!("  {}", format_relative_time(&repo.updated_at)),
                Style::default().fg(Color::DarkGray),
            ));

            let description = repo.description.as_deref().unwrap_or("");
            let body = Line::from(Span::styled(
                format!("     {}", description),
                Style::default().fg(Color::Gray),
            ));

            ListItem::new(vec![Line::from(header), body])
        })
        .collect();

    let title = if snapshot.is_loading {
        format!(
            " {} repositories · page {} · refreshing… ",
            format_count(snapshot.total_count),
            snapshot.page
        )
    } else {
        format!(
            " {} repositories · page {} ",
            format_count(snapshot.total_count),
            snapshot.page
        )
    };

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut cursor.state);
}
