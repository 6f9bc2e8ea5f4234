// UI rendering module.
// Lays out the tab bar, per-tab content, and the footer.

#![allow(dead_code)]

pub mod list;
pub mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::Phase;

use list::{format_relative_time, render_results};

/// Draw the complete UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Search => draw_search(frame, app, chunks[1]),
        Tab::Trending => draw_trending(frame, app, chunks[1]),
    }

    draw_footer(frame, app, chunks[2]);
}

/// Draw the search tab: query box, filter line, results.
fn draw_search(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let border = if app.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let hint = if app.editing {
        " Query (Enter to search, Esc to cancel) "
    } else {
        " Query (press / to edit) "
    };
    let input = Paragraph::new(app.search.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(hint),
    );
    frame.render_widget(input, chunks[0]);

    let filters = Line::from(vec![
        Span::styled("Language: ", Style::default().fg(Color::DarkGray)),
        Span::raw(display_language(app.search.language())),
        Span::styled("  Sort: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.search.sort().label()),
    ]);
    frame.render_widget(Paragraph::new(filters), chunks[1]);

    let empty_message = match app.search.phase() {
        Phase::Idle => {
            "Start exploring: press / and search repositories by name, description, or topic"
        }
        _ => "No results found. Try different keywords or filters",
    };
    let (snapshot, cursor) = app.search.view(&app.cache);
    render_results(frame, chunks[2], &snapshot, cursor, empty_message);
}

/// Draw the trending tab: range/filter line, results.
fn draw_trending(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let range = app.trending.range();
    let filters = Line::from(vec![
        Span::styled("Created: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            range.label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Language: ", Style::default().fg(Color::DarkGray)),
        Span::raw(display_language(app.trending.language())),
    ]);
    frame.render_widget(Paragraph::new(filters), chunks[0]);

    let (snapshot, cursor) = app.trending.view(&app.cache);
    render_results(
        frame,
        chunks[1],
        &snapshot,
        cursor,
        "No repositories found. Try another time range or language",
    );
}

/// Draw the footer: key hints on the left, API status on the right.
fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let hints = match app.active_tab {
        Tab::Search => "/: query  l: language  s: sort  ←/→: page  r: retry  Tab: switch  q: quit",
        Tab::Trending => "d/w/m: range  l: language  ←/→: page  r: retry  Tab: switch  q: quit",
    };
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        chunks[0],
    );

    let mut status = Vec::new();
    let snapshot = match app.active_tab {
        Tab::Search => app.search.snapshot(&app.cache),
        Tab::Trending => app.trending.snapshot(&app.cache),
    };
    if let Some(fetched_at) = snapshot.fetched_at {
        status.push(Span::styled(
            format!("fetched {}  ", format_relative_time(&fetched_at)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(rate) = &app.rate_limit {
        let style = if rate.remaining == 0 {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        status.push(Span::styled(
            format!("API {}/{}", rate.remaining, rate.limit),
            style,
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn display_language(language: &str) -> &str {
    if language.is_empty() { "all" } else { language }
}
