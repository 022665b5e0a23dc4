// UI module for rendering the TUI.
// Contains widgets for tabs, the post list, search, and the detail overlay.

mod detail;
mod list;
mod search;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Posts => draw_posts_tab(frame, app, chunks[1]),
        Tab::Search => search::draw_search_tab(frame, &mut app.search, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);

    if let Some(post_detail) = &app.detail {
        detail::draw_detail(frame, post_detail);
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the Posts tab, with the query input line while it is being edited.
fn draw_posts_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let (list_area, query_area) = if app.query_draft.is_some() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    list::render_posts_list(frame, &mut app.posts, list_area);

    if let (Some(query_area), Some(draft)) = (query_area, &app.query_draft) {
        let query_line = Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(draft.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);
        let query_widget = Paragraph::new(query_line).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(query_widget, query_area);
    }
}

fn hint<'a>(key: &'a str, action: &'a str) -> [Span<'a>; 2] {
    [
        Span::raw(key),
        Span::styled(action, Style::default().fg(Color::DarkGray)),
    ]
}

/// Draw the status bar with keybinding hints for the current context.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let pairs: &[(&str, &str)] = if let Some(detail) = &app.detail {
        if detail.is_editing() {
            &[(" ↵ ", "Save"), ("  Tab ", "Field"), ("  Esc ", "Cancel"), ("  ^C ", "Quit")]
        } else {
            &[(" e ", "Edit"), ("  ↑↓ ", "Scroll"), ("  Esc ", "Close"), ("  q ", "Quit")]
        }
    } else if app.query_draft.is_some() {
        &[(" ↵ ", "Search"), ("  Esc ", "Cancel"), ("  ^C ", "Quit")]
    } else {
        match app.active_tab {
            Tab::Posts => &[
                (" ↑↓ ", "Navigate"),
                ("  ←→ ", "Page"),
                ("  +/- ", "Per page"),
                ("  / ", "Filter"),
                ("  ↵ ", "Open"),
                ("  r ", "Refresh"),
                ("  c ", "Clear cache"),
                ("  Tab ", "Switch"),
                ("  ? ", "Help"),
                ("  q ", "Quit"),
            ],
            Tab::Search if app.search.is_editing() => &[
                (" ↑↓ ", "Field"),
                ("  Esc ", "Results"),
                ("  Tab ", "Switch"),
                ("  ^C ", "Quit"),
            ],
            Tab::Search => &[
                (" ↑↓ ", "Navigate"),
                ("  ↵ ", "Open"),
                ("  Tab ", "Switch"),
                ("  ? ", "Help"),
                ("  q ", "Quit"),
            ],
        }
    };

    let hints: Vec<Span> = pairs
        .iter()
        .flat_map(|(key, action)| hint(key, action))
        .collect();

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 55;
    let popup_height = 22;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height).intersection(area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let shortcuts = [
        ("  ↑/↓ or j/k    ", "Navigate list / search fields"),
        ("  ←/→ or h/l    ", "Previous / next page"),
        ("  +/-           ", "Change posts per page"),
        ("  /             ", "Filter posts by text"),
        ("  Enter         ", "Open post / save edit"),
        ("  Esc           ", "Close / cancel"),
        ("  e             ", "Edit open post"),
        ("  Tab           ", "Switch tabs / editor field"),
        ("  r             ", "Refetch current page"),
        ("  c             ", "Clear session cache"),
        ("  ?             ", "Show/hide this help"),
        ("  q             ", "Quit"),
        ("  Ctrl-C        ", "Quit, even while typing"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(shortcuts.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(*key, Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::api::mock::{MockPostsApi, sample_article};
    use crate::cache::MemoryStore;
    use crate::config::Config;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn test_app() -> App {
        App::new(
            Arc::new(MockPostsApi::with_posts(5)),
            Arc::new(MemoryStore::new()),
            &Config::default(),
        )
    }

    #[tokio::test]
    async fn test_draw_posts_tab() {
        let mut app = test_app();
        app.posts.posts = vec![sample_article(1), sample_article(2)];
        app.posts.total_pages = 1;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Post number 2"));
        assert!(text.contains("page 1/1"));
    }

    #[tokio::test]
    async fn test_draw_detail_and_help() {
        let mut app = test_app();
        app.active_tab = Tab::Search;
        app.detail = Some(crate::state::PostDetailState::open(
            sample_article(4),
            &(Arc::new(MockPostsApi::with_posts(5)) as Arc<dyn crate::api::PostsApi>),
            &tokio::sync::mpsc::unbounded_channel().0,
        ));
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Comments"));
    }
}
