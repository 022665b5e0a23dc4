// Search tab: id/title/body inputs, the id lookup result, and the results list.

use ratatui::{prelude::*, widgets::*};

use crate::state::search::SearchField;
use crate::state::{SearchFocus, SearchState};

use super::list;

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool, pending: bool) -> Paragraph<'a> {
    let mut spans = vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    // Debounce timer still running
    if pending {
        spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
    }

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
}

pub fn draw_search_tab(frame: &mut Frame, search: &mut SearchState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Id input
            Constraint::Length(2), // Id result / error
            Constraint::Length(3), // Title input
            Constraint::Length(3), // Body input
            Constraint::Min(1),    // Results
        ])
        .split(area);

    frame.render_widget(
        input_line(
            "Id:    ",
            search.by_id_query(),
            search.focus == SearchFocus::Id,
            search.is_pending(SearchField::Id),
        ),
        chunks[0],
    );
    draw_id_result(frame, search, chunks[1]);
    frame.render_widget(
        input_line(
            "Title: ",
            search.title_query(),
            search.focus == SearchFocus::Title,
            search.is_pending(SearchField::Title),
        ),
        chunks[2],
    );
    frame.render_widget(
        input_line(
            "Body:  ",
            search.body_query(),
            search.focus == SearchFocus::Body,
            search.is_pending(SearchField::Body),
        ),
        chunks[3],
    );

    let focused = search.focus == SearchFocus::Results;
    list::render_results_list(
        frame,
        search.search_results.as_deref(),
        &mut search.list_state,
        search.searching,
        focused,
        chunks[4],
    );
}

fn draw_id_result(frame: &mut Frame, search: &SearchState, area: Rect) {
    let line = if let Some(error) = &search.id_error {
        Line::from(Span::styled(
            format!(" ❌ {}", error),
            Style::default().fg(Color::Red),
        ))
    } else if search.id_loading {
        Line::from(Span::styled(
            " ⏳ Looking up post...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(article) = &search.explicit_id_result {
        Line::from(vec![
            Span::styled(
                format!(" #{} ", article.id),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(&article.title, Style::default().fg(Color::Green)),
            Span::styled("  ↵ open", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line), area);
}
