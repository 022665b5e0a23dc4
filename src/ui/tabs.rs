// Tab bar rendering with a result-count badge on the Search tab.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Posts, Tab::Search];
    let result_count = app.search.search_results.as_ref().map_or(0, Vec::len);

    let tab_titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let title = if *tab == Tab::Search && result_count > 0 {
                format!("{} ({})", tab.title(), result_count)
            } else {
                tab.title().to_string()
            };

            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let selected_index = tabs.iter().position(|t| *t == app.active_tab).unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" postdeck ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
