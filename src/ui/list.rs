// List rendering for posts and search results.
// Provides styled list views with loading, error, and empty states.

use ratatui::{prelude::*, widgets::*};

use crate::api::Article;
use crate::state::PostListState;

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

pub fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// One list row: id, title, and reaction counts.
pub fn post_item(article: &Article) -> ListItem<'_> {
    let mut spans = vec![
        Span::styled(
            format!("#{:<4}", article.id),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(&article.title, Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  👍 {} 👎 {}", article.reactions.likes, article.reactions.dislikes),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(views) = article.reactions.views {
        spans.push(Span::styled(
            format!("  👁 {}", views),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}

/// Render the paged post list.
pub fn render_posts_list(frame: &mut Frame, posts: &mut PostListState, area: Rect) {
    let title = if posts.text_query().trim().is_empty() {
        format!(
            " Posts · page {}/{} · {} per page ",
            posts.current_page(),
            posts.total_pages.max(1),
            posts.limit()
        )
    } else {
        format!(" Posts matching \"{}\" ", posts.text_query().trim())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if posts.is_loading && posts.posts.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_loading(frame, inner, "Loading posts");
        return;
    }
    if let Some(error) = &posts.error {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_error(frame, inner, error);
        return;
    }
    if posts.posts.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No posts found");
        return;
    }

    let block = if posts.is_loading {
        block.title_bottom(Line::from(" ⏳ refreshing ").right_aligned())
    } else {
        block
    };

    let items: Vec<ListItem> = posts.posts.iter().map(post_item).collect();
    let list_widget = List::new(items)
        .block(block)
        .highlight_style(highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut posts.list_state);
}

/// Render title/body search results. `None` means no search has been made.
pub fn render_results_list(
    frame: &mut Frame,
    results: Option<&[Article]>,
    list_state: &mut ListState,
    searching: bool,
    focused: bool,
    area: Rect,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Results ");

    let Some(results) = results else {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if searching {
            render_loading(frame, inner, "Searching");
        } else {
            render_empty(frame, inner, "Type a title or body to search");
        }
        return;
    };

    if results.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if searching {
            render_loading(frame, inner, "Searching");
        } else {
            render_empty(frame, inner, "No matching posts");
        }
        return;
    }

    let block = block.title(format!(" {} found ", results.len()));
    let items: Vec<ListItem> = results.iter().map(post_item).collect();
    let list_widget = List::new(items)
        .block(block)
        .highlight_style(highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, list_state);
}
