// Post detail overlay.
// Shows a post with its author, reactions, and comments, plus the inline editor.

use ratatui::{prelude::*, widgets::*};

use crate::state::{EditField, LoadingState, PostDetailState};

/// Draw the detail overlay on top of the current view.
pub fn draw_detail(frame: &mut Frame, detail: &PostDetailState) {
    let area = frame.area();

    // Centered, leaving a margin around the tabs underneath
    let modal_width = area.width.saturating_sub(8).min(100);
    let modal_height = area.height.saturating_sub(4);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Post or editor
            Constraint::Length(8), // Comments
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    if detail.editor.is_some() {
        draw_editor(frame, detail, chunks[0]);
    } else {
        draw_post(frame, detail, chunks[0]);
    }
    draw_comments(frame, detail, chunks[1]);
    draw_instructions(frame, detail, chunks[2]);
}

fn draw_post(frame: &mut Frame, detail: &PostDetailState, area: Rect) {
    let post = &detail.post;

    let author = match &detail.author {
        LoadingState::Idle => Span::styled("unknown author", Style::default().fg(Color::DarkGray)),
        LoadingState::Loading => Span::styled("loading author...", Style::default().fg(Color::Yellow)),
        LoadingState::Error(_) => Span::styled("author unavailable", Style::default().fg(Color::Red)),
        LoadingState::Loaded(user) => Span::styled(
            format!(
                "{} · {}, {}",
                user.full_name(),
                user.company.title,
                user.company.department
            ),
            Style::default().fg(Color::Magenta),
        ),
    };

    let mut lines = vec![
        Line::from(vec![Span::styled("by ", Style::default().fg(Color::DarkGray)), author]),
        Line::from(vec![
            Span::styled(
                format!("👍 {}  👎 {}", post.reactions.likes, post.reactions.dislikes),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                post.reactions
                    .views
                    .map(|v| format!("  👁 {}", v))
                    .unwrap_or_default(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(Span::styled(
            tags.join(" "),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(post.body.lines().map(Line::from));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" #{} {} ", post.id, post.title))
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_editor(frame: &mut Frame, detail: &PostDetailState, area: Rect) {
    let Some(editor) = &detail.editor else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Save status
        ])
        .split(area);

    let field_block = |title: &'static str, focused: bool| {
        let color = if focused { Color::Cyan } else { Color::DarkGray };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
    };
    let cursor = Span::styled("█", Style::default().fg(Color::Yellow));

    let title_focused = editor.field == EditField::Title;
    let mut title_spans = vec![Span::raw(editor.title.as_str())];
    if title_focused {
        title_spans.push(cursor.clone());
    }
    frame.render_widget(
        Paragraph::new(Line::from(title_spans)).block(field_block(" Title ", title_focused)),
        chunks[0],
    );

    let mut body_text = Text::from(editor.body.as_str());
    if !title_focused {
        if body_text.lines.is_empty() {
            body_text.lines.push(Line::default());
        }
        if let Some(last) = body_text.lines.last_mut() {
            last.spans.push(cursor);
        }
    }
    frame.render_widget(
        Paragraph::new(body_text)
            .block(field_block(" Body ", !title_focused))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );

    let status = if detail.saving {
        Line::from(Span::styled(" ⏳ Saving...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &detail.save_error {
        Line::from(Span::styled(
            format!(" ❌ {}", error),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);
}

fn draw_comments(frame: &mut Frame, detail: &PostDetailState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Comments ");

    let lines: Vec<Line> = match &detail.comments {
        LoadingState::Idle => Vec::new(),
        LoadingState::Loading => vec![Line::from(Span::styled(
            "⏳ Loading comments...",
            Style::default().fg(Color::Yellow),
        ))],
        LoadingState::Error(e) => vec![Line::from(Span::styled(
            format!("❌ {}", e),
            Style::default().fg(Color::Red),
        ))],
        LoadingState::Loaded(comments) if comments.is_empty() => vec![Line::from(Span::styled(
            "No comments",
            Style::default().fg(Color::DarkGray),
        ))],
        LoadingState::Loaded(comments) => comments
            .iter()
            .map(|comment| {
                Line::from(vec![
                    Span::styled(
                        format!("@{}: ", comment.user.username),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(comment.body.as_str()),
                ])
            })
            .collect(),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_instructions(frame: &mut Frame, detail: &PostDetailState, area: Rect) {
    let instructions = if detail.is_editing() {
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" = Save  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::styled(" = Title/Body  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" e", Style::default().fg(Color::Yellow)),
            Span::styled(" = Edit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("↑↓", Style::default().fg(Color::Yellow)),
            Span::styled(" = Scroll  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Close ", Style::default().fg(Color::DarkGray)),
        ])
    };

    let instructions_widget = Paragraph::new(instructions).alignment(Alignment::Center);
    frame.render_widget(instructions_widget, area);
}
