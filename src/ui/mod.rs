use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use regex::Regex;
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, DeleteOverlay, OverlayState};
use crate::app::{FormField, FormState};
use crate::config::themes::Theme;
use crate::highlight::build_highlight_regex;
use crate::query::{CategoryFilter, View};
use crate::store::Category;

pub fn draw_app(frame: &mut Frame, state: &AppState, list_state: &mut ListState, theme: &Theme) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Percentage(40),
            Constraint::Min(20),
        ])
        .split(vertical[0]);

    let highlight_regex = build_highlight_regex(state.filter.search.trim());
    let highlight_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);

    draw_sidebar(frame, state, columns[0], theme);
    draw_idea_list(
        frame,
        state,
        list_state,
        columns[1],
        highlight_regex.as_ref(),
        highlight_style,
        theme,
    );
    draw_detail(
        frame,
        state,
        columns[2],
        highlight_regex.as_ref(),
        highlight_style,
        theme,
    );

    let status = build_status_line(state, theme);
    let status_paragraph = Paragraph::new(status).style(Style::default().fg(theme.muted));
    frame.render_widget(status_paragraph, vertical[1]);

    render_overlay(frame, state, theme);
}

fn draw_sidebar(frame: &mut Frame, state: &AppState, area: Rect, theme: &Theme) {
    let counts = &state.model.counts;
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Views",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (view, count) in [
        (View::All, counts.all),
        (View::Active, counts.active),
        (View::Archived, counts.archived),
    ] {
        let marker = if state.filter.view == view { "▸" } else { " " };
        let style = if state.filter.view == view {
            Style::default().fg(theme.accent)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {view:<9} {count}"),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Categories",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for category in Category::iter() {
        let count = counts.per_category.get(&category).copied().unwrap_or(0);
        let selected = state.filter.category == CategoryFilter::Only(category);
        let marker = if selected { "▸" } else { " " };
        let style = if selected {
            Style::default().fg(theme.accent)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {category:<9} {count}"),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tags",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if counts.per_tag.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none)",
            Style::default().fg(theme.faint),
        )));
    }
    for (tag, count) in &counts.per_tag {
        let selected = state.active_tag() == Some(tag.as_str());
        let marker = if selected { "▸" } else { " " };
        let style = if selected {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.tag)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} #{tag} {count}"),
            style,
        )));
    }

    let sidebar =
        Paragraph::new(lines).block(Block::default().title("Filters").borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn draw_idea_list(
    frame: &mut Frame,
    state: &AppState,
    list_state: &mut ListState,
    area: Rect,
    highlight_regex: Option<&Regex>,
    highlight_style: Style,
    theme: &Theme,
) {
    let mut items = Vec::with_capacity(state.model.rows.len());
    for row in &state.model.rows {
        let mut title_spans = Vec::new();
        if row.archived {
            title_spans.push(Span::styled(
                "[A] ",
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        title_spans.extend(highlight_line(
            &row.title,
            highlight_regex,
            highlight_style,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let title_line = Line::from(title_spans);

        let meta_line = Line::from(vec![
            Span::styled(
                row.category.to_string(),
                Style::default().fg(theme.category),
            ),
            Span::styled(
                format!(" • created {}", row.created_label),
                Style::default().fg(theme.muted),
            ),
        ]);

        let mut lines = vec![title_line, meta_line];
        if let Some(tag_line) =
            render_tag_line(&row.tags, highlight_regex, highlight_style, theme.tag)
        {
            lines.push(tag_line);
        }
        if row.preview.is_empty() {
            lines.push(Line::from(""));
        } else {
            for line in row.preview.lines() {
                lines.push(Line::from(highlight_line(
                    line,
                    highlight_regex,
                    highlight_style,
                    Style::default(),
                )));
            }
        }
        items.push(ListItem::new(lines));
    }
    if items.is_empty() {
        if state.filter.has_search()
            || state.filter.category != CategoryFilter::All
            || state.active_tag().is_some()
        {
            items.push(ListItem::new("Nothing matches the current filters."));
        } else {
            items.push(ListItem::new("No ideas yet. Press `a` to log one."));
        }
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(state.model.heading.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, list_state);
}

fn draw_detail(
    frame: &mut Frame,
    state: &AppState,
    area: Rect,
    highlight_regex: Option<&Regex>,
    highlight_style: Style,
    theme: &Theme,
) {
    let detail_text: Text = state
        .selected_row()
        .and_then(|row| state.store.get(row.id))
        .map(|idea| {
            let mut lines = Vec::new();
            let mut header_spans = Vec::new();
            if idea.archived {
                header_spans.push(Span::styled(
                    "[A] ",
                    Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            header_spans.extend(highlight_line(
                &idea.title,
                highlight_regex,
                highlight_style,
                Style::default().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::from(header_spans));
            lines.push(Line::from(vec![
                Span::styled(format!("#{}", idea.id), Style::default().fg(theme.faint)),
                Span::styled(
                    format!(" • {}", idea.category),
                    Style::default().fg(theme.category),
                ),
            ]));
            let tags: Vec<String> = idea.tags.iter().cloned().collect();
            if let Some(tag_line) =
                render_tag_line(&tags, highlight_regex, highlight_style, theme.tag)
            {
                lines.push(tag_line);
            }
            lines.push(Line::from(""));
            if idea.content.is_empty() {
                lines.push(Line::from(Span::styled(
                    "(no description)",
                    Style::default().fg(theme.faint),
                )));
            } else {
                for line in idea.content.lines() {
                    lines.push(Line::from(highlight_line(
                        line,
                        highlight_regex,
                        highlight_style,
                        Style::default(),
                    )));
                }
            }
            Text::from(lines)
        })
        .unwrap_or_else(|| Text::from("Select an idea to see its details."));

    let detail = Paragraph::new(detail_text)
        .block(Block::default().title("Idea").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
}

fn build_status_line(state: &AppState, theme: &Theme) -> Text<'static> {
    let position = if state.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", state.selected + 1, state.len())
    };

    let mut spans = vec![
        Span::raw(format!(
            "Showing {} of {} ",
            state.model.visible, state.model.total
        )),
        Span::raw("| Selected: "),
        Span::styled(position, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" | Sort: "),
        Span::styled(
            state.sort.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if state.search_active || state.filter.has_search() {
        let label_style = if state.search_active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::raw(" | Search "));
        spans.push(Span::styled("/", label_style));
        if state.filter.search.is_empty() {
            spans.push(Span::styled(
                "(type to search)",
                Style::default().fg(theme.faint),
            ));
        } else {
            spans.push(Span::styled(
                state.filter.search.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if state.search_active {
            spans.push(Span::styled(" ▌", Style::default().fg(theme.accent)));
        }
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(theme.accent),
        ));
    }

    let mut lines = Vec::with_capacity(3);
    lines.push(Line::from(spans));
    lines.push(Line::from(Span::styled(
        "Keys: j/k move • a add • e edit • A archive • d delete • / search",
        Style::default().fg(theme.faint),
    )));
    lines.push(Line::from(Span::styled(
        "      v view • c category • t tag • s sort • q quit",
        Style::default().fg(theme.faint),
    )));
    Text::from(lines)
}

fn highlight_line(
    text: &str,
    regex: Option<&Regex>,
    highlight_style: Style,
    base_style: Style,
) -> Vec<Span<'static>> {
    if let Some(re) = regex {
        let mut spans = Vec::new();
        let mut last = 0;
        for mat in re.find_iter(text) {
            if mat.start() > last {
                spans.push(Span::styled(
                    text[last..mat.start()].to_string(),
                    base_style,
                ));
            }
            spans.push(Span::styled(mat.as_str().to_string(), highlight_style));
            last = mat.end();
        }
        if last < text.len() {
            spans.push(Span::styled(text[last..].to_string(), base_style));
        }
        if spans.is_empty() {
            spans.push(Span::styled(text.to_string(), base_style));
        }
        spans
    } else {
        vec![Span::styled(text.to_string(), base_style)]
    }
}

fn render_tag_line(
    tags: &[String],
    regex: Option<&Regex>,
    highlight_style: Style,
    tag_color: ratatui::style::Color,
) -> Option<Line<'static>> {
    if tags.is_empty() {
        return None;
    }
    let base_style = Style::default().fg(tag_color);
    let mut spans = Vec::new();
    for (idx, tag) in tags.iter().enumerate() {
        let token = format!("#{tag}");
        spans.extend(highlight_line(&token, regex, highlight_style, base_style));
        if idx + 1 < tags.len() {
            spans.push(Span::raw(" "));
        }
    }
    Some(Line::from(spans))
}

fn render_overlay(frame: &mut Frame, state: &AppState, theme: &Theme) {
    match state.overlay() {
        Some(OverlayState::Form(form)) => render_form(frame, form, theme),
        Some(OverlayState::ConfirmDelete(overlay)) => render_delete_confirm(frame, overlay, theme),
        None => {}
    }
}

fn render_form(frame: &mut Frame, form: &FormState, theme: &Theme) {
    let area = centered_rect(70, 70, frame.size());
    frame.render_widget(Clear, area);

    let focused = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let unfocused = Style::default().fg(theme.muted);
    let field_label = |field: FormField, label: &str| {
        let style = if form.focus == field { focused } else { unfocused };
        let marker = if form.focus == field { "▸ " } else { "  " };
        Span::styled(format!("{marker}{label}"), style)
    };

    let mut lines = Vec::new();
    let heading = if form.is_editing() {
        "Edit Idea"
    } else {
        "New Idea"
    };
    lines.push(Line::from(Span::styled(
        heading,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(field_label(FormField::Title, "Title")));
    let mut title_display = form.title.clone();
    if form.focus == FormField::Title {
        title_display.push('▌');
    }
    lines.push(Line::from(format!("  {title_display}")));
    lines.push(Line::from(""));

    lines.push(Line::from(field_label(FormField::Content, "Description")));
    if form.content.is_empty() && form.focus != FormField::Content {
        lines.push(Line::from(Span::styled(
            "  (empty)",
            Style::default().fg(theme.faint),
        )));
    } else {
        let mut body_lines: Vec<String> = form.content.lines().map(str::to_string).collect();
        if form.content.ends_with('\n') || body_lines.is_empty() {
            body_lines.push(String::new());
        }
        let last = body_lines.len() - 1;
        for (idx, line) in body_lines.into_iter().enumerate() {
            let mut display = line;
            if idx == last && form.focus == FormField::Content {
                display.push('▌');
            }
            lines.push(Line::from(format!("  {display}")));
        }
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        field_label(FormField::Category, "Category"),
        Span::raw("  "),
        Span::styled(
            format!("◂ {} ▸", form.category),
            Style::default().fg(theme.category),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(field_label(FormField::Tags, "Tags")));
    let mut tag_spans = vec![Span::raw("  ")];
    for tag in &form.pending_tags {
        tag_spans.push(Span::styled(
            format!("#{tag} "),
            Style::default().fg(theme.tag),
        ));
    }
    if form.focus == FormField::Tags {
        tag_spans.push(Span::styled(
            format!("{}▌", form.tag_input),
            Style::default(),
        ));
    } else if form.pending_tags.is_empty() {
        tag_spans.push(Span::styled("(none)", Style::default().fg(theme.faint)));
    }
    lines.push(Line::from(tag_spans));
    lines.push(Line::from(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Tab next field • Enter commit tag / newline • Ctrl-s save • Esc cancel",
        Style::default().fg(theme.muted),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(heading)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_delete_confirm(frame: &mut Frame, overlay: &DeleteOverlay, theme: &Theme) {
    let area = centered_rect(60, 30, frame.size());
    frame.render_widget(Clear, area);
    let title = truncate_for_width(&overlay.title, area.width.saturating_sub(12) as usize);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            "Delete Idea",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Permanently delete '{title}'?")),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(theme.danger),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter or y confirm • Esc or n cancel",
            Style::default().fg(theme.muted),
        )),
    ])
    .block(
        Block::default()
            .title(format!("Confirm Delete (#{})", overlay.id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.danger)),
    )
    .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn truncate_for_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = UnicodeWidthStr::width(ch.to_string().as_str());
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};

    fn span_texts(spans: &[Span<'static>]) -> Vec<String> {
        spans
            .iter()
            .map(|span| span.content.clone().into_owned())
            .collect()
    }

    #[test]
    fn highlight_splits_around_the_match() {
        let regex = build_highlight_regex("proto").expect("regex");
        let spans = highlight_line(
            "A Prototype app",
            Some(&regex),
            Style::default(),
            Style::default(),
        );
        assert_eq!(
            span_texts(&spans),
            vec![
                String::from("A "),
                String::from("Proto"),
                String::from("type app")
            ]
        );
    }

    #[test]
    fn tag_line_joins_tags_with_spaces() {
        let tags = vec!["urgent".to_string(), "later".to_string()];
        let line = render_tag_line(&tags, None, Style::default(), Color::Green).expect("line");
        let texts: Vec<_> = line
            .spans
            .iter()
            .map(|span| span.content.clone().into_owned())
            .collect();
        assert_eq!(texts, vec!["#urgent", " ", "#later"]);
    }

    #[test]
    fn truncation_appends_an_ellipsis() {
        assert_eq!(truncate_for_width("short", 20), "short");
        let truncated = truncate_for_width("a very long idea title", 8);
        assert!(truncated.ends_with('…'));
        assert!(truncated.len() < "a very long idea title".len());
    }
}
