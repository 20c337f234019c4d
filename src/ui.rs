use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use crate::app::{App, ConnectionStatus, Focus};
use crate::input::{QUICK_ACTIONS, SUGGESTIONS};
use crate::session::Sender;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // Unterminated (or still being typed out): keep it literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let input_rows = app.input.visible_rows(area.width.saturating_sub(2));
    let suggestions_height = if app.suggestions_visible() {
        SUGGESTIONS.len() as u16 + 2
    } else {
        0
    };

    let [header_area, body_area, info_area, suggestions_area, input_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(suggestions_height),
            Constraint::Length(input_rows + 2),
            Constraint::Length(1),
        ])
        .areas(area);

    render_header(app, frame, header_area);

    if app.session.welcome_visible() {
        render_welcome(app, frame, body_area);
    } else {
        render_transcript(app, frame, body_area);
    }

    let info = Paragraph::new(app.model_info())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(info, info_area);

    if suggestions_height > 0 {
        render_suggestions(app, frame, suggestions_area);
    }
    render_input(app, frame, input_area, input_rows);
    render_footer(app, frame, footer_area);

    // Popups
    if let Some(message) = app.alert.clone() {
        render_alert(&message, frame, area);
    } else if app.show_model_picker {
        render_model_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status_color = match app.status {
        ConnectionStatus::Checking => Color::Yellow,
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Offline => Color::Red,
    };

    let count = app.session.message_count();
    let count_indicator = if count > 0 {
        format!(" [{} messages]", count)
    } else {
        String::new()
    };

    let title = Line::from(vec![
        Span::styled(" NeuralChat AI ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("● ", Style::default().fg(status_color)),
        Span::styled(app.status.label(), Style::default().fg(Color::White)),
        Span::styled(count_indicator, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_welcome(app: &mut App, frame: &mut Frame, area: Rect) {
    let [greeting_area, actions_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(area);

    let greeting = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "Welcome to NeuralChat AI",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Ask anything, or pick a quick action to get started.",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(greeting, greeting_area);

    let focused = app.focus == Focus::QuickActions;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(" Quick actions (Tab to focus) ");

    let items: Vec<ListItem> = QUICK_ACTIONS
        .iter()
        .enumerate()
        .map(|(i, action)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(action.title, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", action.prompt), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, actions_area, &mut app.quick_action_state);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, for scroll calculations
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);
    if app.session.follow_bottom {
        app.scroll_to_bottom();
    }

    let focused = app.focus == Focus::Transcript;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(format!(" Chat: {} ", app.selected_model));

    let mut lines: Vec<Line> = Vec::new();

    for (idx, turn) in app.session.turns().iter().enumerate() {
        let text = app.session.visible_text(idx);
        match turn.sender {
            Sender::User => {
                lines.push(
                    Line::from(Span::styled(
                        "You",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                );
                for line in text.lines() {
                    lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
                }
                lines.push(
                    Line::from(Span::styled(turn.time_label(), Style::default().fg(Color::DarkGray)))
                        .alignment(Alignment::Right),
                );
            }
            Sender::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in text.lines() {
                    lines.push(parse_markdown_line(line));
                }
                if text.is_empty() {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(
                    turn.time_label(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::default());
    }

    if app.session.awaiting_reply() {
        lines.push(Line::from(Span::styled(
            "AI",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.session.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_suggestions(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Suggestions (↑/↓, Enter to use) ");

    let items: Vec<ListItem> = SUGGESTIONS
        .iter()
        .map(|s| ListItem::new(format!(" {} ", s)).style(Style::default().fg(Color::DarkGray)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.suggestion_state);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect, rows: u16) {
    let focused = app.focus == Focus::Input;
    let border_color = if app.is_waiting() {
        Color::DarkGray
    } else if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let title = if app.is_waiting() {
        " Waiting for reply... "
    } else {
        " Message (Enter to send, Alt+Enter for newline) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Hard-wrap at the inner width so the cursor math matches what is drawn
    let width = area.width.saturating_sub(2).max(1);
    let lines: Vec<Line> = app
        .input
        .wrapped_lines(width)
        .into_iter()
        .map(Line::from)
        .collect();

    let (cursor_row, cursor_col) = app.input.cursor_position(width);
    let scroll = cursor_row.saturating_sub(rows.saturating_sub(1));

    let input = Paragraph::new(lines)
        .style(Style::default().fg(Color::Cyan))
        .block(block)
        .scroll((scroll, 0));

    frame.render_widget(input, area);

    if focused && !app.show_model_picker && app.alert.is_none() {
        frame.set_cursor_position((
            area.x + 1 + cursor_col,
            area.y + 1 + cursor_row - scroll,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style) = match app.focus {
        Focus::Input => (" INPUT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        Focus::QuickActions => (" ACTIONS ", Style::default().bg(Color::Blue).fg(Color::White)),
        Focus::Transcript => (" CHAT ", Style::default().bg(Color::Blue).fg(Color::White)),
    };

    let mut hints = match app.focus {
        Focus::Input => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Alt+Enter ", key_style),
            Span::styled(" newline ", label_style),
        ],
        Focus::QuickActions => vec![
            Span::styled(" 1-4 ", key_style),
            Span::styled(" ask ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
        ],
        Focus::Transcript => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };
    hints.extend(vec![
        Span::styled(" Tab ", key_style),
        Span::styled(" focus ", label_style),
        Span::styled(" ^N ", key_style),
        Span::styled(" new chat ", label_style),
        Span::styled(" ^L ", key_style),
        Span::styled(" model ", label_style),
        Span::styled(" ^C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn render_model_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 44, app.model_options.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Select Model (Enter to select, Esc to cancel) ");

    let items: Vec<ListItem> = app
        .model_options
        .iter()
        .map(|model| {
            let style = if model.id == app.selected_model {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ", model.label)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.model_picker_state);
}

fn render_alert(message: &str, frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 60, message.lines().count() as u16 + 4);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Alert (Enter to dismiss) ");

    let alert = Paragraph::new(message.to_string())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(alert, popup_area);
}
