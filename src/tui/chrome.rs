// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, overlay, and wrapping helpers used by TUI rendering.
fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push_str(" · ");
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn clamp_to_u16(value: usize) -> u16 {
    value.min(u16::MAX as usize) as u16
}

/// Greedy word wrap by character count. Words longer than `width` are split hard.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.replace('\t', "    ");
        let mut line = String::new();
        let mut len = 0usize;
        for word in raw.split_inclusive(' ') {
            let word_len = word.chars().count();
            let visible = word.trim_end_matches(' ').chars().count();
            if len > 0 && len + visible > width {
                out.push(line.trim_end().to_owned());
                line.clear();
                len = 0;
            }
            if visible > width {
                for ch in word.chars() {
                    if len == width {
                        out.push(std::mem::take(&mut line));
                        len = 0;
                    }
                    line.push(ch);
                    len += 1;
                }
            } else {
                line.push_str(word);
                len += word_len;
            }
        }
        out.push(line.trim_end().to_owned());
    }
    out
}

fn conversation_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let turns = app.session.log().turns();
    let citation_turn = turns.iter().rposition(|turn| !turn.citations().is_empty());
    let mut lines = Vec::new();

    for (idx, turn) in turns.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            author_label(turn.author()).to_owned(),
            app.theme.author_style(turn.author()),
        )));

        let body_style = if turn.body().starts_with("error occurred:") {
            app.theme.error_style()
        } else {
            app.theme.base_style()
        };
        for text in wrap_text(&render::display_text(turn), width) {
            lines.push(Line::from(Span::styled(text, body_style)));
        }

        for (cidx, citation) in turn.citations().iter().enumerate() {
            let selected = citation_turn == Some(idx) && app.citation_cursor == Some(cidx);
            let style =
                if selected { app.theme.selection_style() } else { app.theme.citation_style() };
            for text in wrap_text(&render::citation_label(citation), width) {
                lines.push(Line::from(Span::styled(text, style)));
            }
        }
    }

    lines
}

fn footer_line(app: &App, toast: Option<&str>) -> Line<'static> {
    let busy = app.session.is_busy();
    let mut spans = Vec::new();
    spans.push(Span::styled(format!("{FOOTER_BRAND} "), app.theme.author_style(Author::Agent)));

    let mut entries = Vec::new();
    if busy {
        push_footer_entry(&mut entries, &app.theme, "stop", "Esc");
    } else {
        push_footer_entry(&mut entries, &app.theme, "send", "Enter");
    }
    push_footer_entry_maybe_disabled(&mut entries, &app.theme, "menu", "F2", busy);
    push_footer_entry(&mut entries, &app.theme, "help", "F1");
    if !app.citations().is_empty() {
        push_footer_entry(&mut entries, &app.theme, "cite", "Tab");
    }
    push_footer_entry(&mut entries, &app.theme, "quit", "^C");
    spans.extend(entries);

    if let Some(toast) = toast {
        spans.push(Span::styled(format!("  {toast}"), app.theme.key_style()));
    }
    Line::from(spans)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_KEYS: &[(&str, &str)] = &[
    ("Enter", "send message"),
    ("Esc", "stop generation / close overlay"),
    ("F1", "toggle this help"),
    ("F2", "actions menu"),
    ("Tab/S-Tab", "select a citation"),
    ("^P", "preview the selected citation"),
    ("^Y", "copy the citation path (OSC52)"),
    ("^T", "toggle light/dark theme"),
    ("PgUp/PgDn", "scroll the conversation"),
    ("^C, ^Q", "quit"),
];

const PICKER_KEYS: &[(&str, &str)] =
    &[("Enter", "open folder"), ("Bksp", "parent folder"), ("Tab", "breadcrumbs"), ("s", "select")];

fn render_help(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let area = centered_rect(70, 70, main_area);
    frame.render_widget(Clear, area);

    let key_width = HELP_KEYS.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let mut lines: Vec<Line<'static>> = HELP_KEYS
        .iter()
        .map(|(key, desc)| help_kv(key, desc, key_width, app.theme.key_style()))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Folder picker", app.theme.dim_style())));
    lines.extend(
        PICKER_KEYS.iter().map(|(key, desc)| help_kv(key, desc, key_width, app.theme.key_style())),
    );
    lines.push(Line::default());
    for text in render::HELP_TEXT.lines() {
        lines.push(Line::from(Span::styled(text.to_owned(), app.theme.dim_style())));
    }

    let help = Paragraph::new(lines)
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Help", Some("Esc to close")))
                .border_style(app.theme.panel_border_style(true)),
        );
    frame.render_widget(help, area);
}

fn render_menu(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let height = clamp_to_u16(Action::ALL.len() + 2);
    let width = 30.min(main_area.width);
    let area = Rect { x: main_area.x + 1, y: main_area.y + 1, width, height: height.min(main_area.height) };
    frame.render_widget(Clear, area);

    let items: Vec<ListItem<'static>> =
        Action::ALL.iter().map(|action| ListItem::new(action.label().to_owned())).collect();
    let mut state = ListState::default().with_selected(app.menu);
    let menu = List::new(items)
        .style(app.theme.base_style())
        .highlight_style(app.theme.selection_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Actions", None))
                .border_style(app.theme.panel_border_style(true)),
        );
    frame.render_stateful_widget(menu, area, &mut state);
}

fn render_picker(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(80, 80, main_area);
    frame.render_widget(Clear, area);

    let navigator = app.session.navigator();
    let tail = match navigator.phase() {
        NavigatorPhase::Loading => Some("loading…"),
        _ => None,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title(selection_title(navigator.pending()), tail))
        .title_bottom(Line::from(" Enter open · Bksp up · Tab crumbs · s select · Esc cancel "))
        .border_style(app.theme.panel_border_style(true))
        .style(app.theme.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let mut crumb_spans = Vec::new();
    for (idx, crumb) in navigator.crumbs().iter().enumerate() {
        if idx > 0 {
            crumb_spans.push(Span::styled(" › ", app.theme.dim_style()));
        }
        let style = if app.crumb_cursor == Some(idx) {
            app.theme.selection_style()
        } else {
            app.theme.key_style()
        };
        crumb_spans.push(Span::styled(crumb.name.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(crumb_spans)), rows[0]);

    let Some(state) = navigator.state() else {
        let waiting = Paragraph::new(Span::styled("loading…", app.theme.dim_style()));
        frame.render_widget(waiting, rows[1]);
        return;
    };
    if state.entries.is_empty() {
        let empty = Paragraph::new(Span::styled("(empty folder)", app.theme.dim_style()));
        frame.render_widget(empty, rows[1]);
        return;
    }

    let items: Vec<ListItem<'static>> = state
        .entries
        .iter()
        .map(|entry| {
            if entry.is_directory() {
                ListItem::new(format!("▸ {}/", entry.name)).style(app.theme.key_style())
            } else {
                ListItem::new(format!("  {}", entry.name)).style(app.theme.dim_style())
            }
        })
        .collect();
    let highlight = if app.crumb_cursor.is_some() {
        app.theme.base_style()
    } else {
        app.theme.selection_style()
    };
    let list = List::new(items).highlight_style(highlight);
    frame.render_stateful_widget(list, rows[1], &mut app.picker_state);
}

fn render_memory(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(80, 80, main_area);
    frame.render_widget(Clear, area);

    let memory = app.session.memory();
    let tail = if memory.is_loading() { Some("loading…") } else { None };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Memory", tail))
        .title_bottom(Line::from(" d delete · r refresh · R reset all · Esc close "))
        .border_style(app.theme.panel_border_style(true))
        .style(app.theme.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    if let Some(notice) = memory.notice() {
        frame.render_widget(
            Paragraph::new(Span::styled(notice.to_owned(), app.theme.error_style())),
            rows[0],
        );
    }

    if memory.files().is_empty() {
        let text = if memory.is_loading() { "" } else { "no ingested documents." };
        frame.render_widget(Paragraph::new(Span::styled(text, app.theme.dim_style())), rows[1]);
        return;
    }

    let items: Vec<ListItem<'static>> = memory
        .files()
        .iter()
        .map(|file| ListItem::new(format!("{}  ({} chunks)", file.path, file.chunk_count)))
        .collect();
    let list = List::new(items).highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(list, rows[1], &mut app.memory_state);
}

fn render_interaction(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let Some(interaction) = app.session.pending_interaction() else {
        return;
    };
    let area = centered_rect(60, 30, main_area);
    frame.render_widget(Clear, area);

    let (title, message, footer) = match interaction {
        Interaction::Confirm { message } => ("Confirm", message.as_str(), "y yes · n no"),
        Interaction::Prompt { message, .. } => ("Input", message.as_str(), "Enter ok · Esc cancel"),
    };
    let mut lines: Vec<Line<'static>> =
        message.lines().map(|line| Line::from(line.to_owned())).collect();
    if matches!(interaction, Interaction::Prompt { .. }) {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("> ", app.theme.key_style()),
            Span::raw(app.prompt_input.clone()),
        ]));
    }

    let dialog = Paragraph::new(lines)
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title(title, None))
                .title_bottom(Line::from(format!(" {footer} ")))
                .border_style(app.theme.panel_border_style(true)),
        );
    frame.render_widget(dialog, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, theme: &TuiTheme, label: &str, value: &str) {
    push_footer_entry_maybe_disabled(spans, theme, label, value, false);
}

fn push_footer_entry_maybe_disabled(
    spans: &mut Vec<Span<'static>>,
    theme: &TuiTheme,
    label: &str,
    value: &str,
    disabled: bool,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", theme.dim_style()));
    }
    spans.push(Span::styled(format!("{}:", footer_label_ucfirst(label)), theme.dim_style()));
    spans.extend(footer_value_spans(theme, value, disabled));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn footer_value_spans(theme: &TuiTheme, value: &str, disabled: bool) -> Vec<Span<'static>> {
    let style = if disabled { theme.dim_style() } else { theme.key_style() };
    vec![Span::styled(value.to_owned(), style)]
}
