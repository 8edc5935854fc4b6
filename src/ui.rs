//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. Nothing
//! here mutates state; `draw` is called once per event loop iteration.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{
    AdminConsole, AdminMode, App, AuthForm, CatalogState, CatalogView, DELETE_PROMPT, EMPTY_HINT, EMPTY_TITLE, FILE, Form,
    NO_UPLOADS, Route,
};
use crate::config::Settings;
use crate::library::{DOT_SEPARATOR, Track, TrackId, admin_subtitle, catalog_subtitle, format_duration, format_file_size};
use crate::player::{MediaElement, PlaybackController, PlaybackState, format_time};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 1,
    top: 0,
    bottom: 0,
};

/// Render the controls help text for the current screen.
fn controls_text(app: &App, seek_step: u64) -> String {
    let pairs: Vec<(&str, String)> = if app.in_form() {
        vec![
            ("tab/shift-tab", "next/prev field".into()),
            ("enter", "submit".into()),
            ("esc", "back".into()),
            ("ctrl-c", "quit".into()),
        ]
    } else if app.route() == Route::Admin && matches!(app.admin.mode, AdminMode::ConfirmDelete(_)) {
        vec![("y", "delete".into()), ("n/esc", "keep".into())]
    } else {
        let mut v: Vec<(&str, String)> = vec![
            ("j/k", "up/down".into()),
            ("enter", "play".into()),
            ("space", "play/pause".into()),
            ("h/l", format!("seek -/+{seek_step}s")),
            ("-/+", "volume".into()),
            ("m", "mute".into()),
            ("x", "close player".into()),
        ];
        match app.route() {
            Route::Catalog => {
                v.push(("gg/G", "top/bottom".into()));
                v.push(("zz", "jump to current".into()));
                v.push(("r", "reload".into()));
            }
            Route::Admin => {
                v.push(("n", "upload".into()));
                v.push(("e", "edit".into()));
                v.push(("d", "delete".into()));
                v.push(("r", "reload".into()));
            }
            Route::Login | Route::Register => {}
        }
        v.push(("c", "library".into()));
        if app.session.is_authenticated() {
            if app.session.is_admin() {
                v.push(("a", "admin".into()));
            }
            v.push(("o", "logout".into()));
        } else {
            v.push(("L", "login".into()));
            v.push(("R", "register".into()));
        }
        v.push(("q", "quit".into()));
        v
    };

    pairs
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into `frame`.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<M>,
    settings: &Settings,
) {
    let player_height = if player.state().is_some() { 5 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(player_height),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app, settings);
    draw_status(frame, chunks[1], app);

    match app.route() {
        Route::Catalog => draw_catalog(frame, chunks[2], app, player.current_track_id(), settings),
        Route::Admin => draw_admin(frame, chunks[2], &app.admin),
        Route::Login | Route::Register => {
            let form = if app.route() == Route::Login {
                &app.login
            } else {
                &app.register
            };
            draw_auth(frame, chunks[2], form);
        }
    }

    if let Some(state) = player.state() {
        draw_player(frame, chunks[3], state, player);
    }

    let footer = Paragraph::new(controls_text(app, settings.player.seek_step_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App, settings: &Settings) {
    let who = match app.session.user() {
        Some(user) if app.session.is_admin() => format!(" {} [admin] ", user.name),
        Some(user) => format!(" {} ", user.name),
        None if app.session.is_authenticated() => " signed in ".to_string(),
        None => " guest ".to_string(),
    };
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" lectern ")
                .title_alignment(Alignment::Center)
                .title(Line::from(who).right_aligned()),
        );
    frame.render_widget(header, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let mut parts: Vec<String> = vec![format!("VIEW: {}", app.route().label())];
    if app.session.is_authenticated() {
        parts.push("SIGNED IN".to_string());
    }
    if let Some(flash) = &app.flash {
        parts.push(flash.clone());
    }
    let status = Paragraph::new(parts.join(DOT_SEPARATOR))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn track_item(track: &Track, playing: bool, settings: &Settings) -> ListItem<'static> {
    let marker = if playing { "▶ " } else { "  " };
    let mut right = format_duration(track.duration);
    if settings.ui.show_file_size {
        right.push_str(DOT_SEPARATOR);
        right.push_str(&format_file_size(track.file_size));
    }

    let mut title = Line::from(vec![
        Span::raw(marker),
        Span::raw(track.title.clone()).bold(),
        Span::raw("  "),
        Span::raw(right).dim(),
    ]);
    if playing {
        title = title.fg(Color::Cyan);
    }
    let subtitle = catalog_subtitle(track);
    let mut lines = vec![title];
    if !subtitle.is_empty() {
        lines.push(Line::from(format!("    {subtitle}")).dim());
    }
    ListItem::new(lines)
}

fn draw_catalog(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    now_playing: Option<TrackId>,
    settings: &Settings,
) {
    let catalog = &app.catalog;
    match &catalog.state {
        CatalogState::Loading => {
            let p = Paragraph::new("Loading tracks...")
                .alignment(Alignment::Center)
                .block(Block::bordered().title(" tracks "));
            frame.render_widget(p, area);
        }
        CatalogState::Failed(message) => {
            let p = Paragraph::new(vec![
                Line::from(message.as_str()).fg(Color::Red),
                Line::from(""),
                Line::from("[r] Try again"),
            ])
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" tracks "));
            frame.render_widget(p, area);
        }
        CatalogState::Ready(tracks) if tracks.is_empty() => {
            let p = Paragraph::new(vec![
                Line::from(EMPTY_TITLE).bold(),
                Line::from(EMPTY_HINT).dim(),
            ])
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" tracks "));
            frame.render_widget(p, area);
        }
        CatalogState::Ready(tracks) => {
            let items: Vec<ListItem> = tracks
                .iter()
                .map(|t| track_item(t, CatalogView::is_now_playing(t, now_playing), settings))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Available Tracks ({}) ", tracks.len())),
                )
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(catalog.cursor));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn form_lines(form: &Form, disabled: bool) -> Vec<Line<'static>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus && !disabled;
            let cursor = if focused { "_" } else { "" };
            let line = Line::from(vec![
                Span::raw(if focused { "> " } else { "  " }),
                Span::raw(format!("{:<18}", field.label)),
                Span::raw(format!("{}{cursor}", field.display())),
            ]);
            if focused { line.bold() } else { line }
        })
        .collect()
}

fn draw_auth(frame: &mut Frame, area: Rect, form: &AuthForm) {
    let popup = centered_rect_sized(64, form.form.fields.len() as u16 + 6, area);
    let mut lines = form_lines(&form.form, form.submitting);
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from("Please wait...").dim());
    } else if let Some(err) = &form.error {
        lines.push(Line::from(err.clone()).fg(Color::Red));
    }
    let p = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(form.title()))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, popup);
    frame.render_widget(p, popup);
}

fn draw_admin(frame: &mut Frame, area: Rect, admin: &AdminConsole) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Upload / edit panel
    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = &admin.notice {
        lines.push(Line::from(format!("✔ {}", notice.text)).fg(Color::Green));
    }
    if let Some(err) = &admin.error {
        lines.push(Line::from(format!("⚠ {err}")).fg(Color::Red));
    }
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }

    let title = match admin.mode {
        AdminMode::Edit(_) => " Edit Track ",
        _ => " Upload New Track ",
    };
    if admin.in_form() {
        let mut form = form_lines(&admin.form, admin.submitting);
        if matches!(admin.mode, AdminMode::Edit(_)) {
            form.truncate(FILE);
        }
        lines.extend(form);
        if admin.mode == AdminMode::Upload {
            let exts = admin.settings().extensions.join(", ").to_uppercase();
            let limit = format_file_size(Some(admin.settings().max_upload_bytes));
            lines.push(Line::from(format!("  ({exts} - max {limit}; up/down browses {})", admin.upload_dir().display())).dim());
            if let Some(info) = &admin.file_info {
                let name = info
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut selected = format!("  Selected: {name} ({})", format_file_size(Some(info.size)));
                if let Some(d) = info.duration {
                    selected.push_str(&format!(", {}", format_duration(Some(d))));
                }
                lines.push(Line::from(selected));
            }
        }
        lines.push(Line::from(""));
        lines.push(if admin.submitting {
            Line::from("Uploading...").bold()
        } else {
            Line::from("[enter] submit  [esc] back").dim()
        });
    } else {
        lines.push(Line::from("[n] upload a new track  [e] edit the highlighted one").dim());
    }
    let form = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, cols[0]);

    // Management list
    let list_title = format!(" Manage Tracks ({}) ", admin.tracks.len());
    if admin.tracks.is_empty() {
        let text = if admin.loading {
            "Loading tracks...".to_string()
        } else if let Some(err) = &admin.list_error {
            err.clone()
        } else {
            NO_UPLOADS.to_string()
        };
        let p = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(list_title));
        frame.render_widget(p, cols[1]);
    } else {
        let items: Vec<ListItem> = admin
            .tracks
            .iter()
            .map(|t| {
                let deleting = admin.deleting == Some(t.id);
                let mut head = Line::from(t.title.clone()).bold();
                if deleting {
                    head = Line::from(format!("{} (deleting...)", t.title)).dim();
                }
                ListItem::new(vec![head, Line::from(format!("  {}", admin_subtitle(t))).dim()])
            })
            .collect();
        let list = List::new(items)
            .block(Block::bordered().title(list_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !admin.in_form() {
            state.select(Some(admin.cursor));
        }
        frame.render_stateful_widget(list, cols[1], &mut state);
    }

    if let AdminMode::ConfirmDelete(id) = admin.mode {
        let title = admin
            .tracks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let popup = centered_rect_sized(56, 6, area);
        frame.render_widget(Clear, popup);
        let p = Paragraph::new(vec![
            Line::from(DELETE_PROMPT),
            Line::from(title).bold(),
            Line::from("[y] delete  [n] keep").dim(),
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" confirm "))
        .wrap(Wrap { trim: true });
        frame.render_widget(p, popup);
    }
}

fn draw_player<M: MediaElement>(
    frame: &mut Frame,
    area: Rect,
    state: &PlaybackState,
    player: &PlaybackController<M>,
) {
    let block = Block::bordered().padding(LEFT_PAD).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let glyph = if state.playing { "⏸" } else { "▶" };
    let mut head = vec![Span::raw(format!("{glyph}  ")), Span::raw(state.track.title.clone()).bold()];
    if let Some(artist) = state.track.artist() {
        head.push(Span::raw(format!("{DOT_SEPARATOR}{artist}")).dim());
    }
    frame.render_widget(Paragraph::new(Line::from(head)), rows[0]);

    // Unknown length shows as 0:00 until metadata arrives.
    let elapsed = format_time(state.position);
    let total = format_time(state.duration.unwrap_or(f64::NAN));
    let mut label = format!("{elapsed} / {total}");
    if state.is_seeking() {
        label.push_str(" (seeking)");
    }
    let progress = LineGauge::default()
        .filled_style(Style::default().fg(Color::Cyan))
        .label(label)
        .ratio(state.progress());
    frame.render_widget(progress, rows[1]);

    let volume = player.effective_volume();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(if player.is_muted() { Color::DarkGray } else { Color::Green }))
        .label(format!("{} {:>3}%", player.volume_icon().glyph(), (volume * 100.0).round() as u32))
        .ratio(f64::from(volume).clamp(0.0, 1.0));
    frame.render_widget(gauge, rows[2]);
}
