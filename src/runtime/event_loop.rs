use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::AuthSignal;
use crate::app::{AdminMode, App, FILE, Reply, Request, Route};
use crate::config;
use crate::player::{MediaElement, MediaEvent, PlaybackController};
use crate::ui;

/// Channel ends the UI thread talks through.
pub struct Channels {
    pub requests: Sender<Request>,
    pub replies: Receiver<Reply>,
    pub signals: Receiver<AuthSignal>,
    pub media: Receiver<MediaEvent>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pending_zz: bool,
}

impl EventLoopState {
    /// Forget a half-typed `gg`/`zz`.
    fn clear_prefixes(&mut self) {
        self.pending_gg = false;
        self.pending_zz = false;
    }
}

/// Main terminal event loop: applies remote results and media notifications,
/// draws, and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<M>,
    channels: &Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();

        while let Ok(reply) = channels.replies.try_recv() {
            app.apply(reply, now);
        }
        // After replies, so views have already cleared their in-flight flags.
        while let Ok(signal) = channels.signals.try_recv() {
            match signal {
                AuthSignal::Unauthorized => app.handle_unauthorized(),
            }
        }
        while let Ok(ev) = channels.media.try_recv() {
            player.handle_event(ev);
        }
        app.tick(now);

        for request in app.outbox.drain() {
            if channels.requests.send(request).is_err() {
                tracing::error!("gateway worker is gone; request dropped");
            }
        }

        terminal.draw(|f| ui::draw(f, app, player, settings))?;

        if app.quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(key, &settings.player, app, player, state);
            }
        }
    }

    Ok(())
}

/// Apply one key press. Text forms swallow printable keys; everything else
/// goes through the global key map.
pub fn handle_key<M: MediaElement>(
    key: KeyEvent,
    settings: &config::PlayerSettings,
    app: &mut App,
    player: &mut PlaybackController<M>,
    state: &mut EventLoopState,
) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    if app.in_form() {
        state.clear_prefixes();
        handle_form_key(key, app);
        return;
    }

    if let AdminMode::ConfirmDelete(_) = app.admin.mode {
        if app.route() == Route::Admin {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.admin.confirm_delete(&mut app.outbox),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.admin.cancel_delete(),
                _ => {}
            }
            return;
        }
    }

    let step = settings.seek_step_seconds as f64;
    let pending_gg = std::mem::take(&mut state.pending_gg);
    let pending_zz = std::mem::take(&mut state.pending_zz);

    match key.code {
        KeyCode::Char('q') => app.quit = true,

        // player
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle_play(),
        KeyCode::Char('h') | KeyCode::Left => player.seek_by(-step),
        KeyCode::Char('l') | KeyCode::Right => player.seek_by(step),
        KeyCode::Char('-') => player.nudge_volume(-settings.volume_step),
        KeyCode::Char('+') | KeyCode::Char('=') => player.nudge_volume(settings.volume_step),
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char('x') => player.close(),

        // navigation
        KeyCode::Char('c') => app.navigate(Route::Catalog),
        KeyCode::Char('a') => app.navigate(Route::Admin),
        KeyCode::Char('L') => app.navigate(Route::Login),
        KeyCode::Char('R') => app.navigate(Route::Register),
        KeyCode::Char('o') => app.logout(),

        _ => match app.route() {
            Route::Catalog => catalog_key(key, app, player, state, pending_gg, pending_zz),
            Route::Admin => admin_key(key, app, player),
            Route::Login | Route::Register => {}
        },
    }
}

fn catalog_key<M: MediaElement>(
    key: KeyEvent,
    app: &mut App,
    player: &mut PlaybackController<M>,
    state: &mut EventLoopState,
    pending_gg: bool,
    pending_zz: bool,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.catalog.next(),
        KeyCode::Char('k') | KeyCode::Up => app.catalog.prev(),
        KeyCode::Char('g') => {
            if pending_gg {
                app.catalog.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.catalog.last(),
        KeyCode::Char('z') => {
            if pending_zz {
                if let Some(id) = player.current_track_id() {
                    if let Some(pos) = app.catalog.tracks().iter().position(|t| t.id == id) {
                        app.catalog.cursor = pos;
                    }
                }
            } else {
                state.pending_zz = true;
            }
        }
        KeyCode::Enter => {
            if let Some(track) = app.catalog.select_current() {
                if player.current_track_id() == Some(track.id) {
                    if !player.is_playing() {
                        player.toggle_play();
                    }
                } else {
                    player.select(track);
                }
            }
        }
        KeyCode::Char('r') => app.catalog.retry(&mut app.outbox),
        _ => {}
    }
}

fn admin_key<M: MediaElement>(key: KeyEvent, app: &mut App, player: &mut PlaybackController<M>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.admin.next(),
        KeyCode::Char('k') | KeyCode::Up => app.admin.prev(),
        KeyCode::Char('n') | KeyCode::Char('u') => app.admin.open_upload(),
        KeyCode::Char('e') => app.admin.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.admin.request_delete(&mut app.outbox),
        KeyCode::Char('r') => app.admin.load(&mut app.outbox),
        KeyCode::Enter => {
            if let Some(track) = app.admin.current().cloned() {
                player.select(track);
            }
        }
        _ => {}
    }
}

fn handle_form_key(key: KeyEvent, app: &mut App) {
    match app.route() {
        Route::Login | Route::Register => {
            let form = if app.route() == Route::Login {
                &mut app.login
            } else {
                &mut app.register
            };
            match key.code {
                KeyCode::Esc => app.navigate(Route::Catalog),
                KeyCode::Tab | KeyCode::Down => form.form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.form.focus_prev(),
                KeyCode::Enter => form.submit(&mut app.outbox),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !c.is_control() => form.input(c),
                _ => {}
            }
        }
        Route::Admin => {
            let admin = &mut app.admin;
            match key.code {
                KeyCode::Esc => admin.close_form(),
                KeyCode::Tab => admin.focus_next(),
                KeyCode::BackTab => admin.focus_prev(),
                KeyCode::Down if admin.form.focus == FILE => admin.cycle_file(1),
                KeyCode::Up if admin.form.focus == FILE => admin.cycle_file(-1),
                KeyCode::Down => admin.focus_next(),
                KeyCode::Up => admin.focus_prev(),
                KeyCode::Enter => admin.submit(&mut app.outbox),
                KeyCode::Backspace => admin.backspace(),
                KeyCode::Char(c) if !c.is_control() => admin.input(c),
                _ => {}
            }
        }
        Route::Catalog => {}
    }
}
