use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::{AuthSignal, Gateway, HttpTransport};
use crate::app::{App, Reply, Request};
use crate::cli::Args;
use crate::player::{AudioPlayer, MediaEvent, PlaybackController};

mod event_loop;
mod logging;
mod settings;
mod startup;
mod worker;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (settings, warning) = settings::load_settings(&args);

    let log_file = logging::init(&settings.logging);
    if let Some(w) = warning {
        tracing::warn!("{w}");
    }
    tracing::info!(
        api = settings.api.base_url.as_str(),
        log = ?log_file,
        "lectern starting"
    );

    let session = startup::session_context(&settings.session);

    let (signal_tx, signal_rx) = mpsc::channel::<AuthSignal>();
    let (request_tx, request_rx) = mpsc::channel::<Request>();
    let (reply_tx, reply_rx) = mpsc::channel::<Reply>();
    let transport = HttpTransport::new(&settings.api)?;
    let gateway = Gateway::new(transport, session.clone(), signal_tx);
    // Not joined on exit: an upload may still be in flight and nothing
    // waits for its result.
    let _worker = worker::spawn_gateway_worker(gateway, request_rx, reply_tx);

    let (media_tx, media_rx) = mpsc::channel::<MediaEvent>();
    let audio = AudioPlayer::new(
        media_tx,
        Duration::from_secs(settings.api.upload_timeout_secs),
        Duration::from_millis(settings.player.tick_ms),
    );
    let mut player = PlaybackController::new(audio, &settings.player);

    let mut app = App::new(session, &settings);
    app.start();

    let channels = event_loop::Channels {
        requests: request_tx,
        replies: reply_rx,
        signals: signal_rx,
        media: media_rx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &channels,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.close();
    player.media().shutdown();
    tracing::info!("lectern stopped");

    run_result
}
