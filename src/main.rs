mod app;
mod draw;
mod keys;
mod state;
mod ui;
mod view;

use crate::app::App;
use crate::state::app_settings::{AppSettings, BASE_URL_VAR, LOG_VAR, TIMEOUT_VAR};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use anyhow::Context;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};
use unitpick_api::client::SelectorApi;

enum CliCommand {
    Run,
    Diagnose,
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load();
    let api = SelectorApi::new(settings.base_url.clone()).with_timeout(settings.timeout);

    match handle_cli_args() {
        CliCommand::Exit => return Ok(()),
        CliCommand::Diagnose => return diagnose(&api).await,
        CliCommand::Run => {}
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(settings.log_level);
    info!("backend: {}", api.base_url());

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Trigger reference data load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliCommand {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return CliCommand::Run;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            CliCommand::Exit
        }
        "-V" | "--version" => {
            println!("unitpick {}", env!("CARGO_PKG_VERSION"));
            CliCommand::Exit
        }
        "--diagnose" => CliCommand::Diagnose,
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> String {
    format!(
        "unitpick - middle-school curriculum unit selector

Usage:
  unitpick
  unitpick --diagnose
  unitpick --help
  unitpick --version

Environment:
  {BASE_URL_VAR}      Backend base URL (default http://127.0.0.1:5000)
  {TIMEOUT_VAR}  Request timeout in seconds (default 10)
  {LOG_VAR}           Log level: error, warn, info, debug, trace (default info)"
    )
}

/// Print the backend's credential/spreadsheet diagnostics and exit.
async fn diagnose(api: &SelectorApi) -> anyhow::Result<()> {
    let report = api
        .fetch_debug()
        .await
        .with_context(|| format!("could not reach {}/api/debug", api.base_url()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_healthy() {
        anyhow::bail!("backend reports an unhealthy configuration");
    }
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let app_guard = app.lock().await;
                    draw::draw(&mut terminal, &app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let app_guard = app.lock().await;
                    draw::draw(&mut terminal, &app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadReferenceData).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ReferenceDataLoaded { data } => {
            app.lock().await.on_reference_data_loaded(data);
        }
        NetworkResponse::ReferenceDataFailed { error } => {
            error!("Network error: {error}");
            app.lock().await.on_reference_data_failed(error);
        }
        NetworkResponse::SaveFinished { result } => {
            app.lock().await.on_save_finished(result);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
