use crate::app::App;
use crate::state::messages::NetworkRequest;
use crate::state::selection::Effect;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use unitpick_api::client::ApiError;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.notice.is_some() {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter | KeyCode::Esc, _) => guard.dismiss_notice(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => quit(),
            _ => {}
        }
        return;
    }

    let effect = match (key_event.code, key_event.modifiers) {
        // Quit
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => quit(),

        // Pane focus
        (KeyCode::Tab | Char('l') | KeyCode::Right, _) => {
            guard.focus_next();
            Effect::None
        }
        (KeyCode::BackTab | Char('h') | KeyCode::Left, _) => {
            guard.focus_prev();
            Effect::None
        }

        // Row navigation
        (Char('j') | KeyCode::Down, _) => {
            guard.cursor_down();
            Effect::None
        }
        (Char('k') | KeyCode::Up, _) => {
            guard.cursor_up();
            Effect::None
        }

        (KeyCode::Enter | Char(' '), _) => guard.activate(),
        (Char('s'), _) => guard.save(),
        (Char('r'), _) => guard.reload(),
        (Char('"'), _) => {
            guard.toggle_show_logs();
            Effect::None
        }

        _ => Effect::None,
    };

    let request = match effect {
        Effect::None => return,
        Effect::Load => NetworkRequest::LoadReferenceData,
        Effect::Save(request) => NetworkRequest::Save { request },
    };
    let is_save = matches!(request, NetworkRequest::Save { .. });
    drop(guard);

    if let Err(e) = network_requests.send(request).await {
        error!("network worker unavailable: {e}");
        if is_save {
            app.lock()
                .await
                .on_save_finished(Err(ApiError::Other("network worker stopped".into())));
        }
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
