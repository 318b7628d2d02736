use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Pane};
use crate::state::selection::{Action, Effect};
use chrono::Local;
use unitpick_api::client::{ApiError, ApiResult};
use unitpick_api::{ReferenceData, SaveReceipt};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            state: AppState::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_reference_data_loaded(&mut self, data: ReferenceData) {
        self.state.load_attempted = true;
        self.state.selector.apply_reference_data(data);
        self.clamp_cursors();
    }

    pub fn on_reference_data_failed(&mut self, error: ApiError) {
        self.state.load_attempted = true;
        self.state.notice = Some(self.state.selector.load_failed(&error));
    }

    pub fn on_save_finished(&mut self, result: ApiResult<SaveReceipt>) {
        let notice = self.state.selector.finish_save(&result);
        if result.is_ok() {
            self.state.last_saved_at = Some(Local::now().format("%H:%M").to_string());
        }
        self.state.notice = Some(notice);
    }

    // -----------------------------------------------------------------------
    // Interaction — every path ends in SelectionController::dispatch
    // -----------------------------------------------------------------------

    pub fn dispatch(&mut self, action: Action) -> Effect {
        if matches!(action, Action::SelectGrade(_)) {
            self.state.cursors.units = 0;
        }
        let effect = self.state.selector.dispatch(action);
        self.clamp_cursors();
        effect
    }

    /// Enter/Space on the focused row.
    pub fn activate(&mut self) -> Effect {
        let cursor = self.state.cursors.get(self.state.focus);
        let data = self.state.selector.data();
        let action = match self.state.focus {
            Pane::Grades => data.grades.get(cursor).cloned().map(Action::SelectGrade),
            Pane::Schools => data.schools.get(cursor).cloned().map(Action::SelectSchool),
            Pane::Units => self
                .state
                .selector
                .selection()
                .grade
                .as_ref()
                .and_then(|g| data.units_for(g).get(cursor))
                .map(|u| Action::ClickUnitRow(u.key())),
        };
        match action {
            Some(action) => self.dispatch(action),
            None => Effect::None,
        }
    }

    pub fn save(&mut self) -> Effect {
        self.dispatch(Action::Save)
    }

    pub fn reload(&mut self) -> Effect {
        self.dispatch(Action::Reload)
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    // -----------------------------------------------------------------------
    // Focus and cursor navigation
    // -----------------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.state.focus = self.state.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.state.focus = self.state.focus.prev();
    }

    pub fn cursor_down(&mut self) {
        let max = self.pane_len(self.state.focus).saturating_sub(1);
        let cursor = self.state.cursors.get_mut(self.state.focus);
        if *cursor < max {
            *cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        let cursor = self.state.cursors.get_mut(self.state.focus);
        *cursor = cursor.saturating_sub(1);
    }

    pub fn pane_len(&self, pane: Pane) -> usize {
        let selector = &self.state.selector;
        match pane {
            Pane::Grades => selector.data().grades.len(),
            Pane::Schools => selector.data().schools.len(),
            Pane::Units => selector
                .selection()
                .grade
                .as_ref()
                .map(|g| selector.data().units_for(g).len())
                .unwrap_or(0),
        }
    }

    fn clamp_cursors(&mut self) {
        for pane in [Pane::Grades, Pane::Schools, Pane::Units] {
            let max = self.pane_len(pane).saturating_sub(1);
            let cursor = self.state.cursors.get_mut(pane);
            *cursor = (*cursor).min(max);
        }
    }
}
