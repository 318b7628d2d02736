use crate::state::selection::{Notice, SelectionController};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Grades,
    Schools,
    Units,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Grades => Pane::Schools,
            Pane::Schools => Pane::Units,
            Pane::Units => Pane::Grades,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pane::Grades => Pane::Units,
            Pane::Schools => Pane::Grades,
            Pane::Units => Pane::Schools,
        }
    }
}

/// Row cursor per pane. Clamped against the current list length on every move.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub grades: usize,
    pub schools: usize,
    pub units: usize,
}

impl Cursors {
    pub fn get(&self, pane: Pane) -> usize {
        match pane {
            Pane::Grades => self.grades,
            Pane::Schools => self.schools,
            Pane::Units => self.units,
        }
    }

    pub fn get_mut(&mut self, pane: Pane) -> &mut usize {
        match pane {
            Pane::Grades => &mut self.grades,
            Pane::Schools => &mut self.schools,
            Pane::Units => &mut self.units,
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub selector: SelectionController,
    pub focus: Pane,
    pub cursors: Cursors,
    /// Blocking notice; input other than dismiss/quit is ignored while set.
    pub notice: Option<Notice>,
    pub show_logs: bool,
    /// Set once the first load finished, successfully or not.
    pub load_attempted: bool,
    pub last_saved_at: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selector: SelectionController::new(),
            ..Self::default()
        }
    }
}
