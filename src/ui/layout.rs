use tui::layout::{Constraint, Layout, Rect, Size};
pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAreas {
    pub header: Rect,
    /// Grades, schools, units.
    pub panes: [Rect; 3],
    /// Summary line, save button.
    pub footer: [Rect; 2],
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false)
    }

    pub fn update(&mut self, area: Rect, show_logs: bool) {
        *self = Self::from_rect(area, show_logs);
    }

    fn from_rect(area: Rect, show_logs: bool) -> Self {
        let log_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };
        let [header, main, footer, logs] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(log_height),
        ])
        .areas(area);

        LayoutAreas {
            header,
            panes: Self::split_panes(main),
            footer: Self::split_footer(footer),
            logs: show_logs.then_some(logs),
        }
    }

    fn split_panes(area: Rect) -> [Rect; 3] {
        Layout::horizontal([
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Fill(1),
        ])
        .areas(area)
    }

    fn split_footer(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]).areas(area)
    }
}
