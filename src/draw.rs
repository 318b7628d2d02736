use std::ops::Range;
use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::state::app_state::Pane;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::selection::{Notice, NoticeKind};
use crate::ui::layout::LayoutAreas;
use crate::view::{ListItem, SelectorView, UnitsView};

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let view = SelectorView::build(&app.state.selector);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.state.show_logs);

        draw_header(f, layout.header, app);
        draw_list_pane(
            f,
            layout.panes[0],
            " 학년 ",
            list_lines(&view.grades),
            app,
            Pane::Grades,
        );
        draw_list_pane(
            f,
            layout.panes[1],
            " 학교 ",
            list_lines(&view.schools),
            app,
            Pane::Schools,
        );
        draw_units_pane(f, layout.panes[2], &view, app);
        draw_footer(f, layout.footer, &view, app);

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        if let Some(notice) = app.state.notice.as_ref() {
            draw_notice(f, f.area(), notice);
        }

        draw_loading_spinner(f, f.area(), loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" 중학교 단원 선택 ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let legend = Line::from(vec![
        Span::raw("Tab/h/l=영역  j/k=이동  Enter/Space=선택  s=저장  r=새로고침  \"=로그  q=종료"),
        Span::styled(
            format!("  {}", app.settings.base_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(legend), inner);
}

fn list_lines(items: &[ListItem]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            if item.active {
                Line::styled(
                    format!("● {}", item.label),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(format!("  {}", item.label))
            }
        })
        .collect()
}

fn pane_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    default_border(if focused { Color::Yellow } else { Color::DarkGray }).title(title)
}

fn draw_list_pane(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'static>>,
    app: &App,
    pane: Pane,
) {
    let focused = app.state.focus == pane;
    let block = pane_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if lines.is_empty() {
        let msg = if app.state.load_attempted {
            "항목이 없습니다."
        } else {
            "불러오는 중..."
        };
        draw_hint(f, inner, msg);
        return;
    }

    draw_rows(f, inner, lines, focused.then(|| app.state.cursors.get(pane)));
}

fn draw_units_pane(f: &mut Frame, area: Rect, view: &SelectorView, app: &App) {
    let focused = app.state.focus == Pane::Units;
    let block = pane_block(" 단원 ", focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let UnitsView::Placeholder(msg) = &view.units {
        draw_hint(f, inner, msg);
        return;
    }

    let lines = view
        .units
        .rows()
        .iter()
        .map(|row| {
            let (mark, style) = if row.checked {
                ("[x]", Style::default().fg(Color::Green))
            } else {
                ("[ ]", Style::default())
            };
            Line::from(vec![
                Span::styled(format!("{mark} "), style),
                Span::styled(format!("{:<6} ", row.number), Style::default().fg(Color::Cyan)),
                Span::styled(row.unit.clone(), style),
            ])
        })
        .collect();

    draw_rows(f, inner, lines, focused.then_some(app.state.cursors.units));
}

/// Render rows with a `>` marker on the cursor, scrolled so the cursor stays visible.
fn draw_rows(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>, cursor: Option<usize>) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let window = visible_window(lines.len(), cursor.unwrap_or(0), area.height as usize);
    let start = window.start;
    let visible: Vec<Line> = lines
        .into_iter()
        .enumerate()
        .skip(start)
        .take(window.len())
        .map(|(idx, mut line)| {
            let marker = if cursor == Some(idx) { "> " } else { "  " };
            line.spans.insert(0, Span::styled(marker, Style::default().fg(Color::Yellow)));
            line
        })
        .collect();
    f.render_widget(Paragraph::new(visible), area);
}

fn visible_window(len: usize, cursor: usize, height: usize) -> Range<usize> {
    if height == 0 {
        return 0..0;
    }
    let start = cursor.saturating_sub(height - 1).min(len.saturating_sub(height));
    start..(start + height).min(len)
}

fn draw_hint(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_footer(f: &mut Frame, footer: [Rect; 2], view: &SelectorView, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(footer[0]);
    f.render_widget(block, footer[0]);

    let mut spans = vec![Span::raw(view.summary.clone())];
    if let Some(at) = app.state.last_saved_at.as_deref() {
        spans.push(Span::styled(
            format!("  (마지막 저장 {at})"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);

    let button_color = if view.save_button.enabled {
        Color::Green
    } else {
        Color::DarkGray
    };
    let block = default_border(button_color);
    let inner = block.inner(footer[1]);
    f.render_widget(block, footer[1]);

    let label = if view.saving {
        format!("{} ⠿", view.save_button.label)
    } else {
        format!("[s] {}", view.save_button.label)
    };
    f.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(button_color)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow));
    f.render_widget(widget, area);
}

fn draw_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let (title, color) = match notice.kind {
        NoticeKind::Info => (" 알림 ", Color::Green),
        NoticeKind::Error => (" 오류 ", Color::Red),
    };
    let body_lines = notice.message.lines().count().max(1) as u16;
    let popup = centered_rect(area, 60, body_lines + 4);

    let block = default_border(color).title(title);
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let mut lines: Vec<Line> = notice
        .message
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled("Enter 확인", Style::default().fg(Color::DarkGray)));
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn centered_rect(area: Rect, max_width: u16, height: u16) -> Rect {
    let width = max_width.min(area.width.saturating_sub(4)).max(1);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    f.render_widget(spinner, Rect::new(area.width.saturating_sub(3), 1, 1, 1));
}
