//! Pure description of what each pane shows, derived from controller state.
//! Rebuilt from scratch on every draw.

use crate::state::selection::SelectionController;
use unitpick_api::UnitKey;

pub const SAVE_LABEL: &str = "저장";
pub const SAVING_LABEL: &str = "저장 중...";
pub const NO_GRADE_HINT: &str = "왼쪽에서 학년을 먼저 선택하세요.";
pub const NO_UNITS_HINT: &str = "등록된 단원이 없습니다.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub key: UnitKey,
    pub number: String,
    pub unit: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitsView {
    Placeholder(&'static str),
    Rows(Vec<UnitRow>),
}

impl UnitsView {
    pub fn rows(&self) -> &[UnitRow] {
        match self {
            UnitsView::Rows(rows) => rows,
            UnitsView::Placeholder(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveButton {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorView {
    pub grades: Vec<ListItem>,
    pub schools: Vec<ListItem>,
    pub units: UnitsView,
    pub summary: String,
    pub save_button: SaveButton,
    pub saving: bool,
}

impl SelectorView {
    pub fn build(controller: &SelectionController) -> Self {
        let data = controller.data();
        let selection = controller.selection();

        let grades = data
            .grades
            .iter()
            .map(|g| ListItem {
                label: g.display_label(),
                active: selection.grade.as_ref() == Some(g),
            })
            .collect();

        let schools = data
            .schools
            .iter()
            .map(|s| ListItem {
                label: s.to_string(),
                active: selection.school.as_ref() == Some(s),
            })
            .collect();

        let units = match &selection.grade {
            None => UnitsView::Placeholder(NO_GRADE_HINT),
            Some(grade) => {
                let list = data.units_for(grade);
                if list.is_empty() {
                    UnitsView::Placeholder(NO_UNITS_HINT)
                } else {
                    UnitsView::Rows(
                        list.iter()
                            .map(|u| {
                                let key = u.key();
                                UnitRow {
                                    checked: controller.is_unit_selected(&key),
                                    number: u.number.clone(),
                                    unit: u.unit.clone(),
                                    key,
                                }
                            })
                            .collect(),
                    )
                }
            }
        };

        let saving = controller.is_saving();
        Self {
            grades,
            schools,
            units,
            summary: summary_line(controller),
            save_button: SaveButton {
                label: if saving { SAVING_LABEL } else { SAVE_LABEL },
                enabled: controller.can_save(),
            },
            saving,
        }
    }
}

/// Grade, school, then unit count, each with a placeholder when unset.
pub fn summary_line(controller: &SelectionController) -> String {
    let selection = controller.selection();
    let grade = selection
        .grade
        .as_ref()
        .map(|g| g.display_label())
        .unwrap_or_else(|| "학년 미선택".to_string());
    let school = selection
        .school
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "학교 미선택".to_string());
    format!("{grade} / {school} / 선택한 단원 {}개", selection.units.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::selection::Action;
    use std::collections::HashMap;
    use unitpick_api::{Grade, ReferenceData, SaveReceipt, SchoolName, Unit};

    fn controller() -> SelectionController {
        let mut c = SelectionController::new();
        c.apply_reference_data(ReferenceData {
            grades: vec![Grade::new("1"), Grade::new("2")],
            schools: vec![SchoolName::new("A")],
            units_by_grade: HashMap::from([(Grade::new("1"), vec![Unit::new("1-1", "정수")])]),
        });
        c
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let view = SelectorView::build(&SelectionController::new());
        assert!(view.grades.is_empty());
        assert!(view.schools.is_empty());
        assert_eq!(view.units, UnitsView::Placeholder(NO_GRADE_HINT));
        assert_eq!(view.summary, "학년 미선택 / 학교 미선택 / 선택한 단원 0개");
        assert_eq!(view.save_button, SaveButton { label: SAVE_LABEL, enabled: false });
    }

    #[test]
    fn grade_without_units_shows_empty_hint() {
        let mut c = controller();
        c.dispatch(Action::SelectGrade(Grade::new("2")));
        assert_eq!(SelectorView::build(&c).units, UnitsView::Placeholder(NO_UNITS_HINT));
    }

    #[test]
    fn active_items_follow_selection() {
        let mut c = controller();
        c.dispatch(Action::SelectGrade(Grade::new("1")));
        let view = SelectorView::build(&c);
        assert_eq!(
            view.grades,
            vec![
                ListItem { label: "중학교 1학년".into(), active: true },
                ListItem { label: "중학교 2학년".into(), active: false },
            ]
        );
        assert!(!view.schools[0].active);
    }

    #[test]
    fn scenario_a_view() {
        let mut c = controller();
        c.dispatch(Action::SelectGrade(Grade::new("1")));
        c.dispatch(Action::SelectSchool(SchoolName::new("A")));
        c.dispatch(Action::ToggleUnit { key: UnitKey::new("1-1", "정수"), checked: true });

        let view = SelectorView::build(&c);
        assert!(view.save_button.enabled);
        assert_eq!(view.summary, "중학교 1학년 / A / 선택한 단원 1개");
        assert_eq!(view.units.rows().len(), 1);
        assert!(view.units.rows()[0].checked);
        assert_eq!(view.units.rows()[0].number, "1-1");
    }

    #[test]
    fn saving_swaps_label_and_disables_button() {
        let mut c = controller();
        c.dispatch(Action::SelectGrade(Grade::new("1")));
        c.dispatch(Action::SelectSchool(SchoolName::new("A")));
        c.dispatch(Action::ClickUnitRow(UnitKey::new("1-1", "정수")));
        c.dispatch(Action::Save);

        let view = SelectorView::build(&c);
        assert!(view.saving);
        assert_eq!(view.save_button, SaveButton { label: SAVING_LABEL, enabled: false });

        c.finish_save(&Ok(SaveReceipt { saved: 1 }));
        let view = SelectorView::build(&c);
        assert!(!view.saving);
        assert_eq!(view.save_button, SaveButton { label: SAVE_LABEL, enabled: true });
    }
}
