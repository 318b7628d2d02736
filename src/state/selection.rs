use log::{debug, info, warn};
use std::collections::BTreeSet;
use unitpick_api::client::{ApiError, ApiResult};
use unitpick_api::{Grade, ReferenceData, SaveReceipt, SaveRequest, SchoolName, Unit, UnitKey};

const LOAD_TRANSPORT_FAILED: &str = "서버와 통신 중 오류가 발생했습니다.";
const LOAD_REJECTED: &str = "데이터 로딩 중 오류가 발생했습니다.";
const SAVE_TRANSPORT_FAILED: &str = "저장 요청 중 오류가 발생했습니다.";
const SAVE_UNKNOWN_ERROR: &str = "알 수 없는 오류";

/// The user's in-progress choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub grade: Option<Grade>,
    pub school: Option<SchoolName>,
    /// Always a subset of the selected grade's unit keys.
    pub units: BTreeSet<UnitKey>,
}

/// Every interaction the views can raise, dispatched through one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectGrade(Grade),
    SelectSchool(SchoolName),
    ToggleUnit { key: UnitKey, checked: bool },
    /// Click on a unit row outside its checkbox: flips the checkbox.
    ClickUnitRow(UnitKey),
    Save,
    Reload,
}

/// Network work the caller has to start after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Load,
    Save(SaveRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

/// Owns the reference data, the selection and the saving lock.
#[derive(Debug, Default)]
pub struct SelectionController {
    data: ReferenceData,
    selection: SelectionState,
    saving: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        match action {
            Action::SelectGrade(grade) => self.select_grade(grade),
            Action::SelectSchool(school) => self.select_school(school),
            Action::ToggleUnit { key, checked } => self.toggle_unit(key, checked),
            Action::ClickUnitRow(key) => {
                let checked = !self.is_unit_selected(&key);
                return self.dispatch(Action::ToggleUnit { key, checked });
            }
            Action::Save => return self.begin_save().map_or(Effect::None, Effect::Save),
            Action::Reload => return Effect::Load,
        }
        Effect::None
    }

    // -----------------------------------------------------------------------
    // Reference data
    // -----------------------------------------------------------------------

    /// Replace the reference data and drop any selection it no longer offers.
    pub fn apply_reference_data(&mut self, data: ReferenceData) {
        info!(
            "reference data loaded: {} grades, {} schools",
            data.grades.len(),
            data.schools.len()
        );
        self.data = data;

        if let Some(grade) = &self.selection.grade
            && !self.data.has_grade(grade)
        {
            debug!("selected grade {grade} no longer offered");
            self.selection.grade = None;
        }
        if let Some(school) = &self.selection.school
            && !self.data.has_school(school)
        {
            debug!("selected school {school} no longer offered");
            self.selection.school = None;
            self.selection.units.clear();
        }
        match &self.selection.grade {
            Some(grade) => {
                let data = &self.data;
                self.selection.units.retain(|key| data.has_unit(grade, key));
            }
            None => self.selection.units.clear(),
        }
    }

    /// A failed load leaves every piece of state untouched.
    pub fn load_failed(&self, err: &ApiError) -> Notice {
        warn!("reference data load failed: {err}");
        match err {
            ApiError::Rejected(detail) => Notice::error(format!(
                "{LOAD_REJECTED}\n{}",
                detail.as_deref().unwrap_or_default()
            )),
            _ => Notice::error(LOAD_TRANSPORT_FAILED),
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select_grade(&mut self, grade: Grade) {
        debug!("grade selected: {grade}");
        self.selection.grade = Some(grade);
        self.selection.units.clear();
    }

    pub fn select_school(&mut self, school: SchoolName) {
        debug!("school selected: {school}");
        self.selection.school = Some(school);
        self.selection.units.clear();
    }

    /// Keys the selected grade does not offer are ignored.
    pub fn toggle_unit(&mut self, key: UnitKey, checked: bool) {
        let Some(grade) = &self.selection.grade else {
            return;
        };
        if !self.data.has_unit(grade, &key) {
            debug!("ignoring toggle of unknown unit {key}");
            return;
        }
        if checked {
            self.selection.units.insert(key);
        } else {
            self.selection.units.remove(&key);
        }
    }

    pub fn is_unit_selected(&self, key: &UnitKey) -> bool {
        self.selection.units.contains(key)
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    pub fn has_valid_selection(&self) -> bool {
        self.selection.grade.is_some()
            && self.selection.school.is_some()
            && !self.selection.units.is_empty()
    }

    pub fn can_save(&self) -> bool {
        !self.saving && self.has_valid_selection()
    }

    /// Take the saving lock and build the request, or `None` if saving is
    /// not allowed right now.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if self.saving {
            debug!("save ignored: a save is already in flight");
            return None;
        }
        let (Some(grade), Some(school)) = (&self.selection.grade, &self.selection.school) else {
            return None;
        };
        if self.selection.units.is_empty() {
            return None;
        }

        let request = SaveRequest {
            grade: grade.clone(),
            school: school.clone(),
            units: self.selection.units.iter().cloned().map(Unit::from).collect(),
        };
        self.saving = true;
        info!(
            "saving {} units for grade {} at {}",
            request.units.len(),
            request.grade,
            request.school
        );
        Some(request)
    }

    /// Release the saving lock whatever the outcome. The selection is kept.
    pub fn finish_save(&mut self, result: &ApiResult<SaveReceipt>) -> Notice {
        self.saving = false;
        match result {
            Ok(receipt) => {
                info!("save complete: {} units", receipt.saved);
                Notice::info(format!("저장 완료! ({}개 단원)", receipt.saved))
            }
            Err(ApiError::Rejected(detail)) => {
                warn!("save rejected: {detail:?}");
                Notice::error(format!(
                    "저장 중 오류: {}",
                    detail.as_deref().unwrap_or(SAVE_UNKNOWN_ERROR)
                ))
            }
            Err(err) => {
                warn!("save request failed: {err}");
                Notice::error(SAVE_TRANSPORT_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn grade(g: &str) -> Grade {
        Grade::new(g)
    }

    fn school(s: &str) -> SchoolName {
        SchoolName::new(s)
    }

    fn sample_data() -> ReferenceData {
        ReferenceData {
            grades: vec![grade("1"), grade("2")],
            schools: vec![school("A"), school("B")],
            units_by_grade: HashMap::from([
                (
                    grade("1"),
                    vec![Unit::new("1-1", "정수"), Unit::new("1-2", "유리수")],
                ),
                (grade("2"), vec![Unit::new("2-1", "일차함수")]),
            ]),
        }
    }

    fn loaded() -> SelectionController {
        let mut c = SelectionController::new();
        c.apply_reference_data(sample_data());
        c
    }

    /// grade 1, school A, unit 1-1 checked.
    fn scenario_a() -> SelectionController {
        let mut c = SelectionController::new();
        c.apply_reference_data(ReferenceData {
            grades: vec![grade("1")],
            schools: vec![school("A")],
            units_by_grade: HashMap::from([(grade("1"), vec![Unit::new("1-1", "정수")])]),
        });
        c.dispatch(Action::SelectGrade(grade("1")));
        c.dispatch(Action::SelectSchool(school("A")));
        c.dispatch(Action::ToggleUnit { key: UnitKey::new("1-1", "정수"), checked: true });
        c
    }

    fn assert_units_within_grade(c: &SelectionController) {
        match &c.selection().grade {
            Some(g) => assert!(c.selection().units.iter().all(|k| c.data().has_unit(g, k))),
            None => assert!(c.selection().units.is_empty()),
        }
    }

    #[test]
    fn scenario_a_enables_save() {
        let c = scenario_a();
        assert!(c.can_save());
        assert_eq!(c.selection().grade, Some(grade("1")));
        assert_eq!(c.selection().school, Some(school("A")));
        assert_eq!(c.selection().units.len(), 1);
    }

    #[test]
    fn scenario_b_changing_grade_clears_units_and_disables_save() {
        let mut c = scenario_a();
        c.dispatch(Action::SelectGrade(grade("2")));
        assert!(c.selection().units.is_empty());
        assert!(!c.can_save());
    }

    #[test]
    fn changing_school_clears_units() {
        let mut c = loaded();
        c.select_grade(grade("1"));
        c.select_school(school("A"));
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        c.select_school(school("B"));
        assert!(c.selection().units.is_empty());
        assert_eq!(c.selection().grade, Some(grade("1")));
    }

    #[test]
    fn changing_grade_keeps_school() {
        let mut c = loaded();
        c.select_school(school("A"));
        c.select_grade(grade("2"));
        assert_eq!(c.selection().school, Some(school("A")));
    }

    #[test]
    fn toggle_ignores_units_outside_selected_grade() {
        let mut c = loaded();
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        assert!(c.selection().units.is_empty(), "no grade selected yet");

        c.select_grade(grade("2"));
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        assert!(c.selection().units.is_empty());
    }

    #[test]
    fn toggle_unchecked_removes_key() {
        let mut c = loaded();
        c.select_grade(grade("1"));
        let key = UnitKey::new("1-2", "유리수");
        c.toggle_unit(key.clone(), true);
        assert!(c.is_unit_selected(&key));
        c.toggle_unit(key.clone(), false);
        assert!(!c.is_unit_selected(&key));
    }

    #[test]
    fn row_click_flips_checkbox() {
        let mut c = loaded();
        c.select_grade(grade("1"));
        let key = UnitKey::new("1-1", "정수");
        c.dispatch(Action::ClickUnitRow(key.clone()));
        assert!(c.is_unit_selected(&key));
        c.dispatch(Action::ClickUnitRow(key.clone()));
        assert!(!c.is_unit_selected(&key));
    }

    #[test]
    fn units_stay_within_grade_over_interaction_sequence() {
        let mut c = loaded();
        let actions = [
            Action::ToggleUnit { key: UnitKey::new("2-1", "일차함수"), checked: true },
            Action::SelectGrade(grade("1")),
            Action::ToggleUnit { key: UnitKey::new("1-1", "정수"), checked: true },
            Action::ToggleUnit { key: UnitKey::new("2-1", "일차함수"), checked: true },
            Action::ClickUnitRow(UnitKey::new("1-2", "유리수")),
            Action::SelectSchool(school("B")),
            Action::ClickUnitRow(UnitKey::new("1-2", "유리수")),
            Action::SelectGrade(grade("2")),
            Action::ClickUnitRow(UnitKey::new("1-1", "정수")),
            Action::ToggleUnit { key: UnitKey::new("2-1", "일차함수"), checked: true },
            Action::SelectGrade(grade("3")),
            Action::ClickUnitRow(UnitKey::new("2-1", "일차함수")),
        ];
        for action in actions {
            c.dispatch(action);
            assert_units_within_grade(&c);
        }
    }

    #[test]
    fn save_requires_grade_school_and_units() {
        let mut c = loaded();
        assert!(!c.can_save());
        assert_eq!(c.dispatch(Action::Save), Effect::None);

        c.select_grade(grade("1"));
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        assert!(!c.can_save(), "school missing");
        assert!(c.begin_save().is_none());

        c.select_school(school("A"));
        assert!(!c.can_save(), "units were cleared by the school change");
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        assert!(c.can_save());
    }

    #[test]
    fn begin_save_builds_payload_and_locks() {
        let mut c = scenario_a();
        let Effect::Save(request) = c.dispatch(Action::Save) else {
            panic!("expected a save effect");
        };
        assert_eq!(
            request,
            SaveRequest {
                grade: grade("1"),
                school: school("A"),
                units: vec![Unit::new("1-1", "정수")],
            }
        );
        assert!(c.is_saving());
        assert!(!c.can_save());
    }

    #[test]
    fn save_while_in_flight_issues_nothing() {
        let mut c = scenario_a();
        assert!(c.begin_save().is_some());
        assert_eq!(c.dispatch(Action::Save), Effect::None);
        assert!(c.begin_save().is_none());
        assert!(c.is_saving());
    }

    #[test]
    fn scenario_c_success_unlocks_and_confirms_count() {
        let mut c = scenario_a();
        c.begin_save();
        let notice = c.finish_save(&Ok(SaveReceipt { saved: 1 }));
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.message.contains('1'));
        assert!(!c.is_saving());
        assert!(c.can_save());
    }

    #[test]
    fn scenario_d_rejection_keeps_selection_and_reenables() {
        let mut c = scenario_a();
        let before = c.selection().clone();
        c.begin_save();
        let notice = c.finish_save(&Err(ApiError::Rejected(Some("db down".into()))));
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("db down"));
        assert_eq!(c.selection(), &before);
        assert!(c.can_save());
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let mut c = scenario_a();
        c.begin_save();
        let notice = c.finish_save(&Err(ApiError::Rejected(None)));
        assert!(notice.message.contains(SAVE_UNKNOWN_ERROR));
    }

    #[test]
    fn transport_failure_unlocks_save() {
        let mut c = scenario_a();
        c.begin_save();
        let notice = c.finish_save(&Err(ApiError::Other("connection reset".into())));
        assert_eq!(notice, Notice::error(SAVE_TRANSPORT_FAILED));
        assert!(!c.is_saving());
        assert!(c.can_save());
    }

    #[test]
    fn scenario_e_failed_first_load_leaves_state_empty() {
        let c = SelectionController::new();
        let notice = c.load_failed(&ApiError::Rejected(None));
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.starts_with(LOAD_REJECTED));
        assert_eq!(c.data(), &ReferenceData::default());
        assert_eq!(c.selection(), &SelectionState::default());
    }

    #[test]
    fn failed_reload_keeps_previous_data() {
        let c = scenario_a();
        let notice = c.load_failed(&ApiError::Other("timeout".into()));
        assert_eq!(notice, Notice::error(LOAD_TRANSPORT_FAILED));
        assert_eq!(c.data().grades, vec![grade("1")]);
        assert!(c.can_save());
    }

    #[test]
    fn reload_dropping_selected_school_clears_units() {
        let mut c = loaded();
        c.select_grade(grade("1"));
        c.select_school(school("B"));
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        c.toggle_unit(UnitKey::new("1-2", "유리수"), true);

        let mut next = sample_data();
        next.schools = vec![school("A")];
        c.apply_reference_data(next);

        assert_eq!(c.selection().grade, Some(grade("1")));
        assert_eq!(c.selection().school, None);
        assert!(c.selection().units.is_empty());
    }

    #[test]
    fn reload_keeps_units_still_offered_for_kept_grade_and_school() {
        let mut c = loaded();
        c.select_grade(grade("1"));
        c.select_school(school("A"));
        c.toggle_unit(UnitKey::new("1-1", "정수"), true);
        c.toggle_unit(UnitKey::new("1-2", "유리수"), true);

        let mut next = sample_data();
        next.units_by_grade.insert(grade("1"), vec![Unit::new("1-2", "유리수")]);
        c.apply_reference_data(next);

        assert_eq!(c.selection().school, Some(school("A")));
        assert_eq!(
            c.selection().units.iter().cloned().collect::<Vec<_>>(),
            vec![UnitKey::new("1-2", "유리수")]
        );
    }

    #[test]
    fn reload_dropping_selected_grade_clears_units() {
        let mut c = loaded();
        c.select_grade(grade("2"));
        c.toggle_unit(UnitKey::new("2-1", "일차함수"), true);

        let mut next = sample_data();
        next.grades = vec![grade("1")];
        c.apply_reference_data(next);

        assert_eq!(c.selection().grade, None);
        assert!(c.selection().units.is_empty());
    }

    #[test]
    fn reload_action_requests_a_load() {
        let mut c = loaded();
        assert_eq!(c.dispatch(Action::Reload), Effect::Load);
    }
}
