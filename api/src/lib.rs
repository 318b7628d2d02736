pub mod client;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// A middle-school year label, e.g. "1". Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(pub String);

impl Grade {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label shown in the grade list and summary.
    pub fn display_label(&self) -> String {
        format!("중학교 {}학년", self.0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolName(pub String);

impl SchoolName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A curriculum unit as the backend sends it: `{ "number": "1-1", "unit": "정수" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(deserialize_with = "wire::label")]
    pub number: String,
    #[serde(deserialize_with = "wire::label")]
    pub unit: String,
}

impl Unit {
    pub fn new(number: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            unit: unit.into(),
        }
    }

    pub fn key(&self) -> UnitKey {
        UnitKey::from(self)
    }
}

/// Identity of a unit within a grade's list. Compared structurally on
/// (number, unit), so no separator can collide with either field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub number: String,
    pub unit: String,
}

impl UnitKey {
    pub fn new(number: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            unit: unit.into(),
        }
    }
}

impl From<&Unit> for UnitKey {
    fn from(unit: &Unit) -> Self {
        Self {
            number: unit.number.clone(),
            unit: unit.unit.clone(),
        }
    }
}

impl From<UnitKey> for Unit {
    fn from(key: UnitKey) -> Self {
        Self {
            number: key.number,
            unit: key.unit,
        }
    }
}

// Log formatting only; never parsed back.
impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.number, self.unit)
    }
}

/// Everything the selector offers, loaded once from `/api/data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub grades: Vec<Grade>,
    pub schools: Vec<SchoolName>,
    pub units_by_grade: HashMap<Grade, Vec<Unit>>,
}

impl ReferenceData {
    /// Units offered for `grade`, in backend order. Unknown grades have none.
    pub fn units_for(&self, grade: &Grade) -> &[Unit] {
        self.units_by_grade
            .get(grade)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_unit(&self, grade: &Grade, key: &UnitKey) -> bool {
        self.units_for(grade)
            .iter()
            .any(|u| u.number == key.number && u.unit == key.unit)
    }

    pub fn has_grade(&self, grade: &Grade) -> bool {
        self.grades.contains(grade)
    }

    pub fn has_school(&self, school: &SchoolName) -> bool {
        self.schools.contains(school)
    }
}

/// Body of `POST /api/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub grade: Grade,
    pub school: SchoolName,
    pub units: Vec<Unit>,
}

/// Backend acknowledgement of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub saved: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_key_round_trips_back_into_unit() {
        let unit = Unit::new("1-1", "정수");
        let key = unit.key();
        assert_eq!(key, UnitKey::new("1-1", "정수"));
        assert_eq!(Unit::from(key), unit);
    }

    #[test]
    fn unit_key_survives_pipe_in_either_field() {
        let unit = Unit::new("2|3", "a|b");
        assert_eq!(Unit::from(unit.key()), unit);
        assert_ne!(UnitKey::new("2|3", "x"), UnitKey::new("2", "3|x"));
    }

    #[test]
    fn units_for_unknown_grade_is_empty() {
        let data = ReferenceData::default();
        assert!(data.units_for(&Grade::new("9")).is_empty());
    }

    #[test]
    fn grade_display_label_uses_middle_school_wording() {
        assert_eq!(Grade::new("2").display_label(), "중학교 2학년");
    }

    #[test]
    fn save_request_serializes_to_backend_shape() {
        let req = SaveRequest {
            grade: Grade::new("1"),
            school: SchoolName::new("A"),
            units: vec![Unit::new("1-1", "정수")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grade": "1",
                "school": "A",
                "units": [{ "number": "1-1", "unit": "정수" }],
            })
        );
    }
}
