/// Backend raw wire types — serde shapes for the Flask endpoints.
/// These map to the clean domain types in client.rs.
use crate::Unit;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Labels: spreadsheet-backed endpoints send `1` as often as `"1"`
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Label {
    Text(String),
    Number(serde_json::Number),
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Text(s) => s,
            Label::Number(n) => n.to_string(),
        }
    }
}

/// A string label that may arrive as a JSON number.
pub(crate) fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Label::deserialize(deserializer).map(String::from)
}

fn labels<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Label>>::deserialize(deserializer)?;
    Ok(raw.map(|items| items.into_iter().map(String::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/data
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DataResponse {
    #[serde(default)]
    pub ok: bool,
    pub error: Option<String>,
    #[serde(default, deserialize_with = "labels")]
    pub grades: Option<Vec<String>>,
    #[serde(default, deserialize_with = "labels")]
    pub schools: Option<Vec<String>>,
    #[serde(rename = "unitsByGrade")]
    pub units_by_grade: Option<HashMap<String, Vec<Unit>>>,
}

// ---------------------------------------------------------------------------
// POST /api/save
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SaveResponse {
    #[serde(default)]
    pub ok: bool,
    pub saved: Option<u32>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/debug  (credential + spreadsheet diagnostics)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct DebugReport {
    #[serde(default)]
    pub env_length: usize,
    pub env_start: Option<String>,
    #[serde(default)]
    pub credential_status: String,
    pub worksheets: Option<Vec<String>>,
    pub sheets_error: Option<String>,
    pub trace: Option<String>,
    pub status: Option<String>,
}

impl DebugReport {
    /// The backend only sets `status` once credentials and the sheet both worked.
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}
