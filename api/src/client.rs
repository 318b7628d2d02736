use crate::wire::{DataResponse, DebugReport, SaveResponse};
use crate::{Grade, ReferenceData, SaveReceipt, SaveRequest, SchoolName};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the selector backend (`/api/data`, `/api/save`, `/api/debug`).
#[derive(Debug, Clone)]
pub struct SelectorApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SelectorApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// Well-formed response carrying `ok: false`.
    Rejected(Option<String>),
    Other(String),
}

impl ApiError {
    /// True for application-level failures, false for transport-level ones.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Rejected(Some(msg)) => write!(f, "Rejected by server: {msg}"),
            ApiError::Rejected(None) => write!(f, "Rejected by server"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl SelectorApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder()
                .user_agent(concat!("unitpick/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch grades, schools and the per-grade unit lists.
    ///
    /// Missing lists in an `ok: true` response are treated as empty.
    pub async fn fetch_reference_data(&self) -> ApiResult<ReferenceData> {
        let url = format!("{}/api/data", self.base_url);
        let raw: DataResponse = self.decode(self.client.get(&url), &url).await?;
        map_reference_data(raw)
    }

    /// Submit one selection. The receipt carries the backend's saved count.
    pub async fn save_selection(&self, request: &SaveRequest) -> ApiResult<SaveReceipt> {
        let url = format!("{}/api/save", self.base_url);
        let raw: SaveResponse = self
            .decode(self.client.post(&url).json(request), &url)
            .await?;
        map_save_response(raw, request.units.len())
    }

    /// Backend credential and spreadsheet diagnostics.
    pub async fn fetch_debug(&self) -> ApiResult<DebugReport> {
        let url = format!("{}/api/debug", self.base_url);
        self.decode(self.client.get(&url), &url).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> ApiResult<T> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let Some(status_error) = response.error_for_status_ref().err() else {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned()));
        };

        // The backend reports `ok: false` bodies on error statuses too; those
        // carry the message the user should see.
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        serde_json::from_slice::<T>(&body).map_err(|_| ApiError::Api(status_error, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_reference_data(raw: DataResponse) -> ApiResult<ReferenceData> {
    if !raw.ok {
        return Err(ApiError::Rejected(raw.error));
    }
    Ok(ReferenceData {
        grades: raw
            .grades
            .unwrap_or_default()
            .into_iter()
            .map(Grade)
            .collect(),
        schools: raw
            .schools
            .unwrap_or_default()
            .into_iter()
            .map(SchoolName)
            .collect(),
        units_by_grade: raw
            .units_by_grade
            .unwrap_or_default()
            .into_iter()
            .map(|(grade, units)| (Grade(grade), units))
            .collect(),
    })
}

fn map_save_response(raw: SaveResponse, sent: usize) -> ApiResult<SaveReceipt> {
    if !raw.ok {
        return Err(ApiError::Rejected(raw.error));
    }
    let saved = raw
        .saved
        .unwrap_or_else(|| u32::try_from(sent).unwrap_or(u32::MAX));
    Ok(SaveReceipt { saved })
}
