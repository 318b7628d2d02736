use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use unitpick_api::client::{ApiError, ApiResult};
use unitpick_api::{ReferenceData, SaveReceipt, SaveRequest};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadReferenceData,
    Save { request: SaveRequest },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ReferenceDataLoaded { data: ReferenceData },
    ReferenceDataFailed { error: ApiError },
    /// Sent for every save attempt, success or not, so the lock is always released.
    SaveFinished { result: ApiResult<SaveReceipt> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
