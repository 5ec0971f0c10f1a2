use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::{ok, AppError, SuccessResponse};
use crate::state::AppState;
use crate::supply::{QueueState, SupplyOutcome};
use crate::types::{Tier, WordEntry};

type ApiResult<T> = Result<Json<SuccessResponse<T>>, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Ready,
    Loading,
    /// Nothing could be fetched; the UI shows its "no word found" state.
    Empty,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    status: QuizStatus,
    current_word: Option<WordEntry>,
    difficulty: Tier,
    previous_count: usize,
    upcoming_count: usize,
    fetching: bool,
}

impl From<QueueState> for QuizView {
    fn from(state: QueueState) -> Self {
        let status = match (&state.current, state.fetch_in_flight) {
            (Some(_), _) => QuizStatus::Ready,
            (None, true) => QuizStatus::Loading,
            (None, false) => QuizStatus::Empty,
        };
        Self {
            status,
            difficulty: state.difficulty,
            previous_count: state.previous.len(),
            upcoming_count: state.upcoming.len(),
            fetching: state.fetch_in_flight,
            current_word: state.current,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    outcome: SupplyOutcome,
    view: QuizView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<SupplyOutcome>,
    view: QuizView,
}

#[derive(Debug, Deserialize)]
pub struct SetDifficultyRequest {
    difficulty: String,
}

#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    guess: String,
}

pub async fn view(State(state): State<AppState>) -> ApiResult<QuizView> {
    Ok(ok(state.supply().snapshot().into()))
}

pub async fn set_difficulty(
    State(state): State<AppState>,
    Json(body): Json<SetDifficultyRequest>,
) -> ApiResult<TransitionResponse> {
    let tier = Tier::from_str(&body.difficulty).ok_or_else(|| {
        AppError::validation(format!(
            "difficulty must be one of beginner, intermediate, advanced (got {:?})",
            body.difficulty
        ))
    })?;

    let supply = state.supply();
    let outcome = supply.set_difficulty(tier).await;
    Ok(ok(TransitionResponse {
        outcome,
        view: supply.snapshot().into(),
    }))
}

pub async fn next(State(state): State<AppState>) -> ApiResult<TransitionResponse> {
    let supply = state.supply();
    let outcome = supply.advance().await;
    if outcome == SupplyOutcome::Busy {
        return Err(AppError::conflict("a word is already being fetched"));
    }
    Ok(ok(TransitionResponse {
        outcome,
        view: supply.snapshot().into(),
    }))
}

/// Checks a typed guess and moves on to the next word when it is right.
pub async fn guess(
    State(state): State<AppState>,
    Json(body): Json<GuessRequest>,
) -> ApiResult<GuessResponse> {
    let supply = state.supply();
    let result = supply
        .submit_guess(&body.guess)
        .await
        .ok_or_else(|| AppError::not_found("no word loaded"))?;

    if result.outcome == Some(SupplyOutcome::Busy) {
        return Err(AppError::conflict("a word is already being fetched"));
    }

    tracing::debug!(correct = result.correct, outcome = ?result.outcome, "guess checked");
    Ok(ok(GuessResponse {
        correct: result.correct,
        outcome: result.outcome,
        view: supply.snapshot().into(),
    }))
}

pub async fn history(State(state): State<AppState>) -> ApiResult<Vec<WordEntry>> {
    Ok(ok(state.supply().history()))
}
