//! HTTP endpoints for the hat game.
//!
//! Each handler loads a hat, runs one game action through [`AppState`] and
//! either renders a JSON view or redirects (303) to the page for the hat's
//! current stage.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::forms::{AddWordsForm, EnterIdForm, FormErrors};
use crate::game::{AddWordsOutcome, DrawOutcome, HatStatus};
use crate::state::AppState;
use crate::store::StoreError;
use crate::types::*;

type HandlerResult = Result<Response, StoreError>;

/// Home page: join an existing hat by id
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub errors: FormErrors,
}

/// Word entry page
#[derive(Debug, Clone, Serialize)]
pub struct AddWordsView {
    pub hat_id: HatId,
    /// Words entered so far, in input order
    pub words: Vec<String>,
    pub errors: FormErrors,
}

/// Confirmation page before play begins
#[derive(Debug, Clone, Serialize)]
pub struct StartView {
    pub hat_id: HatId,
    pub stage: Stage,
    pub words: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayView {
    pub hat_id: HatId,
    pub remaining: usize,
    pub guessed: usize,
}

/// A freshly drawn word
#[derive(Debug, Clone, Serialize)]
pub struct WordView {
    pub hat_id: HatId,
    pub word_id: WordId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameOverView {
    pub hat_id: HatId,
    pub words: usize,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_not_found() {
            (StatusCode::NOT_FOUND, self.to_string())
        } else {
            tracing::error!("Store failure: {}", self);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn add_words_path(hat_id: &str) -> String {
    format!("/addwords/{}", hat_id)
}

pub fn play_path(hat_id: &str) -> String {
    format!("/play/{}", hat_id)
}

pub fn game_over_path(hat_id: &str) -> String {
    format!("/gameover/{}", hat_id)
}

fn redirect(path: String) -> Response {
    Redirect::to(&path).into_response()
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home).post(join_hat))
        .route("/make", get(make_hat).post(make_hat))
        .route("/addwords/{hat_id}", get(add_words_page).post(submit_words))
        .route("/start/{hat_id}", get(start_page).post(start_hat))
        .route("/play/{hat_id}", get(play_page))
        .route("/getword/{hat_id}", get(draw_word))
        .route("/removeword/{hat_id}/{word_id}", post(remove_word))
        .route("/gameover/{hat_id}", get(game_over_page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// GET /
pub async fn home() -> Json<HomeView> {
    Json(HomeView {
        errors: FormErrors::default(),
    })
}

/// POST /
///
/// Valid id redirects to the play page; otherwise the form comes back with errors.
pub async fn join_hat(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EnterIdForm>,
) -> HandlerResult {
    match state.join_hat(&form).await? {
        Ok(hat) => Ok(redirect(play_path(&hat.id))),
        Err(errors) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(HomeView { errors })).into_response())
        }
    }
}

/// GET|POST /make
pub async fn make_hat(State(state): State<Arc<AppState>>) -> HandlerResult {
    let hat = state.create_hat().await?;
    Ok(redirect(add_words_path(&hat.id)))
}

fn add_words_view(hat: &Hat, errors: FormErrors) -> AddWordsView {
    AddWordsView {
        hat_id: hat.id.clone(),
        words: hat.words.iter().map(|w| w.text.clone()).collect(),
        errors,
    }
}

/// GET /addwords/{hat_id}
pub async fn add_words_page(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    let hat = state.get_hat(&hat_id).await?;
    if hat.stage != Stage::Init {
        return Ok(redirect(play_path(&hat.id)));
    }
    Ok(Json(add_words_view(&hat, FormErrors::default())).into_response())
}

/// POST /addwords/{hat_id}
pub async fn submit_words(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
    Form(form): Form<AddWordsForm>,
) -> HandlerResult {
    let hat = state.get_hat(&hat_id).await?;
    if hat.stage != Stage::Init {
        return Ok(redirect(play_path(&hat.id)));
    }

    let raw = match form.validate() {
        Ok(raw) => raw,
        Err(errors) => {
            let view = add_words_view(&hat, errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response());
        }
    };

    match state.add_words(&hat_id, raw).await? {
        AddWordsOutcome::Added(_) => Ok(redirect(add_words_path(&hat_id))),
        // Started by someone else between the read and the write
        AddWordsOutcome::AlreadyStarted => Ok(redirect(play_path(&hat_id))),
    }
}

/// GET /start/{hat_id}
pub async fn start_page(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    let hat = state.get_hat(&hat_id).await?;
    Ok(Json(StartView {
        hat_id: hat.id.clone(),
        stage: hat.stage,
        words: hat.words.len(),
    })
    .into_response())
}

/// POST /start/{hat_id}
pub async fn start_hat(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    let (hat, _) = state.start_hat(&hat_id).await?;
    Ok(redirect(play_path(&hat.id)))
}

/// GET /play/{hat_id}
pub async fn play_page(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    match state.hat_status(&hat_id).await? {
        HatStatus::Collecting => Ok(redirect(add_words_path(&hat_id))),
        HatStatus::GameOver => Ok(redirect(game_over_path(&hat_id))),
        HatStatus::Playing { remaining, guessed } => Ok(Json(PlayView {
            hat_id,
            remaining,
            guessed,
        })
        .into_response()),
    }
}

/// GET /getword/{hat_id}
pub async fn draw_word(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    match state.draw_word(&hat_id).await? {
        DrawOutcome::NotReady => Ok(redirect(add_words_path(&hat_id))),
        DrawOutcome::Empty => Ok(redirect(game_over_path(&hat_id))),
        DrawOutcome::Word(word) => Ok(Json(WordView {
            hat_id,
            word_id: word.id,
            text: word.text,
        })
        .into_response()),
    }
}

/// POST /removeword/{hat_id}/{word_id}
///
/// Unknown ids are 404. A word from another hat is silently ignored.
pub async fn remove_word(
    State(state): State<Arc<AppState>>,
    Path((hat_id, word_id)): Path<(HatId, WordId)>,
) -> HandlerResult {
    state.mark_guessed(&hat_id, &word_id).await?;
    Ok(redirect(play_path(&hat_id)))
}

/// GET /gameover/{hat_id}
pub async fn game_over_page(
    State(state): State<Arc<AppState>>,
    Path(hat_id): Path<HatId>,
) -> HandlerResult {
    let hat = state.get_hat(&hat_id).await?;
    if !hat.is_game_over() {
        return Ok(redirect(play_path(&hat.id)));
    }
    tracing::info!(hat_id = %hat.id, words = hat.words.len(), "Game over");
    Ok(Json(GameOverView {
        hat_id: hat.id.clone(),
        words: hat.words.len(),
    })
    .into_response())
}
