//! HTTP routes

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use regdoc_core::RAGEngine;

use crate::page::render_page;

/// Server state shared across requests
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn RAGEngine>,
}

/// Form fields posted by the Submit button
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Build the router with the query handler wired to `engine`
pub fn router(engine: Arc<dyn RAGEngine>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/clear", get(clear))
        .route("/healthz", get(healthz))
        .with_state(AppState { engine })
}

/// Text shown in the answer area for a failed query
pub fn error_message(err: &regdoc_core::Error) -> String {
    format!("An error occurred while processing your request: {}", err)
}

async fn index() -> Html<String> {
    Html(render_page("", ""))
}

async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let answer = match state.engine.answer(&form.question).await {
        Ok(answer) => answer.render(),
        Err(e) => {
            tracing::warn!("Query failed ({:?}): {}", e.kind(), e);
            error_message(&e)
        }
    };

    Html(render_page(&form.question, &answer))
}

async fn clear() -> Redirect {
    Redirect::to("/")
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
