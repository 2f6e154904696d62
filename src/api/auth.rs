use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::pages::{self, ErrorPage, InvalidPage, LoginPage, WelcomePage};
use crate::api::server::AppState;
use crate::verifier::{self, Verdict};

/// A missing field deserializes to the empty string.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form() -> Response {
    pages::render(StatusCode::OK, &LoginPage::default())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match verifier::verify(state.store.as_ref(), &form.username, &form.password).await {
        Ok(Verdict::Match(username)) => {
            tracing::info!(username = %username, "login succeeded");
            pages::render(StatusCode::OK, &WelcomePage::new(username))
        }
        Ok(Verdict::NoMatch) => {
            tracing::info!("login rejected: invalid credentials");
            pages::render(StatusCode::UNAUTHORIZED, &InvalidPage::default())
        }
        Err(err) => {
            tracing::error!(error = ?err, "login failed: storage error");
            pages::render(StatusCode::INTERNAL_SERVER_ERROR, &ErrorPage::default())
        }
    }
}
