use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub title: &'static str,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self { title: "Login" }
    }
}

/// `username` is escaped by the template engine.
#[derive(Template)]
#[template(path = "welcome.html")]
pub struct WelcomePage {
    pub title: &'static str,
    pub username: String,
}

impl WelcomePage {
    pub fn new(username: String) -> Self {
        Self {
            title: "Welcome",
            username,
        }
    }
}

#[derive(Template)]
#[template(path = "invalid.html")]
pub struct InvalidPage {
    pub title: &'static str,
}

impl Default for InvalidPage {
    fn default() -> Self {
        Self {
            title: "Invalid credentials",
        }
    }
}

/// Carries no details about the failure.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub title: &'static str,
}

impl Default for ErrorPage {
    fn default() -> Self {
        Self { title: "Error" }
    }
}

pub fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("template render failed, err={}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
