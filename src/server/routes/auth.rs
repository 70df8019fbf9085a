use super::pages;
use crate::server::router::ClinicDeskState;
use crate::session::Flash;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /
///
/// Login page, or the dashboard itself when the session gate is disabled.
pub async fn login_page(State(state): State<ClinicDeskState>, jar: PrivateCookieJar) -> Response {
    if state.gate.enabled() && state.gate.is_authenticated(&jar) {
        return Redirect::to("/dashboard").into_response();
    }

    let (jar, flash) = Flash::take(jar);
    let page = if state.gate.enabled() {
        pages::login_html(flash.as_ref())
    } else {
        pages::dashboard_html(flash.as_ref())
    };
    (jar, page).into_response()
}

/// POST /
pub async fn login(
    State(state): State<ClinicDeskState>,
    jar: PrivateCookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    if state.gate.is_authenticated(&jar) {
        return Redirect::to("/dashboard").into_response();
    }

    let form = form.map(|Form(f)| f).unwrap_or_default();
    let (jar, result) = state.gate.login(jar, &form.username, &form.password);
    match result {
        Ok(()) => {
            info!(username = %form.username, "Admin logged in");
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(err) => (
            err.flash().push(jar, state.gate.secure_cookie()),
            Redirect::to("/"),
        )
            .into_response(),
    }
}

/// GET /logout
pub async fn logout(State(state): State<ClinicDeskState>, jar: PrivateCookieJar) -> Response {
    let jar = state.gate.logout(jar);
    let jar = Flash::info("You have been logged out")
        .push(jar, state.gate.secure_cookie());
    (jar, Redirect::to("/")).into_response()
}
