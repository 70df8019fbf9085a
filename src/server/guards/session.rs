use crate::error::ClinicDeskError;
use crate::server::router::ClinicDeskState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

fn session_ok(parts: &Parts, state: &ClinicDeskState) -> bool {
    if !state.gate.enabled() {
        return true;
    }
    let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
    state.gate.is_authenticated(&jar)
}

/// API guard: unauthenticated requests get `401 {"error":"Unauthorized"}`.
#[derive(Debug, Clone, Copy)]
pub struct RequireSession;

impl FromRequestParts<ClinicDeskState> for RequireSession {
    type Rejection = ClinicDeskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClinicDeskState,
    ) -> Result<Self, Self::Rejection> {
        if session_ok(parts, state) {
            Ok(RequireSession)
        } else {
            Err(ClinicDeskError::Unauthorized)
        }
    }
}

/// Page guard: unauthenticated requests are sent back to the login page.
#[derive(Debug, Clone, Copy)]
pub struct RequirePageSession;

pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

impl FromRequestParts<ClinicDeskState> for RequirePageSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClinicDeskState,
    ) -> Result<Self, Self::Rejection> {
        if session_ok(parts, state) {
            Ok(RequirePageSession)
        } else {
            Err(LoginRedirect)
        }
    }
}
