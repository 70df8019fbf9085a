//! Admin session gate backed by an encrypted cookie.

mod flash;

pub use flash::{Flash, FlashLevel};

use crate::config::BasicConfig;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use sha2::{Digest, Sha512};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use time::Duration;
use tracing::warn;

pub const SESSION_COOKIE: &str = "clinicdesk_session";
const LOGGED_IN: &str = "1";

/// Why a login attempt was refused. Callers must not reveal which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
    /// Admin credentials are missing from configuration.
    Unavailable,
}

impl LoginError {
    pub fn flash(self) -> Flash {
        match self {
            LoginError::InvalidCredentials => Flash::error("Invalid credentials"),
            LoginError::Unavailable => {
                Flash::error("Login service error. Please try again later.")
            }
        }
    }
}

#[derive(Clone)]
pub struct SessionGate {
    enabled: bool,
    admin_username: Option<Arc<str>>,
    admin_password: Option<Arc<str>>,
    secure_cookie: bool,
}

impl SessionGate {
    pub fn from_config(basic: &BasicConfig) -> Self {
        Self {
            enabled: basic.auth_gate_enabled,
            admin_username: basic.admin_username.as_deref().map(Arc::from),
            admin_password: basic.admin_password.as_deref().map(Arc::from),
            secure_cookie: !basic.insecure_cookie,
        }
    }

    /// `false` in the open demo deployment: every request counts as authenticated.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether cookies set for this gate carry `Secure`.
    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }

    pub fn is_authenticated(&self, jar: &PrivateCookieJar) -> bool {
        !self.enabled
            || jar
                .get(SESSION_COOKIE)
                .is_some_and(|c| c.value() == LOGGED_IN)
    }

    /// Checks the supplied credentials against the configured admin pair and marks
    /// the session authenticated on an exact match.
    pub fn login(
        &self,
        jar: PrivateCookieJar,
        username: &str,
        password: &str,
    ) -> (PrivateCookieJar, Result<(), LoginError>) {
        let (Some(expected_user), Some(expected_pass)) =
            (self.admin_username.as_deref(), self.admin_password.as_deref())
        else {
            warn!("Login refused: admin credentials are not configured");
            return (jar, Err(LoginError::Unavailable));
        };

        let user_ok: bool = username.as_bytes().ct_eq(expected_user.as_bytes()).into();
        let pass_ok: bool = password.as_bytes().ct_eq(expected_pass.as_bytes()).into();
        if !(user_ok & pass_ok) {
            warn!(username = %username, "Login refused: invalid credentials");
            return (jar, Err(LoginError::InvalidCredentials));
        }

        (jar.add(self.session_cookie()), Ok(()))
    }

    /// Clears the authenticated flag. Safe to call without a session.
    pub fn logout(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    fn session_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, LOGGED_IN))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(Duration::hours(12))
            .build()
    }
}

/// Cookie encryption key: SHA-512 of the configured secret, or a random
/// per-process key when none is set.
pub fn cookie_key(session_secret: Option<&str>) -> Key {
    match session_secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => {
            warn!("basic.session_secret is unset; sessions will not survive a restart");
            Key::generate()
        }
    }
}
