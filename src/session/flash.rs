use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

pub const FLASH_COOKIE: &str = "clinicdesk_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Error,
    Info,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(FlashLevel::Error),
            "info" => Some(FlashLevel::Info),
            _ => None,
        }
    }
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    /// `secure` should match the session cookie's `Secure` attribute.
    pub fn push(self, jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
        let value = format!("{}:{}", self.level.as_str(), self.message);
        jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .secure(secure)
                .same_site(SameSite::Lax)
                .max_age(Duration::minutes(5))
                .build(),
        )
    }

    /// Reads and removes the pending flash, if any.
    pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
        let flash = jar.get(FLASH_COOKIE).and_then(|c| {
            let (level, message) = c.value().split_once(':')?;
            Some(Flash {
                level: FlashLevel::parse(level)?,
                message: message.to_string(),
            })
        });
        match flash {
            Some(flash) => (
                jar.remove(Cookie::build(FLASH_COOKIE).path("/")),
                Some(flash),
            ),
            None => (jar, None),
        }
    }
}
