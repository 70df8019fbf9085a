//! Minimal HTML shells for the browser routes. The real dashboard front-end
//! fetches everything from the `/api/*` routes.

use crate::session::Flash;
use axum::response::Html;

const LOGIN_FORM: &str = r#"<form method="post" action="/">
  <input name="username" placeholder="Username" autocomplete="username">
  <input name="password" type="password" placeholder="Password" autocomplete="current-password">
  <button type="submit">Sign in</button>
</form>"#;

const DASHBOARD_BODY: &str = r#"<main id="dashboard" data-stats="/api/stats" data-analytics="/api/patient-analytics" data-distribution="/api/hospital-distribution"></main>
<a href="/clinics">Clinics</a> <a href="/logout">Log out</a>"#;

const CLINICS_BODY: &str = r#"<main id="clinics" data-source="/api/clinics"></main>
<a href="/dashboard">Dashboard</a> <a href="/logout">Log out</a>"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub(crate) fn render(title: &str, flash: Option<&Flash>, body: &str) -> Html<String> {
    let flash = flash
        .map(|f| {
            format!(
                r#"<p class="flash flash-{}">{}</p>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{flash}\n{body}\n</body></html>\n"
    ))
}

pub(crate) fn login_html(flash: Option<&Flash>) -> Html<String> {
    render("Sign in", flash, LOGIN_FORM)
}

pub(crate) fn dashboard_html(flash: Option<&Flash>) -> Html<String> {
    render("Dashboard", flash, DASHBOARD_BODY)
}

/// GET /dashboard
pub async fn dashboard() -> Html<String> {
    dashboard_html(None)
}

/// GET /clinics
pub async fn clinics() -> Html<String> {
    render("Clinics", None, CLINICS_BODY)
}
