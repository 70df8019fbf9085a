mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn pages_redirect_to_login_until_authenticated() {
    let t = spawn_app("pages", test_config(true), RecordingUploader::default()).await;

    for uri in ["/dashboard", "/clinics"] {
        let resp = t.send(get(uri, None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&resp), Some("/"));
    }

    let resp = t.send(get("/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"<form method="post" action="/">"#));

    let cookie = t.login().await;
    for uri in ["/dashboard", "/clinics"] {
        let resp = t.send(get(uri, Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }

    // Already logged in: the login page bounces to the dashboard.
    let resp = t.send(get("/", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));
}

#[tokio::test]
async fn bad_credentials_flash_an_error() {
    let t = spawn_app("bad-login", test_config(true), RecordingUploader::default()).await;

    let resp = t.send(login_request(ADMIN_USER, "wrong", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    let cookie = cookie_header(&resp);
    assert!(!cookie.contains("clinicdesk_session="));

    let resp = t.send(get("/", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_text(resp).await;
    assert!(page.contains("Invalid credentials"));

    // The flash cookie alone is not a session.
    let resp = t.send(get("/api/clinics", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_admin_reports_service_error() {
    let mut cfg = test_config(true);
    cfg.basic.admin_password = None;
    let t = spawn_app("no-admin", cfg, RecordingUploader::default()).await;

    let resp = t.send(login_request(ADMIN_USER, "", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let cookie = cookie_header(&resp);
    let page = body_text(t.send(get("/", Some(&cookie))).await).await;
    assert!(page.contains("Login service error. Please try again later."));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let t = spawn_app("logout", test_config(true), RecordingUploader::default()).await;
    let cookie = t.login().await;

    let resp = t.send(get("/api/clinics", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = t.send(get("/logout", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    let after = cookie_header(&resp);
    assert!(!after.contains("clinicdesk_session="));

    let resp = t.send(get("/api/clinics", Some(&after))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let page = body_text(t.send(get("/", Some(&after))).await).await;
    assert!(page.contains("You have been logged out"));

    // Logging out again without a session is harmless.
    let resp = t.send(get("/logout", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

fn has_secure(line: &str) -> bool {
    line.split(';').any(|attr| attr.trim().eq_ignore_ascii_case("secure"))
}

#[tokio::test]
async fn session_and_flash_cookies_share_the_secure_setting() {
    let t = spawn_app("secure-cookies", test_config(true), RecordingUploader::default()).await;

    let resp = t.send(login_request(ADMIN_USER, ADMIN_PASS, None)).await;
    let session = set_cookie(&resp, "clinicdesk_session").expect("session cookie set");
    assert!(has_secure(&session), "{session}");

    let resp = t.send(login_request(ADMIN_USER, "wrong", None)).await;
    let flash = set_cookie(&resp, "clinicdesk_flash").expect("flash cookie set");
    assert!(has_secure(&flash), "{flash}");

    let mut cfg = test_config(true);
    cfg.basic.insecure_cookie = true;
    let t = spawn_app("insecure-cookies", cfg, RecordingUploader::default()).await;

    let resp = t.send(login_request(ADMIN_USER, ADMIN_PASS, None)).await;
    let session = set_cookie(&resp, "clinicdesk_session").expect("session cookie set");
    assert!(!has_secure(&session), "{session}");

    let resp = t.send(get("/logout", None)).await;
    let flash = set_cookie(&resp, "clinicdesk_flash").expect("flash cookie set");
    assert!(!has_secure(&flash), "{flash}");
}

#[tokio::test]
async fn demo_variant_has_no_login_wall() {
    let t = spawn_app("demo-pages", test_config(false), RecordingUploader::default()).await;

    let resp = t.send(get("/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"id="dashboard""#));

    for uri in ["/dashboard", "/clinics"] {
        let resp = t.send(get(uri, None)).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let t = spawn_app("404", test_config(true), RecordingUploader::default()).await;
    let resp = t.send(get("/api/patients", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
