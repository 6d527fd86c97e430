//! Integration tests for the session and role guards.

mod common;

use common::{get_page, location, login, TestHarness};
use gv_core::Role;

#[tokio::test]
async fn anonymous_requests_are_sent_to_login() {
    let h = TestHarness::with_server().await;
    let client = h.client();

    for path in ["/dashboard_student", "/dashboard_professor", "/defaulters", "/logout"] {
        let resp = client.get(h.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 303, "{path}");
        assert_eq!(location(&resp), "/login", "{path}");
    }

    let (_, body) = get_page(&h, &client, "/login").await;
    assert!(body.contains("Please log in to access this page."));
}

#[tokio::test]
async fn student_cannot_open_professor_pages() {
    let h = TestHarness::with_server().await;
    h.create_student_with_scores("sam", &[95.0]);
    h.create_user("viewer", "pw", Role::Student);

    let client = h.client();
    login(&h, &client, "viewer", "pw").await;
    // Drop the login flash.
    get_page(&h, &client, "/").await;

    for path in ["/dashboard_professor", "/defaulters"] {
        let resp = client.get(h.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 303, "{path}");
        assert_eq!(location(&resp), "/", "{path}");
        let body = resp.text().await.unwrap();
        assert!(!body.contains("sam"), "protected page leaked for {path}");

        let (_, home) = get_page(&h, &client, "/").await;
        assert!(home.contains("Access denied."));
    }
}

#[tokio::test]
async fn professor_cannot_open_student_dashboard() {
    let h = TestHarness::with_server().await;
    h.create_user("pat", "pw", Role::Professor);

    let client = h.client();
    login(&h, &client, "pat", "pw").await;

    let resp = client.get(h.url("/dashboard_student")).send().await.unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let (status, home) = get_page(&h, &client, "/").await;
    assert_eq!(status, 200);
    assert!(home.contains("Access denied."));
    assert!(!home.contains("Student Dashboard"));
}

#[tokio::test]
async fn expired_session_is_treated_as_logged_out() {
    let mut config = common::test_config();
    config.auth.session_timeout_hours = 0;
    let h = TestHarness::with_server_config(config).await;
    h.create_user("eve", "pw", Role::Student);

    let client = h.client();
    login(&h, &client, "eve", "pw").await;

    let resp = client.get(h.url("/dashboard_student")).send().await.unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn index_shows_user_when_logged_in() {
    let h = TestHarness::with_server().await;
    h.create_user("gina", "pw", Role::Professor);

    let client = h.client();
    let (_, anon) = get_page(&h, &client, "/").await;
    assert!(anon.contains("/register"));
    assert!(!anon.contains("gina"));

    login(&h, &client, "gina", "pw").await;
    let (_, home) = get_page(&h, &client, "/").await;
    assert!(home.contains("gina"));
    assert!(home.contains("/dashboard_professor"));
    assert!(home.contains("/logout"));
}
