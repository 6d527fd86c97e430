//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB and a full
//! [`AppContext`]. The [`TestHarness::with_server`] constructor starts Axum
//! on a random port for HTTP-level testing with a cookie-keeping client.

#![allow(dead_code)]

use std::net::SocketAddr;

use chrono::NaiveDate;
use gv_core::config::Config;
use gv_core::Role;
use gv_db::models::User;
use gv_db::pool::{init_memory_pool, DbPool};
use gv_server::context::AppContext;
use gv_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub addr: Option<SocketAddr>,
}

/// Config used by every harness: cheap bcrypt so tests stay fast.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.bcrypt_cost = 4;
    config
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, db.clone()).expect("failed to build context");
        Self {
            ctx,
            db,
            addr: None,
        }
    }

    /// Start an Axum server on a random port.
    pub async fn with_server() -> Self {
        Self::with_server_config(test_config()).await
    }

    pub async fn with_server_config(config: Config) -> Self {
        let mut harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        harness.addr = Some(listener.local_addr().expect("failed to get local addr"));

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        harness
    }

    pub fn url(&self, path: &str) -> String {
        let addr = self.addr.expect("harness has no server");
        format!("http://{addr}{path}")
    }

    /// A browser-like client: keeps cookies, never follows redirects.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client")
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> gv_db::pool::PooledConnection {
        gv_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    pub fn user(&self, username: &str) -> Option<User> {
        gv_db::queries::users::get_user_by_username(&self.conn(), username)
            .expect("user lookup failed")
    }

    /// Insert a user directly, hashing `password` at the configured cost.
    pub fn create_user(&self, username: &str, password: &str, role: Role) -> User {
        let hash = bcrypt::hash(password, self.ctx.config.auth.bcrypt_cost).expect("hash failed");
        gv_db::queries::users::create_user(&self.conn(), username, &hash, role)
            .expect("failed to create user")
    }

    /// Create a student with the given scores, one mark per subject.
    pub fn create_student_with_scores(&self, username: &str, scores: &[f64]) -> User {
        let user = self.create_user(username, "pw", Role::Student);
        let conn = self.conn();
        for (i, score) in scores.iter().enumerate() {
            gv_db::queries::marks::insert_mark(&conn, user.id, &format!("Subject {}", i + 1), *score)
                .expect("failed to insert mark");
        }
        user
    }

    pub fn add_attendance(&self, user: &User, date: &str, status: &str) {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("bad date");
        gv_db::queries::attendance::insert_attendance(&self.conn(), user.id, date, status)
            .expect("failed to insert attendance");
    }
}

/// Location header of a redirect response.
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .expect("response is not a redirect")
        .to_str()
        .expect("non-ascii location")
        .to_string()
}

/// Submit a form and return the (unfollowed) response.
pub async fn post_form(
    h: &TestHarness,
    client: &reqwest::Client,
    path: &str,
    form: &[(&str, &str)],
) -> reqwest::Response {
    client
        .post(h.url(path))
        .form(form)
        .send()
        .await
        .expect("request failed")
}

/// GET `path` and return status plus body text.
pub async fn get_page(
    h: &TestHarness,
    client: &reqwest::Client,
    path: &str,
) -> (reqwest::StatusCode, String) {
    let resp = client.get(h.url(path)).send().await.expect("request failed");
    let status = resp.status();
    (status, resp.text().await.expect("body"))
}

/// Log in through the form. Panics unless the login redirects to a dashboard.
pub async fn login(h: &TestHarness, client: &reqwest::Client, username: &str, password: &str) {
    let resp = post_form(
        h,
        client,
        "/login",
        &[("username", username), ("password", password)],
    )
    .await;
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).starts_with("/dashboard_"), "login failed for {username}");
}
