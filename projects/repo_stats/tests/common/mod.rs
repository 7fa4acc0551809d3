#![allow(dead_code)]

pub mod fake_github;

use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use projects_repo_stats::{
    config::RefreshConfig, context::AppContext, db::PgPool, router::build_router,
};

/// Pool pointing at a port nothing listens on; every checkout fails fast.
pub fn unreachable_pool() -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new("postgres://nobody@127.0.0.1:1/none");
    Pool::builder()
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(250))
        .build_unchecked(manager)
}

pub fn test_app(github: &fake_github::FakeGitHub, token: Option<&str>) -> Router {
    test_app_with_pool(unreachable_pool(), github, token)
}

/// Router over `pool`, refreshing `octo/widgets` from the fake upstream.
pub fn test_app_with_pool(
    pool: PgPool,
    github: &fake_github::FakeGitHub,
    token: Option<&str>,
) -> Router {
    let ctx = AppContext::new(
        pool,
        github.api(),
        token.map(str::to_string),
        RefreshConfig {
            repositories: vec!["octo/widgets".parse().expect("repo id")],
            window_days: 3,
        },
    );
    build_router(ctx)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
