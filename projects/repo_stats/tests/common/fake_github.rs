//! In-process stand-in for the GitHub REST and GraphQL APIs.
//!
//! Repository names select canned behaviour:
//! - `widgets`: complete, well-formed data
//! - `busy`: 120 pull requests opened yesterday, spread over two pages
//! - `young`: code frequency covering only three months
//! - `pending`: every statistics endpoint answers 202
//! - `missing`: 404 everywhere
//! - `limited`: 403 with an exhausted rate limit quota
//! - `throttled`: contributors whose GraphQL lookup hits an exhausted quota

use std::{collections::HashMap, time::Duration};

use axum::{
    extract::{Json, Path, Query},
    http::{
        header::{AUTHORIZATION, LAST_MODIFIED, LINK},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Days, NaiveDate, Utc};
use interfaces_github_stats::index::GitHubApi;
use serde_json::{json, Value};

pub const GOOD_TOKEN: &str = "good-token";
pub const LAST_MODIFIED_VALUE: &str = "Tue, 01 Oct 2024 12:00:00 GMT";
pub const CONTRIBUTOR_COUNT: u64 = 57;
pub const COMMIT_COUNT: u64 = 4821;
pub const OPEN_PULL_COUNT: u64 = 12;
/// A GraphQL lookup including this login answers like an exhausted quota.
pub const QUOTA_EXHAUSTED_LOGIN: &str = "quota-exhausted";

pub struct FakeGitHub {
    pub base_url: String,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/repos/{owner}/{name}", get(repository))
            .route("/repos/{owner}/{name}/contributors", get(contributors))
            .route("/repos/{owner}/{name}/commits", get(commits))
            .route("/repos/{owner}/{name}/pulls", get(pulls))
            .route("/repos/{owner}/{name}/pulls/{number}", get(pull_detail))
            .route("/repos/{owner}/{name}/stats/{stat}", get(stats))
            .route("/users/{login}", get(user))
            .route("/graphql", post(graphql));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake github");
        let addr = listener.local_addr().expect("fake github addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake github");
        });

        Self {
            base_url: format!("http://{addr}"),
        }
    }

    pub fn api(&self) -> GitHubApi {
        GitHubApi::new(&self.base_url, Duration::from_secs(5)).expect("build github api")
    }
}

fn guard(headers: &HeaderMap, name: &str) -> Option<Response> {
    let expected = format!("Bearer {GOOD_TOKEN}");
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());

    if !authorized {
        return Some((StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"}))).into_response());
    }
    match name {
        "missing" => Some((StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response()),
        "limited" => Some(
            (
                StatusCode::FORBIDDEN,
                [("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1700000000")],
                Json(json!({"message": "API rate limit exceeded"})),
            )
                .into_response(),
        ),
        _ => None,
    }
}

fn last_page_link(resource: &str, last: u64) -> String {
    format!(
        r#"<https://api.github.com/repositories/1/{resource}?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1/{resource}?per_page=1&page={last}>; rel="last""#
    )
}

fn timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).expect("midnight").and_utc().timestamp()
}

fn weekly(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut weeks = Vec::new();
    let mut day = first;
    while day <= last {
        weeks.push(day);
        day = day.checked_add_days(Days::new(7)).expect("next week");
    }
    weeks
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// `(number, created_at)` newest first.
pub fn fake_pulls(name: &str) -> Vec<(u64, DateTime<Utc>)> {
    let today = Utc::now().date_naive();
    let at_noon = |days_ago: u64| {
        today
            .checked_sub_days(Days::new(days_ago))
            .expect("past date")
            .and_hms_opt(12, 0, 0)
            .expect("noon")
            .and_utc()
    };

    match name {
        "widgets" => (0..6u64).map(|days_ago| (6 - days_ago, at_noon(days_ago))).collect(),
        "busy" => (1..=120u64).rev().map(|number| (number, at_noon(1))).collect(),
        _ => Vec::new(),
    }
}

/// `(display name, followers)` as REST reports it.
fn profile(login: &str) -> (Option<String>, u64) {
    if login == "octocat" {
        return (Some("The Octocat".to_string()), 42);
    }
    match login.strip_prefix("user").and_then(|n| n.parse::<u64>().ok()) {
        Some(n) => (Some(format!("User {n}")), n * 10),
        None => (None, 0),
    }
}

async fn repository(headers: HeaderMap, Path((owner, name)): Path<(String, String)>) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }

    (
        [(LAST_MODIFIED, LAST_MODIFIED_VALUE)],
        Json(json!({
            "name": name,
            "full_name": format!("{owner}/{name}"),
            "description": "Widgets for everyone",
            "homepage": null,
            "languages_url": format!("https://api.github.com/repos/{owner}/{name}/languages"),
            "subscribers_count": 31,
            "watchers_count": 1200,
            "forks_count": 88,
            "owner": {
                "login": "octocat",
                "avatar_url": "https://avatars.githubusercontent.com/u/583231",
                "url": "https://api.github.com/users/octocat"
            }
        })),
    )
        .into_response()
}

async fn contributors(headers: HeaderMap, Path((_owner, name)): Path<(String, String)>) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }
    (
        [(LINK, last_page_link("contributors", CONTRIBUTOR_COUNT))],
        Json(json!([{"login": "user1"}])),
    )
        .into_response()
}

async fn commits(headers: HeaderMap, Path((_owner, name)): Path<(String, String)>) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }
    (
        [(LINK, last_page_link("commits", COMMIT_COUNT))],
        Json(json!([{"sha": "abc"}])),
    )
        .into_response()
}

async fn pulls(
    headers: HeaderMap,
    Path((_owner, name)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }

    if query.get("state").map(String::as_str) == Some("open") {
        return (
            [(LINK, last_page_link("pulls", OPEN_PULL_COUNT))],
            Json(json!([{"number": 1}])),
        )
            .into_response();
    }

    let per_page: usize = query.get("per_page").and_then(|v| v.parse().ok()).unwrap_or(30);
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let listing: Vec<Value> = fake_pulls(&name)
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|(number, created_at)| json!({"number": number, "created_at": created_at}))
        .collect();

    Json(listing).into_response()
}

async fn pull_detail(
    headers: HeaderMap,
    Path((_owner, name, number)): Path<(String, String, u64)>,
) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }

    match fake_pulls(&name).into_iter().find(|(n, _)| *n == number) {
        Some((number, created_at)) => Json(json!({
            "number": number,
            "created_at": created_at,
            "merged": number % 2 == 0,
            "additions": number * 10,
            "deletions": number,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stats(
    headers: HeaderMap,
    Path((_owner, name, stat)): Path<(String, String, String)>,
) -> Response {
    if let Some(rejection) = guard(&headers, &name) {
        return rejection;
    }
    if name == "pending" {
        return (StatusCode::ACCEPTED, Json(json!({}))).into_response();
    }

    let body = match stat.as_str() {
        "contributors" => {
            let entries: Vec<Value> = (0..95u64)
                .map(|i| {
                    let author = match i {
                        _ if name == "throttled" => json!({"login": QUOTA_EXHAUSTED_LOGIN}),
                        92 => Value::Null,
                        93 => json!({"login": "helper[bot]"}),
                        _ => json!({"login": format!("user{i}")}),
                    };
                    json!({"author": author, "total": i + 1, "weeks": []})
                })
                .collect();
            Value::Array(entries)
        }
        "commit_activity" => {
            let weeks = weekly(ymd(2023, 1, 1), ymd(2023, 12, 24));
            Value::Array(
                weeks
                    .into_iter()
                    .enumerate()
                    .map(|(i, week)| json!({"days": [0, 0, 0, 0, 0, 0, i], "total": i, "week": timestamp(week)}))
                    .collect(),
            )
        }
        "code_frequency" => {
            let weeks = if name == "young" {
                weekly(ymd(2024, 1, 7), ymd(2024, 3, 31))
            } else {
                weekly(ymd(2023, 1, 1), ymd(2024, 1, 28))
            };
            Value::Array(
                weeks
                    .into_iter()
                    .enumerate()
                    .map(|(i, week)| json!([timestamp(week), 10 * i, -(i as i64)]))
                    .collect(),
            )
        }
        "punch_card" => json!([[0, 5, 3], [0, 9, 2], [1, 10, 7]]),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    Json(body).into_response()
}

async fn user(headers: HeaderMap, Path(login): Path<String>) -> Response {
    if let Some(rejection) = guard(&headers, &login) {
        return rejection;
    }
    let (name, followers) = profile(&login);
    Json(json!({"login": login, "name": name, "followers": followers})).into_response()
}

async fn graphql(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(rejection) = guard(&headers, "graphql") {
        return rejection;
    }

    let mut data = serde_json::Map::new();
    let mut errors = Vec::new();
    let variables = body["variables"].as_object().cloned().unwrap_or_default();

    if variables.values().any(|login| login.as_str() == Some(QUOTA_EXHAUSTED_LOGIN)) {
        return (
            [("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1700000000")],
            Json(json!({
                "data": null,
                "errors": [{"type": "RATE_LIMITED", "message": "API rate limit exceeded"}]
            })),
        )
            .into_response();
    }

    for (key, login) in variables {
        let alias = key.replacen('l', "u", 1);
        let login = login.as_str().unwrap_or_default().to_string();
        if login.ends_with("[bot]") {
            errors.push(json!({"type": "NOT_FOUND", "message": format!("Could not resolve to a User with the login of '{login}'.")}));
            data.insert(alias, Value::Null);
        } else {
            let (name, followers) = profile(&login);
            data.insert(
                alias,
                json!({"login": login, "name": name, "followers": {"totalCount": followers}}),
            );
        }
    }

    Json(json!({"data": data, "errors": errors})).into_response()
}
