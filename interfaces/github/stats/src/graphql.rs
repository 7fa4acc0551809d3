use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::index::{header_u64, read_json, FetchGitHubError, GitHubApi};

/// Upper bound of aliased `user` lookups packed into one GraphQL query.
pub const MAX_LOGINS_PER_QUERY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub followers: u64,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<HashMap<String, Option<UserNode>>>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct UserNode {
    login: String,
    name: Option<String>,
    followers: FollowersNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowersNode {
    total_count: u64,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Query with one `u{i}: user(login: $l{i})` alias per login.
pub fn build_user_query(count: usize) -> String {
    let params = (0..count)
        .map(|i| format!("$l{i}: String!"))
        .collect::<Vec<_>>()
        .join(", ");
    let fields = (0..count)
        .map(|i| format!("    u{i}: user(login: $l{i}) {{ login name followers {{ totalCount }} }}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("query getUserProfiles({params}) {{\n{fields}\n}}")
}

impl GitHubApi {
    /// Resolves display name and follower count for many logins at once.
    ///
    /// The result is keyed by the requested login. Logins GraphQL cannot
    /// resolve (bot accounts, deleted users) are absent from the map.
    pub async fn fetch_user_profiles(
        &self,
        token: &str,
        logins: &[String],
    ) -> Result<HashMap<String, UserProfile>, FetchGitHubError> {
        let mut profiles = HashMap::with_capacity(logins.len());

        for chunk in logins.chunks(MAX_LOGINS_PER_QUERY) {
            let variables: serde_json::Map<String, serde_json::Value> = chunk
                .iter()
                .enumerate()
                .map(|(i, login)| (format!("l{i}"), serde_json::Value::String(login.clone())))
                .collect();

            let payload = serde_json::json!({
                "query": build_user_query(chunk.len()),
                "variables": variables,
            });

            let request = self
                .client
                .post(format!("{}/graphql", self.base_url))
                .json(&payload);
            let response = self.send(request, token, "/graphql").await?;
            let reset_at = header_u64(response.headers(), "x-ratelimit-reset");
            let parsed: GraphQLResponse = read_json(response).await?;

            // GraphQL reports an exhausted quota in the body of a 200.
            if parsed
                .errors
                .iter()
                .any(|err| err.kind.as_deref() == Some("RATE_LIMITED"))
            {
                return Err(FetchGitHubError::RateLimited { reset_at });
            }

            let Some(data) = parsed.data else {
                let message = parsed
                    .errors
                    .iter()
                    .map(|err| err.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetchGitHubError::GraphQl { message });
            };

            for err in parsed
                .errors
                .iter()
                .filter(|err| err.kind.as_deref() != Some("NOT_FOUND"))
            {
                warn!(error = %err.message, "partial GraphQL failure while resolving users");
            }

            for (alias, node) in data {
                let Some(node) = node else { continue };
                let Some(login) = alias
                    .strip_prefix('u')
                    .and_then(|index| index.parse::<usize>().ok())
                    .and_then(|index| chunk.get(index))
                else {
                    continue;
                };

                profiles.insert(
                    login.clone(),
                    UserProfile {
                        login: node.login,
                        name: node.name,
                        followers: node.followers.total_count,
                    },
                );
            }
        }

        Ok(profiles)
    }
}
