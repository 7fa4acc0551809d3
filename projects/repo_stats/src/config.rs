use std::{net::SocketAddr, time::Duration};

use interfaces_github_stats::{index::DEFAULT_API_URL, models::RepoId};
use thiserror::Error;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_REPOS: &str = "kubernetes/kubernetes,apache/spark";
const DEFAULT_REFRESH_WINDOW_DAYS: u64 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MissingVar: {name} must be set")]
    MissingVar { name: &'static str },

    #[error("InvalidVar: {name}={value}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        name: String,
        user: String,
        password: String,
        host: String,
        port: u16,
    },
}

impl DatabaseConfig {
    /// libpq connection string.
    pub fn connection_string(&self) -> String {
        match self {
            DatabaseConfig::Url(url) => url.clone(),
            DatabaseConfig::Parts {
                name,
                user,
                password,
                host,
                port,
            } => format!(
                "host={} port={port} user={} password={} dbname={}",
                quote_conn_value(host),
                quote_conn_value(user),
                quote_conn_value(password),
                quote_conn_value(name),
            ),
        }
    }
}

fn quote_conn_value(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub repositories: Vec<RepoId>,
    pub window_days: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub debug: bool,
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub refresh: RefreshConfig,
}

impl Config {
    /// Reads the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let optional = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::MissingVar { name });

        let database = match optional("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                name: required("POSTGRES_DB")?,
                user: required("POSTGRES_USER")?,
                password: required("POSTGRES_PASSWORD")?,
                host: required("SQL_HOST")?,
                port: parse_var("SQL_PORT", &required("SQL_PORT")?)?,
            },
        };

        let server_addr = parse_var(
            "SERVER_ADDR",
            &optional("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
        )?;

        let timeout_secs: u64 = match optional("GITHUB_TIMEOUT_SECS") {
            Some(value) => parse_var("GITHUB_TIMEOUT_SECS", &value)?,
            None => DEFAULT_GITHUB_TIMEOUT_SECS,
        };

        let github = GitHubConfig {
            api_url: optional("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: optional("GITHUB_TOKEN"),
            timeout: Duration::from_secs(timeout_secs),
        };

        let repositories = optional("REFRESH_REPOS")
            .unwrap_or_else(|| DEFAULT_REFRESH_REPOS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| parse_var("REFRESH_REPOS", entry))
            .collect::<Result<Vec<RepoId>, _>>()?;

        let window_days = match optional("REFRESH_WINDOW_DAYS") {
            Some(value) => parse_var("REFRESH_WINDOW_DAYS", &value)?,
            None => DEFAULT_REFRESH_WINDOW_DAYS,
        };

        Ok(Config {
            server_addr,
            debug: optional("DEBUG").is_some(),
            database,
            github,
            refresh: RefreshConfig {
                repositories,
                window_days,
            },
        })
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
