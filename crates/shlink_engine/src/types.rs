use std::fmt;

use serde::Deserialize;
use shlink_core::{ErrorInfo, Visit, VisitsQuery};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub pages_count: u32,
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub items_in_current_page: u32,
    #[serde(default)]
    pub total_items: u32,
}

/// One page of a visits listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisitsPage {
    pub data: Vec<Visit>,
    pub pagination: Pagination,
}

/// Events emitted by the loader, in order: `Start`, any number of
/// `Progress`/`Large`, then one of `Finish` or `Error` unless cancelled.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderEvent {
    Start,
    Progress(u8),
    Large,
    Finish {
        visits: Vec<Visit>,
        query: VisitsQuery,
    },
    Error(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Finished { visits: usize },
    Failed(ApiError),
    Cancelled { pages_loaded: u32 },
}

/// RFC 7807 body returned by the server on failures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProblemDetails {
    #[serde(default, rename = "type")]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    pub problem: Option<ProblemDetails>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            problem: None,
        }
    }

    pub(crate) fn with_problem(mut self, problem: Option<ProblemDetails>) -> Self {
        self.problem = problem;
        self
    }

    /// Details surfaced in state; server-provided fields win.
    pub fn to_error_info(&self) -> ErrorInfo {
        let problem = self.problem.clone().unwrap_or_default();
        let status = match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        };
        ErrorInfo {
            status: problem.status.or(status),
            error_type: problem.problem_type,
            title: problem.title.unwrap_or_else(|| self.kind.to_string()),
            detail: problem.detail.unwrap_or_else(|| self.message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
