use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::DateRange;

/// Which visits listing a piece of state or a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitCategory {
    /// Visits that resolved to a registered short URL.
    NonOrphan,
    /// Visits that did not resolve to any short URL.
    Orphan,
}

impl fmt::Display for VisitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitCategory::NonOrphan => write!(f, "non-orphan"),
            VisitCategory::Orphan => write!(f, "orphan"),
        }
    }
}

/// Classification the server attaches to an orphan visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanVisitType {
    BaseUrl,
    InvalidShortUrl,
    Regular404,
}

impl OrphanVisitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanVisitType::BaseUrl => "base_url",
            OrphanVisitType::InvalidShortUrl => "invalid_short_url",
            OrphanVisitType::Regular404 => "regular_404",
        }
    }
}

impl fmt::Display for OrphanVisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrphanVisitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base_url" => Ok(OrphanVisitType::BaseUrl),
            "invalid_short_url" => Ok(OrphanVisitType::InvalidShortUrl),
            "regular_404" => Ok(OrphanVisitType::Regular404),
            other => Err(format!("unknown orphan visit type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitLocation {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A single recorded visit as returned by the visits endpoints.
///
/// Orphan visits carry `visited_url` and `visit_type`; regular ones leave
/// both empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub referer: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub potential_bot: bool,
    #[serde(default)]
    pub visit_location: Option<VisitLocation>,
    #[serde(default)]
    pub visited_url: Option<String>,
    #[serde(default, rename = "type")]
    pub visit_type: Option<OrphanVisitType>,
}

impl Visit {
    pub fn is_orphan(&self) -> bool {
        self.visit_type.is_some()
    }

    /// True when the visit is an orphan one and matches `filter`, or any
    /// orphan classification when no filter is given.
    pub fn matches_orphan_type(&self, filter: Option<OrphanVisitType>) -> bool {
        match (self.visit_type, filter) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(wanted)) => actual == wanted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlRef {
    pub short_code: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// A visit pushed in from the real-time channel after it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVisit {
    #[serde(default)]
    pub short_url: Option<ShortUrlRef>,
    pub visit: Visit,
}

impl CreatedVisit {
    pub fn is_orphan(&self) -> bool {
        self.short_url.is_none()
    }
}

/// Filters applied to a visits load; kept in state after it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub exclude_bots: bool,
}

impl VisitsQuery {
    pub fn from_date_range(range: &DateRange) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            exclude_bots: false,
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Error details surfaced to the UI after a failed load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorInfo {
    pub status: Option<u16>,
    pub error_type: Option<String>,
    pub title: String,
    pub detail: String,
}
