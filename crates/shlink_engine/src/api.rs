use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use shlink_core::{VisitCategory, VisitsQuery};
use shlink_logging::shlink_trace;

use crate::{ApiError, FailureKind, ProblemDetails, VisitsPage};

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Server root, e.g. `https://s.test`.
    pub base_url: String,
    pub api_key: String,
    pub api_version: u8,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_version: 3,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Paged visits listing endpoint.
#[async_trait::async_trait]
pub trait VisitsApi: Send + Sync {
    async fn fetch_visits(
        &self,
        category: VisitCategory,
        query: &VisitsQuery,
        page: u32,
        items_per_page: u32,
    ) -> Result<VisitsPage, ApiError>;
}

#[derive(Deserialize)]
struct VisitsResponse {
    visits: VisitsPage,
}

#[derive(Debug, Clone)]
pub struct ReqwestVisitsApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestVisitsApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn visits_url(
        &self,
        category: VisitCategory,
        query: &VisitsQuery,
        page: u32,
        items_per_page: u32,
    ) -> Result<reqwest::Url, ApiError> {
        let endpoint = match category {
            VisitCategory::NonOrphan => "visits/non-orphan",
            VisitCategory::Orphan => "visits/orphan",
        };
        let raw = format!(
            "{}/rest/v{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.api_version,
            endpoint
        );
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("itemsPerPage", &items_per_page.to_string());
            if let Some(start) = query.start_date {
                pairs.append_pair("startDate", &format_date(start));
            }
            if let Some(end) = query.end_date {
                pairs.append_pair("endDate", &format_date(end));
            }
            if query.exclude_bots {
                pairs.append_pair("excludeBots", "true");
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl VisitsApi for ReqwestVisitsApi {
    async fn fetch_visits(
        &self,
        category: VisitCategory,
        query: &VisitsQuery,
        page: u32,
        items_per_page: u32,
    ) -> Result<VisitsPage, ApiError> {
        let url = self.visits_url(category, query, page, items_per_page)?;
        shlink_trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let problem = serde_json::from_str::<ProblemDetails>(&body).ok();
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_problem(problem));
        }

        let parsed: VisitsResponse = serde_json::from_str(&body)
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))?;
        Ok(parsed.visits)
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
