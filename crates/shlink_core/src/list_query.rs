use chrono::{DateTime, SecondsFormat, Utc};
use url::form_urlencoded;

use crate::dates::DateRange;

/// Filters of the short URL listing as carried in the route's query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortUrlsQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ShortUrlsQuery {
    /// Parses a query string with or without the leading `?`.
    ///
    /// Unknown keys are ignored, as are dates that are not RFC 3339.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" if !value.is_empty() => parsed.search = Some(value.into_owned()),
                "tags" => {
                    parsed.tags = value
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(ToOwned::to_owned)
                        .collect();
                }
                "startDate" => parsed.start_date = parse_date(&value),
                "endDate" => parsed.end_date = parse_date(&value),
                _ => {}
            }
        }
        parsed
    }

    /// Renders the non-empty filters; empty string when there are none.
    ///
    /// Spaces are written as `%20`, matching the routes the web client builds.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            serializer.append_pair("search", search);
        }
        if !self.tags.is_empty() {
            serializer.append_pair("tags", &self.tags.join(","));
        }
        if let Some(start) = self.start_date {
            serializer.append_pair("startDate", &format_date(start));
        }
        if let Some(end) = self.end_date {
            serializer.append_pair("endDate", &format_date(end));
        }
        // A literal `+` is already escaped as `%2B`, so every `+` left is a space.
        serializer.finish().replace('+', "%20")
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn with_search(self, search: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            ..self
        }
    }

    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.retain(|existing| existing != tag);
        self
    }

    pub fn with_date_range(self, range: DateRange) -> Self {
        Self {
            start_date: range.start_date,
            end_date: range.end_date,
            ..self
        }
    }
}

/// Route of the first listing page for `server_id` with `query` applied.
///
/// Any filter change sends the listing back to page one.
pub fn first_page_route(server_id: &str, query: &ShortUrlsQuery) -> String {
    let base = format!("/server/{server_id}/list-short-urls/1");
    let query = query.to_query_string();
    if query.is_empty() {
        base
    } else {
        format!("{base}?{query}")
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}
