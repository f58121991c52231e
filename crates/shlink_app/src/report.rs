use std::collections::BTreeMap;
use std::fmt::Write;

use shlink_core::{DateRangeOrInterval, DateRangeSelection, VisitCategory, VisitsInfo};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisitsSummary {
    pub total: usize,
    pub bots: usize,
    /// Orphan classification name to count; regular visits under `regular`.
    pub by_type: BTreeMap<&'static str, usize>,
    pub top_countries: Vec<(String, usize)>,
}

pub fn summarize(info: &VisitsInfo) -> VisitsSummary {
    let mut by_type = BTreeMap::new();
    let mut countries: BTreeMap<String, usize> = BTreeMap::new();
    for visit in &info.visits {
        let kind = visit.visit_type.map_or("regular", |t| t.as_str());
        *by_type.entry(kind).or_insert(0) += 1;
        let country = visit
            .visit_location
            .as_ref()
            .and_then(|location| location.country_name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        *countries.entry(country).or_insert(0) += 1;
    }

    let mut top_countries: Vec<(String, usize)> = countries.into_iter().collect();
    top_countries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_countries.truncate(5);

    VisitsSummary {
        total: info.visits.len(),
        bots: info.visits.iter().filter(|visit| visit.potential_bot).count(),
        by_type,
        top_countries,
    }
}

/// One-line status for a listing that is still loading.
pub fn progress_line(category: VisitCategory, info: &VisitsInfo) -> String {
    let mut line = format!("Loading {category} visits... {}%", info.progress);
    if info.loading_large {
        line.push_str(" (large dataset, this may take a while)");
    }
    if info.cancel_load {
        line.push_str(" (cancelling)");
    }
    line
}

pub fn render(
    category: VisitCategory,
    range: Option<DateRangeOrInterval>,
    info: &VisitsInfo,
) -> String {
    let label = DateRangeSelection::new(range).label("All time");
    let mut out = String::new();

    if let Some(error) = info.error_data.as_ref().filter(|_| info.error) {
        let _ = writeln!(out, "Failed to load {category} visits ({label})");
        let _ = writeln!(out, "  {}: {}", error.title, error.detail);
        return out;
    }

    let summary = summarize(info);
    let _ = writeln!(out, "{category} visits ({label}): {}", summary.total);
    let _ = writeln!(out, "  potential bots: {}", summary.bots);
    for (kind, count) in &summary.by_type {
        let _ = writeln!(out, "  {kind}: {count}");
    }
    if !summary.top_countries.is_empty() {
        let _ = writeln!(out, "  top countries:");
        for (country, count) in &summary.top_countries {
            let _ = writeln!(out, "    {country}: {count}");
        }
    }
    out
}
