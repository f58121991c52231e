use crate::dates::is_between;
use crate::visit::{CreatedVisit, ErrorInfo, Visit, VisitsQuery};

/// State of one visits listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisitsInfo {
    /// Most recent first.
    pub visits: Vec<Visit>,
    pub loading: bool,
    pub loading_large: bool,
    pub error: bool,
    pub error_data: Option<ErrorInfo>,
    pub cancel_load: bool,
    /// Percentage of pages fetched, `0..=100`.
    pub progress: u8,
    /// Filters of the last finished load.
    pub query: Option<VisitsQuery>,
}

impl VisitsInfo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transitions of a visits listing, emitted by the loader or pushed in from
/// the real-time channel.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitsMsg {
    Start,
    Error(ErrorInfo),
    Finish {
        visits: Vec<Visit>,
        query: VisitsQuery,
    },
    Large,
    Cancel,
    ProgressChanged(u8),
    VisitsCreated(Vec<CreatedVisit>),
}

/// Pure transition function over a single listing.
pub fn reduce_visits(state: VisitsInfo, msg: VisitsMsg) -> VisitsInfo {
    match msg {
        VisitsMsg::Start => VisitsInfo {
            loading: true,
            ..VisitsInfo::default()
        },
        VisitsMsg::Error(error_data) => VisitsInfo {
            error: true,
            error_data: Some(error_data),
            ..VisitsInfo::default()
        },
        VisitsMsg::Finish { visits, query } => VisitsInfo {
            visits,
            query: Some(query),
            ..VisitsInfo::default()
        },
        VisitsMsg::Large => VisitsInfo {
            loading_large: true,
            ..state
        },
        VisitsMsg::Cancel => VisitsInfo {
            cancel_load: true,
            ..state
        },
        VisitsMsg::ProgressChanged(progress) => VisitsInfo {
            progress: progress.min(100),
            ..state
        },
        VisitsMsg::VisitsCreated(created) => prepend_created(state, created),
    }
}

fn prepend_created(mut state: VisitsInfo, created: Vec<CreatedVisit>) -> VisitsInfo {
    let (start, end) = state
        .query
        .as_ref()
        .map_or((None, None), |query| (query.start_date, query.end_date));
    let mut visits: Vec<Visit> = created
        .into_iter()
        .map(|created| created.visit)
        .filter(|visit| is_between(visit.date, start, end))
        .collect();
    if visits.is_empty() {
        return state;
    }

    visits.append(&mut state.visits);
    state.visits = visits;
    state
}
