//! Shlink client core: pure state containers, reducers and date helpers.
mod date_selector;
mod dates;
mod effect;
mod list_params;
mod list_query;
mod msg;
mod state;
mod update;
mod visit;
mod visits_info;

pub use date_selector::DateRangeSelection;
pub use dates::{
    date_range_is_empty, interval_to_date_range, interval_to_date_range_at, is_between,
    range_is_interval, range_or_interval_to_string, DateInterval, DateRange, DateRangeOrInterval,
};
pub use effect::Effect;
pub use list_params::{
    reduce_list_params, ListParamsMsg, OrderBy, OrderDir, OrderableField, ShortUrlsListParams,
};
pub use list_query::{first_page_route, ShortUrlsQuery};
pub use msg::Msg;
pub use state::AppState;
pub use update::update;
pub use visit::{
    CreatedVisit, ErrorInfo, OrphanVisitType, ShortUrlRef, Visit, VisitCategory, VisitLocation,
    VisitsQuery,
};
pub use visits_info::{reduce_visits, VisitsInfo, VisitsMsg};
