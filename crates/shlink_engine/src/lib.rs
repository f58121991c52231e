//! Shlink engine: REST API client, visits loader and effect execution.
mod api;
mod engine;
mod loader;
mod store;
mod types;

pub use api::{ApiSettings, ReqwestVisitsApi, VisitsApi};
pub use engine::{EngineEvent, EngineHandle};
pub use loader::{load_visits, CancelSignal, LoadRequest, LoaderSettings, LoaderSink};
pub use store::{Store, StoreCancelSignal, StoreSink};
pub use types::{
    ApiError, FailureKind, LoadOutcome, LoaderEvent, Pagination, ProblemDetails, VisitsPage,
};
