//! Paginated, cancellable visits loading.
//!
//! Pages are requested one at a time in increasing order. Cancellation is
//! polled before every page after the first, so a request already in flight
//! always completes.

use shlink_core::{OrphanVisitType, Visit, VisitCategory, VisitsQuery};
use shlink_logging::{shlink_debug, shlink_info, shlink_warn};
use tokio_util::sync::CancellationToken;

use crate::{LoadOutcome, LoaderEvent, VisitsApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderSettings {
    pub items_per_page: u32,
    /// Accumulated visit count above which `LoaderEvent::Large` is emitted.
    pub large_threshold: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            items_per_page: 5_000,
            large_threshold: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub category: VisitCategory,
    pub query: VisitsQuery,
    /// Only used for orphan loads.
    pub orphan_type: Option<OrphanVisitType>,
}

impl LoadRequest {
    fn keeps(&self, visit: &Visit) -> bool {
        match self.category {
            VisitCategory::NonOrphan => true,
            VisitCategory::Orphan => visit.matches_orphan_type(self.orphan_type),
        }
    }
}

pub trait LoaderSink: Send + Sync {
    fn emit(&self, event: LoaderEvent);
}

/// Polled between pages.
pub trait CancelSignal: Send + Sync {
    fn cancel_requested(&self) -> bool;
}

impl CancelSignal for CancellationToken {
    fn cancel_requested(&self) -> bool {
        self.is_cancelled()
    }
}

/// Loads every page of `request`, reporting through `sink`.
pub async fn load_visits(
    api: &dyn VisitsApi,
    settings: &LoaderSettings,
    request: &LoadRequest,
    sink: &dyn LoaderSink,
    cancel: &dyn CancelSignal,
) -> LoadOutcome {
    let items_per_page = settings.items_per_page.max(1);
    sink.emit(LoaderEvent::Start);

    let mut visits = Vec::new();
    let mut large_emitted = false;
    let mut page = 1;
    loop {
        if page > 1 && cancel.cancel_requested() {
            shlink_info!(
                "{} visits load cancelled after {} pages",
                request.category,
                page - 1
            );
            return LoadOutcome::Cancelled {
                pages_loaded: page - 1,
            };
        }

        shlink_debug!("Fetching {} visits page {}", request.category, page);
        let result = match api
            .fetch_visits(request.category, &request.query, page, items_per_page)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                shlink_warn!(
                    "{} visits page {} failed: {}",
                    request.category,
                    page,
                    err
                );
                sink.emit(LoaderEvent::Error(err.to_error_info()));
                return LoadOutcome::Failed(err);
            }
        };

        let pages_count = result.pagination.pages_count.max(1);
        visits.extend(result.data.into_iter().filter(|visit| request.keeps(visit)));

        if !large_emitted && visits.len() > settings.large_threshold {
            large_emitted = true;
            shlink_info!(
                "{} visits load crossed {} visits",
                request.category,
                settings.large_threshold
            );
            sink.emit(LoaderEvent::Large);
        }
        if pages_count > 1 {
            sink.emit(LoaderEvent::Progress(progress(page, pages_count)));
        }
        if page >= pages_count {
            break;
        }
        page += 1;
    }

    let count = visits.len();
    sink.emit(LoaderEvent::Finish {
        visits,
        query: request.query.clone(),
    });
    LoadOutcome::Finished { visits: count }
}

fn progress(page: u32, pages_count: u32) -> u8 {
    let percent = u64::from(page) * 100 / u64::from(pages_count);
    percent.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::progress;

    #[test]
    fn progress_is_a_floored_percentage() {
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 66);
        assert_eq!(progress(3, 3), 100);
        assert_eq!(progress(5, 4), 100);
    }
}
