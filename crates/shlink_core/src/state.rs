use crate::{reduce_visits, ShortUrlsListParams, VisitCategory, VisitsInfo, VisitsMsg};

/// Everything the client keeps between messages.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    short_urls_list_params: ShortUrlsListParams,
    non_orphan_visits: VisitsInfo,
    orphan_visits: VisitsInfo,
    /// Number of the latest load issued per category.
    non_orphan_load: u64,
    orphan_load: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            short_urls_list_params: ShortUrlsListParams::initial(),
            non_orphan_visits: VisitsInfo::default(),
            orphan_visits: VisitsInfo::default(),
            non_orphan_load: 0,
            orphan_load: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_urls_list_params(&self) -> &ShortUrlsListParams {
        &self.short_urls_list_params
    }

    pub fn visits(&self, category: VisitCategory) -> &VisitsInfo {
        match category {
            VisitCategory::NonOrphan => &self.non_orphan_visits,
            VisitCategory::Orphan => &self.orphan_visits,
        }
    }

    /// Polled by the loader between pages.
    pub fn is_cancel_requested(&self, category: VisitCategory) -> bool {
        self.visits(category).cancel_load
    }

    /// Generation of the most recent load of `category`; events from older
    /// loads are stale.
    pub fn load_generation(&self, category: VisitCategory) -> u64 {
        match category {
            VisitCategory::NonOrphan => self.non_orphan_load,
            VisitCategory::Orphan => self.orphan_load,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_list_params(&mut self, params: ShortUrlsListParams) {
        if self.short_urls_list_params != params {
            self.short_urls_list_params = params;
            self.dirty = true;
        }
    }

    pub(crate) fn next_load_generation(&mut self, category: VisitCategory) -> u64 {
        let slot = match category {
            VisitCategory::NonOrphan => &mut self.non_orphan_load,
            VisitCategory::Orphan => &mut self.orphan_load,
        };
        *slot += 1;
        *slot
    }

    pub(crate) fn apply_visits(&mut self, category: VisitCategory, msg: VisitsMsg) {
        let slot = match category {
            VisitCategory::NonOrphan => &mut self.non_orphan_visits,
            VisitCategory::Orphan => &mut self.orphan_visits,
        };
        *slot = reduce_visits(std::mem::take(slot), msg);
        self.dirty = true;
    }
}
