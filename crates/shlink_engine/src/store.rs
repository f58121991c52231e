use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shlink_core::{update, AppState, Effect, Msg, VisitCategory, VisitsInfo, VisitsMsg};
use shlink_logging::shlink_debug;

use crate::{CancelSignal, LoaderEvent, LoaderSink};

/// The single authoritative state container.
///
/// Cloning yields another handle to the same state. Messages are applied one
/// at a time in the order they are dispatched.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<Mutex<AppState>>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        let mut guard = self.lock();
        let state = std::mem::take(&mut *guard);
        let (state, effects) = update(state, msg);
        *guard = state;
        effects
    }

    /// Applies a loader event only if `generation` is still the latest load
    /// of `category`. The check and the update happen under one lock.
    pub fn dispatch_if_current(
        &self,
        category: VisitCategory,
        generation: u64,
        msg: VisitsMsg,
    ) -> bool {
        let mut guard = self.lock();
        if guard.load_generation(category) != generation {
            return false;
        }
        let state = std::mem::take(&mut *guard);
        let (state, _) = update(state, Msg::Visits { category, msg });
        *guard = state;
        true
    }

    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    pub fn visits(&self, category: VisitCategory) -> VisitsInfo {
        self.lock().visits(category).clone()
    }

    pub fn is_cancel_requested(&self, category: VisitCategory) -> bool {
        self.lock().is_cancel_requested(category)
    }

    pub fn consume_dirty(&self) -> bool {
        self.lock().consume_dirty()
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Feeds the events of one load into the store, dropping them once a newer
/// load of the same category has been requested.
#[derive(Debug, Clone)]
pub struct StoreSink {
    store: Store,
    category: VisitCategory,
    generation: u64,
}

impl StoreSink {
    pub fn new(store: Store, category: VisitCategory, generation: u64) -> Self {
        Self {
            store,
            category,
            generation,
        }
    }
}

impl LoaderSink for StoreSink {
    fn emit(&self, event: LoaderEvent) {
        let msg = match event {
            LoaderEvent::Start => VisitsMsg::Start,
            LoaderEvent::Progress(progress) => VisitsMsg::ProgressChanged(progress),
            LoaderEvent::Large => VisitsMsg::Large,
            LoaderEvent::Finish { visits, query } => VisitsMsg::Finish { visits, query },
            LoaderEvent::Error(error) => VisitsMsg::Error(error),
        };
        if !self
            .store
            .dispatch_if_current(self.category, self.generation, msg)
        {
            shlink_debug!(
                "Dropped event of superseded {} load #{}",
                self.category,
                self.generation
            );
        }
    }
}

/// Reads the `cancel_load` flag of one category.
#[derive(Debug, Clone)]
pub struct StoreCancelSignal {
    store: Store,
    category: VisitCategory,
}

impl StoreCancelSignal {
    pub fn new(store: Store, category: VisitCategory) -> Self {
        Self { store, category }
    }
}

impl CancelSignal for StoreCancelSignal {
    fn cancel_requested(&self) -> bool {
        self.store.is_cancel_requested(self.category)
    }
}
