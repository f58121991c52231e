use crate::{OrphanVisitType, VisitCategory, VisitsQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a paginated load, replacing any load of the same category.
    LoadVisits {
        category: VisitCategory,
        query: VisitsQuery,
        orphan_type: Option<OrphanVisitType>,
        /// Tags every event of this load; see `AppState::load_generation`.
        generation: u64,
    },
    /// Stop the running load of `category` before its next page.
    CancelLoad { category: VisitCategory },
}
