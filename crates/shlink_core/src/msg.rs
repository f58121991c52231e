use crate::{
    CreatedVisit, OrphanVisitType, ShortUrlsListParams, VisitCategory, VisitsMsg, VisitsQuery,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for the visits of `category` matching `query`.
    LoadVisitsRequested {
        category: VisitCategory,
        query: VisitsQuery,
        orphan_type: Option<OrphanVisitType>,
    },
    /// User asked to stop the running load.
    CancelLoadRequested(VisitCategory),
    /// Loader event for one listing.
    Visits {
        category: VisitCategory,
        msg: VisitsMsg,
    },
    /// Visits recorded after the listings were loaded.
    VisitsCreated(Vec<CreatedVisit>),
    /// A short URL list was loaded with these params.
    ListShortUrls(ShortUrlsListParams),
    ResetShortUrlParams,
}
