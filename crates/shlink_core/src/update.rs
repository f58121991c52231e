use crate::{
    reduce_list_params, AppState, CreatedVisit, Effect, ListParamsMsg, Msg, VisitCategory,
    VisitsMsg,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadVisitsRequested {
            category,
            query,
            orphan_type,
        } => {
            let orphan_type = match category {
                VisitCategory::Orphan => orphan_type,
                VisitCategory::NonOrphan => None,
            };
            let generation = state.next_load_generation(category);
            vec![Effect::LoadVisits {
                category,
                query,
                orphan_type,
                generation,
            }]
        }
        Msg::CancelLoadRequested(category) => {
            if !state.visits(category).loading {
                return (state, Vec::new());
            }
            state.apply_visits(category, VisitsMsg::Cancel);
            vec![Effect::CancelLoad { category }]
        }
        Msg::Visits { category, msg } => {
            state.apply_visits(category, msg);
            Vec::new()
        }
        Msg::VisitsCreated(created) => {
            let (orphan, non_orphan): (Vec<CreatedVisit>, Vec<CreatedVisit>) =
                created.into_iter().partition(CreatedVisit::is_orphan);
            if !non_orphan.is_empty() {
                state.apply_visits(
                    VisitCategory::NonOrphan,
                    VisitsMsg::VisitsCreated(non_orphan),
                );
            }
            if !orphan.is_empty() {
                state.apply_visits(VisitCategory::Orphan, VisitsMsg::VisitsCreated(orphan));
            }
            Vec::new()
        }
        Msg::ListShortUrls(params) => {
            let next = reduce_list_params(
                state.short_urls_list_params().clone(),
                ListParamsMsg::ListLoaded(params),
            );
            state.set_list_params(next);
            Vec::new()
        }
        Msg::ResetShortUrlParams => {
            let next = reduce_list_params(
                state.short_urls_list_params().clone(),
                ListParamsMsg::Reset,
            );
            state.set_list_params(next);
            Vec::new()
        }
    };

    (state, effects)
}
