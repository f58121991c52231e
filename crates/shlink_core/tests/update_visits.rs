use std::sync::Once;

use chrono::{TimeZone, Utc};
use shlink_core::{
    update, AppState, CreatedVisit, Effect, ErrorInfo, Msg, OrphanVisitType, ShortUrlRef, Visit,
    VisitCategory, VisitsMsg, VisitsQuery,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shlink_logging::initialize_for_tests);
}

fn visit(orphan: bool) -> Visit {
    Visit {
        date: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        referer: String::new(),
        user_agent: String::new(),
        potential_bot: false,
        visit_location: None,
        visited_url: orphan.then(|| "https://s.test".to_string()),
        visit_type: orphan.then_some(OrphanVisitType::BaseUrl),
    }
}

fn loader_event(state: AppState, category: VisitCategory, msg: VisitsMsg) -> AppState {
    update(state, Msg::Visits { category, msg }).0
}

#[test]
fn load_request_emits_effect_without_touching_state() {
    init_logging();
    let state = AppState::new();
    let query = VisitsQuery {
        exclude_bots: true,
        ..VisitsQuery::default()
    };

    let (mut next, effects) = update(
        state.clone(),
        Msg::LoadVisitsRequested {
            category: VisitCategory::Orphan,
            query: query.clone(),
            orphan_type: Some(OrphanVisitType::Regular404),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::LoadVisits {
            category: VisitCategory::Orphan,
            query,
            orphan_type: Some(OrphanVisitType::Regular404),
            generation: 1,
        }]
    );
    assert!(!next.consume_dirty());
    assert_eq!(next.load_generation(VisitCategory::Orphan), 1);
    assert_eq!(next.visits(VisitCategory::Orphan), state.visits(VisitCategory::Orphan));
}

#[test]
fn orphan_type_is_dropped_for_non_orphan_loads() {
    let (_, effects) = update(
        AppState::new(),
        Msg::LoadVisitsRequested {
            category: VisitCategory::NonOrphan,
            query: VisitsQuery::default(),
            orphan_type: Some(OrphanVisitType::BaseUrl),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::LoadVisits {
            category: VisitCategory::NonOrphan,
            query: VisitsQuery::default(),
            orphan_type: None,
            generation: 1,
        }]
    );
}

#[test]
fn cancel_only_applies_while_loading() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::CancelLoadRequested(VisitCategory::Orphan),
    );
    assert!(effects.is_empty());
    assert!(!state.is_cancel_requested(VisitCategory::Orphan));

    let state = loader_event(state, VisitCategory::Orphan, VisitsMsg::Start);
    let (state, effects) = update(state, Msg::CancelLoadRequested(VisitCategory::Orphan));

    assert_eq!(
        effects,
        vec![Effect::CancelLoad {
            category: VisitCategory::Orphan
        }]
    );
    assert!(state.is_cancel_requested(VisitCategory::Orphan));
    assert!(!state.is_cancel_requested(VisitCategory::NonOrphan));
}

#[test]
fn loader_events_only_touch_their_category() {
    let state = loader_event(AppState::new(), VisitCategory::NonOrphan, VisitsMsg::Start);
    let mut state = loader_event(
        state,
        VisitCategory::NonOrphan,
        VisitsMsg::Error(ErrorInfo {
            status: Some(503),
            ..ErrorInfo::default()
        }),
    );

    assert!(state.consume_dirty());
    assert!(state.visits(VisitCategory::NonOrphan).error);
    assert!(!state.visits(VisitCategory::Orphan).error);
}

#[test]
fn created_visits_are_routed_by_orphan_status() {
    init_logging();
    let created = vec![
        CreatedVisit {
            short_url: None,
            visit: visit(true),
        },
        CreatedVisit {
            short_url: Some(ShortUrlRef {
                short_code: "abc123".to_string(),
                domain: None,
            }),
            visit: visit(false),
        },
        CreatedVisit {
            short_url: Some(ShortUrlRef {
                short_code: "def456".to_string(),
                domain: Some("s.test".to_string()),
            }),
            visit: visit(false),
        },
    ];

    let (mut state, effects) = update(AppState::new(), Msg::VisitsCreated(created));

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.visits(VisitCategory::Orphan).visits, vec![visit(true)]);
    assert_eq!(
        state.visits(VisitCategory::NonOrphan).visits,
        vec![visit(false), visit(false)]
    );
}

#[test]
fn created_visits_deserialize_from_the_real_time_payload() {
    let payload = r#"[
        {"visit": {"referer": "", "date": "2024-03-15T11:00:00+01:00", "userAgent": "curl",
                   "potentialBot": true, "visitLocation": null,
                   "visitedUrl": "https://s.test/nope", "type": "invalid_short_url"}},
        {"shortUrl": {"shortCode": "abc123", "domain": null},
         "visit": {"referer": "https://example.com", "date": "2024-03-15T10:00:00+00:00",
                   "userAgent": "Mozilla", "potentialBot": false,
                   "visitLocation": {"countryCode": "ES", "cityName": "Madrid"}}}
    ]"#;

    let created: Vec<CreatedVisit> = serde_json::from_str(payload).unwrap();

    assert!(created[0].is_orphan());
    assert_eq!(created[0].visit.date, visit(true).date);
    assert_eq!(created[0].visit.visit_type, Some(OrphanVisitType::InvalidShortUrl));
    assert!(!created[1].is_orphan());
    assert_eq!(
        created[1]
            .visit
            .visit_location
            .as_ref()
            .and_then(|location| location.city_name.as_deref()),
        Some("Madrid")
    );
}

#[test]
fn every_load_request_gets_a_newer_generation() {
    let request = |category| Msg::LoadVisitsRequested {
        category,
        query: VisitsQuery::default(),
        orphan_type: None,
    };
    let (state, _) = update(AppState::new(), request(VisitCategory::Orphan));
    let (state, effects) = update(state, request(VisitCategory::Orphan));
    let (state, _) = update(state, request(VisitCategory::NonOrphan));

    assert!(matches!(
        effects.as_slice(),
        [Effect::LoadVisits { generation: 2, .. }]
    ));
    assert_eq!(state.load_generation(VisitCategory::Orphan), 2);
    assert_eq!(state.load_generation(VisitCategory::NonOrphan), 1);
}
