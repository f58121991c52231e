use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use shlink_core::{
    reduce_list_params, update, AppState, ListParamsMsg, Msg, OrderDir, OrderableField,
    ShortUrlsListParams,
};

fn order_by(field: OrderableField, dir: OrderDir) -> Option<BTreeMap<OrderableField, OrderDir>> {
    Some(BTreeMap::from([(field, dir)]))
}

#[test]
fn list_loaded_merges_params_shallowly() {
    let state = ShortUrlsListParams {
        page: Some("1".to_string()),
        items_per_page: Some(10),
        order_by: order_by(OrderableField::Title, OrderDir::Asc),
    };

    let next = reduce_list_params(
        state,
        ListParamsMsg::ListLoaded(ShortUrlsListParams {
            page: Some("2".to_string()),
            ..ShortUrlsListParams::default()
        }),
    );

    assert_eq!(
        next,
        ShortUrlsListParams {
            page: Some("2".to_string()),
            items_per_page: Some(10),
            order_by: order_by(OrderableField::Title, OrderDir::Asc),
        }
    );
}

#[test]
fn incoming_order_replaces_the_whole_ordering() {
    let next = reduce_list_params(
        ShortUrlsListParams::initial(),
        ListParamsMsg::ListLoaded(ShortUrlsListParams {
            order_by: order_by(OrderableField::Visits, OrderDir::Asc),
            ..ShortUrlsListParams::default()
        }),
    );

    assert_eq!(next.order_by, order_by(OrderableField::Visits, OrderDir::Asc));
    assert_eq!(next.page.as_deref(), Some("1"));
}

#[test]
fn reset_always_yields_the_default() {
    let expected = ShortUrlsListParams {
        page: Some("1".to_string()),
        items_per_page: None,
        order_by: order_by(OrderableField::DateCreated, OrderDir::Desc),
    };
    let states = [
        ShortUrlsListParams::default(),
        ShortUrlsListParams::initial(),
        ShortUrlsListParams {
            page: Some("7".to_string()),
            items_per_page: Some(50),
            order_by: order_by(OrderableField::LongUrl, OrderDir::Asc),
        },
    ];

    for state in states {
        assert_eq!(reduce_list_params(state, ListParamsMsg::Reset), expected);
    }
}

#[test]
fn app_state_routes_list_messages() {
    let (mut state, effects) = update(
        AppState::new(),
        Msg::ListShortUrls(ShortUrlsListParams {
            items_per_page: Some(20),
            ..ShortUrlsListParams::default()
        }),
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.short_urls_list_params().items_per_page, Some(20));

    let (mut state, _) = update(state, Msg::ResetShortUrlParams);
    assert!(state.consume_dirty());
    assert_eq!(*state.short_urls_list_params(), ShortUrlsListParams::initial());

    let (mut state, _) = update(state, Msg::ResetShortUrlParams);
    assert!(!state.consume_dirty());
}

#[test]
fn params_serialize_with_api_names() {
    let json = serde_json::to_string(&ShortUrlsListParams::initial()).unwrap();
    assert_eq!(json, r#"{"page":"1","orderBy":{"dateCreated":"DESC"}}"#);
}
