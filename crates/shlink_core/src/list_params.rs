use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDir {
    Asc,
    Desc,
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDir::Asc => write!(f, "ASC"),
            OrderDir::Desc => write!(f, "DESC"),
        }
    }
}

/// Short URL list columns the server can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderableField {
    DateCreated,
    ShortCode,
    LongUrl,
    Title,
    Visits,
}

impl OrderableField {
    pub fn label(&self) -> &'static str {
        match self {
            OrderableField::DateCreated => "Created at",
            OrderableField::ShortCode => "Short URL",
            OrderableField::LongUrl => "Long URL",
            OrderableField::Title => "Title",
            OrderableField::Visits => "Visits",
        }
    }
}

pub type OrderBy = BTreeMap<OrderableField, OrderDir>;

/// Paging and ordering of the short URL listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlsListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
}

impl ShortUrlsListParams {
    /// First page, newest short URLs first.
    pub fn initial() -> Self {
        Self {
            page: Some("1".to_string()),
            items_per_page: None,
            order_by: Some(BTreeMap::from([(
                OrderableField::DateCreated,
                OrderDir::Desc,
            )])),
        }
    }

    /// Shallow merge: every field present in `incoming` replaces ours.
    pub fn merged_with(self, incoming: ShortUrlsListParams) -> Self {
        Self {
            page: incoming.page.or(self.page),
            items_per_page: incoming.items_per_page.or(self.items_per_page),
            order_by: incoming.order_by.or(self.order_by),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListParamsMsg {
    /// A short URL list was loaded with these params.
    ListLoaded(ShortUrlsListParams),
    Reset,
}

pub fn reduce_list_params(state: ShortUrlsListParams, msg: ListParamsMsg) -> ShortUrlsListParams {
    match msg {
        ListParamsMsg::ListLoaded(params) => state.merged_with(params),
        ListParamsMsg::Reset => ShortUrlsListParams::initial(),
    }
}
