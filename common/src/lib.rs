//! Parts Locator Common Library
//!
//! ネイティブ(テスト)とWeb(WASM)で共有される型とユーティリティ

pub mod debounce;
pub mod display;
pub mod error;
pub mod grouping;
pub mod parser;
pub mod subscriptions;
pub mod types;

pub use debounce::{DebounceState, RequestSequence};
pub use error::{Error, Result};
pub use grouping::{
    group_by_part_number, group_by_supplier, sort_records, GroupMode, SortDirection, SortKey,
    SortState,
};
pub use parser::{parse_search_response, parse_suggestions, SearchResults};
pub use subscriptions::SubscriptionSet;
pub use types::{
    is_valid_email, MatchType, PriceBreak, Region, ResultRecord, SearchField, SearchQuery,
    StockCategory, Suggestion,
};
