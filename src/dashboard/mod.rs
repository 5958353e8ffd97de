//! Read-only views over a written section: who may look, which sessions
//! they look at, and what the selection adds up to.

pub mod auth;
pub mod clash;
pub mod filter;
pub mod render;
pub mod summary;

use serde::Serialize;
use tracing::debug;

use crate::model::{SessionRecord, SessionTable};

pub use auth::Credentials;
pub use clash::{ClashGroup, ClashKey, find_clashes};
pub use filter::SessionFilter;
pub use summary::Summary;

/// What a dashboard user asked to see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub filter: SessionFilter,
    pub clash_key: ClashKey,
}

/// Selected sessions with their aggregates and clash groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport<'a> {
    pub user: String,
    pub filter: SessionFilter,
    pub clash_key: ClashKey,
    pub summary: Summary,
    pub records: Vec<&'a SessionRecord>,
    pub clashes: Vec<ClashGroup<'a>>,
}

/// Applies the query to the table on behalf of an authorised `user`.
pub fn build_report<'a>(
    table: &'a SessionTable,
    user: String,
    query: &DashboardQuery,
) -> DashboardReport<'a> {
    let records = query.filter.apply(table);
    let summary = Summary::of(records.iter().copied());
    let clashes = find_clashes(records.iter().copied(), query.clash_key);
    debug!(
        selected = records.len(),
        total = table.len(),
        clashes = clashes.len(),
        "dashboard report built"
    );

    DashboardReport {
        user,
        filter: query.filter.clone(),
        clash_key: query.clash_key,
        summary,
        records,
        clashes,
    }
}
