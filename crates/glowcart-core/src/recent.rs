//! Recently-viewed product handles.
//!
//! The storefront keeps a short most-recent-first list of product handles in
//! device-local storage. The storage itself is an external collaborator (the
//! [`RecentStore`] trait); this module owns only the list discipline:
//! de-duplicated by handle, capped at [`RECENTLY_VIEWED_CAP`] entries.

/// Maximum number of handles retained.
pub const RECENTLY_VIEWED_CAP: usize = 10;

/// External key-value store holding the recently-viewed list.
pub trait RecentStore {
    fn read(&self) -> Vec<String>;
    fn write(&mut self, handles: &[String]);
}

/// Returns a new recently-viewed list with `handle` promoted to the front.
///
/// The viewed handle always lands first; any previous occurrence is removed
/// and the result is truncated to [`RECENTLY_VIEWED_CAP`] entries.
#[must_use]
pub fn record_recently_viewed(existing: &[String], handle: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(RECENTLY_VIEWED_CAP);
    out.push(handle.to_owned());
    for previous in existing {
        if out.len() == RECENTLY_VIEWED_CAP {
            break;
        }
        if previous != handle {
            out.push(previous.clone());
        }
    }
    out
}
