//! Detection of bans that appeared since the last poll

use crate::ban::{BanId, BanRecord};

/// Position of the cursor in a newest-first list, if it is still visible
#[must_use]
pub fn find_cursor(records: &[BanRecord], cursor: &BanId) -> Option<usize> {
    records.iter().position(|record| record.subject_id == *cursor)
}

/// Records newer than `cursor`, oldest first
///
/// `records` must be newest first. When the cursor has dropped out of the
/// fetched window every record is considered new; anything older than the
/// window is never seen.
#[must_use]
pub fn select_new(records: &[BanRecord], cursor: &BanId) -> Vec<BanRecord> {
    new_before(records, find_cursor(records, cursor))
}

/// Records ahead of an already located cursor, oldest first
///
/// `None` selects the whole list.
#[must_use]
pub fn new_before(records: &[BanRecord], cursor_index: Option<usize>) -> Vec<BanRecord> {
    let end = cursor_index.map_or(records.len(), |index| index.min(records.len()));
    records[..end].iter().rev().cloned().collect()
}
