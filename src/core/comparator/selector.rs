//! Canonical representative selection.

use crate::core::scanner::Entry;

/// Pick the member to keep: the strictly largest file.
///
/// A larger file of the same picture is usually the less compressed one.
/// Ties keep the earliest member, so the choice follows natural order.
/// Returns 0 for an empty slice.
pub fn select_representative(members: &[Entry]) -> usize {
    let mut best = 0;
    for (position, member) in members.iter().enumerate().skip(1) {
        if member.size > members[best].size {
            best = position;
        }
    }
    best
}
