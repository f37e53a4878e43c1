//! Counter arithmetic shared by every counter store backend.

/// Value after a like toggle. A previously liked item is decremented, never
/// below zero; otherwise the count goes up by one.
pub fn toggled(current: u64, was_liked: bool) -> u64 {
    if was_liked {
        current.saturating_sub(1)
    } else {
        current.saturating_add(1)
    }
}

pub fn incremented(current: u64) -> u64 {
    current.saturating_add(1)
}
