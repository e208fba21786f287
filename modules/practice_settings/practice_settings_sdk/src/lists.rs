//! Editing helpers for the ordered string lists (`ipWhitelist`, `interests`,
//! demographics).
//!
//! Lists are replaced wholesale by a patch, so each helper returns the new
//! list to put into one. Order is preserved, duplicates are allowed and
//! removal is positional.

/// Appends `item`, even if an equal entry already exists.
#[must_use]
pub fn push(items: &[String], item: impl Into<String>) -> Vec<String> {
    let mut out = items.to_vec();
    out.push(item.into());
    out
}

/// Removes the entry at `index`. Out-of-range indexes leave the list unchanged.
#[must_use]
pub fn remove_at(items: &[String], index: usize) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Replaces the entry at `index`. Out-of-range indexes leave the list unchanged.
#[must_use]
pub fn replace_at(items: &[String], index: usize, item: impl Into<String>) -> Vec<String> {
    let mut out = items.to_vec();
    if let Some(slot) = out.get_mut(index) {
        *slot = item.into();
    }
    out
}
