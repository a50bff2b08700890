//! One file per family of engine operations. Each operation is a request wrapper
//! implementing [`crate::operation::Operation`] over any unit-of-work session.

pub mod accountability;
pub mod attach;
pub mod queries;
pub mod registry;
pub mod transfer;
pub mod workflow;

/// Drops repeated entries, keeping first occurrences in order
pub(crate) fn distinct<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(*item);
        }
    }
    unique
}
