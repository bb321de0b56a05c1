//! # Page Break Decisions
//!
//! How many fixed-height lines fit in a space, and what to do about the
//! ones that don't. Code blocks are the only content that splits; every
//! other block either fits where it is or moves whole to the next page.

/// What to do with a run of lines given the capacity of the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// All remaining lines fit here.
    Place,
    /// Not even one line fits here. Start a new page first.
    MoveToNextPage,
    /// Place some lines here, continue on the next page.
    Split {
        /// How many lines go on the current page.
        items_on_current_page: usize,
    },
}

/// Number of lines of `line_height` that fit in `available_height` once
/// `padding` is taken off the top and bottom. Can be zero or negative.
pub fn line_capacity(available_height: f64, line_height: f64, padding: f64) -> i64 {
    ((available_height - 2.0 * padding) / line_height) as i64
}

/// Decide how `line_count` lines are placed given a page `capacity`.
pub fn decide_break(capacity: i64, line_count: usize) -> BreakDecision {
    if capacity <= 0 {
        return BreakDecision::MoveToNextPage;
    }
    let capacity = capacity as usize;
    if line_count <= capacity {
        BreakDecision::Place
    } else {
        BreakDecision::Split {
            items_on_current_page: capacity,
        }
    }
}
