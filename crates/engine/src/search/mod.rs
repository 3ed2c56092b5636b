//! Linear-scan search over a collection's ordered sequence
//!
//! This module contains:
//! - `types`: FindOptions and the per-call FindContext
//! - `strategy`: Matcher/Stopper capabilities and stock strategies
//!
//! The scan visits positions strictly monotonically in the configured
//! direction, exactly once each, until the range is exhausted or the stopper
//! signals true. The scan borrows the collection immutably, so the store
//! cannot change underneath it; `FindContext::count` is the length at scan
//! start.

mod strategy;
mod types;

pub use strategy::{MatchAll, Matcher, NeverStop, StopAfter, Stopper};
pub use types::{FindContext, FindOptions};

use shapedb_core::Record;
use shapedb_storage::Collection;

/// First position a scan over `count` records visits, or `None` when there
/// is nothing to visit
pub fn resolve_start<E>(count: usize, options: &FindOptions<E>) -> Option<usize> {
    let last = count.checked_sub(1)?;
    Some(match options.starting_index {
        Some(i) => i.min(last),
        None if options.reverse => last,
        None => 0,
    })
}

/// Run one scan over `collection`
///
/// Matched records are cloned into the results; the collection is never
/// handed out by reference.
pub fn scan<E, M, S>(
    collection: &Collection,
    matcher: &mut M,
    stopper: &mut S,
    options: &FindOptions<E>,
) -> Vec<Record>
where
    E: Clone,
    M: Matcher<E> + ?Sized,
    S: Stopper<E> + ?Sized,
{
    let count = collection.len();
    let Some(start) = resolve_start(count, options) else {
        return Vec::new();
    };
    let last = count - 1;

    let mut ctx = FindContext::new(options, count, start, options.extra.clone());
    let mut index = start;
    loop {
        ctx.index = index;
        if let Some(record) = collection.get_at(index) {
            if matcher.matches(record, &mut ctx) {
                ctx.results.push(record.clone());
            }
            if stopper.should_stop(&ctx) {
                break;
            }
        }

        if options.reverse {
            if index == 0 {
                break;
            }
            index -= 1;
        } else {
            index += 1;
            if index > last {
                break;
            }
        }
    }

    ctx.into_results()
}
