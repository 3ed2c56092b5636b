//! Matcher and stopper capabilities
//!
//! A scan is driven by two independent single-method capabilities. Closures
//! implement both through blanket impls; the stock strategies below cover the
//! common filter and pagination cases.

use super::types::FindContext;
use shapedb_core::Record;

/// Decides whether a visited record belongs in the results
pub trait Matcher<E> {
    /// Called once per visited record
    fn matches(&mut self, record: &Record, ctx: &mut FindContext<E>) -> bool;
}

/// Decides whether to end the scan
pub trait Stopper<E> {
    /// Called once per visited record, after the matcher
    fn should_stop(&mut self, ctx: &FindContext<E>) -> bool;
}

impl<E, F> Matcher<E> for F
where
    F: FnMut(&Record, &mut FindContext<E>) -> bool,
{
    fn matches(&mut self, record: &Record, ctx: &mut FindContext<E>) -> bool {
        self(record, ctx)
    }
}

impl<E, F> Stopper<E> for F
where
    F: FnMut(&FindContext<E>) -> bool,
{
    fn should_stop(&mut self, ctx: &FindContext<E>) -> bool {
        self(ctx)
    }
}

/// Accepts every record
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<E> Matcher<E> for MatchAll {
    fn matches(&mut self, _record: &Record, _ctx: &mut FindContext<E>) -> bool {
        true
    }
}

/// Never ends a scan early
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverStop;

impl<E> Stopper<E> for NeverStop {
    fn should_stop(&mut self, _ctx: &FindContext<E>) -> bool {
        false
    }
}

/// Stops once at least `n` results have accumulated
#[derive(Debug, Clone, Copy)]
pub struct StopAfter(pub usize);

impl<E> Stopper<E> for StopAfter {
    fn should_stop(&mut self, ctx: &FindContext<E>) -> bool {
        ctx.results().len() >= self.0
    }
}
