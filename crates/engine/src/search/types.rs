//! Options and per-call state for `find`

use shapedb_core::Record;

/// Options for a `find` scan
///
/// `extra` seeds the context's caller-owned state. It is cloned at the start
/// of every scan, so the same options can be reused and each call starts from
/// the same seed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions<E = ()> {
    /// Scan from high index to low
    pub reverse: bool,
    /// First position visited; clamped into the collection's bounds.
    /// Defaults to the first position (forward) or the last (reverse).
    pub starting_index: Option<usize>,
    /// Seed for [`FindContext::extra`]
    pub extra: E,
}

impl FindOptions<()> {
    /// Forward scan from the first record, no extra state
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> FindOptions<E> {
    /// Set the scan direction (builder pattern)
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Set the starting position (builder pattern)
    pub fn starting_at(mut self, index: usize) -> Self {
        self.starting_index = Some(index);
        self
    }

    /// Replace the extra seed, possibly changing its type
    pub fn with_extra<F>(self, extra: F) -> FindOptions<F> {
        FindOptions {
            reverse: self.reverse,
            starting_index: self.starting_index,
            extra,
        }
    }
}

/// State threaded through one `find` call
///
/// Created fresh per call and dropped when it returns. Callbacks can read
/// everything and mutate only `extra`; `results` grows only by the engine's
/// own appends. The active options are visible through
/// [`is_reverse`](Self::is_reverse), [`requested_start`](Self::requested_start)
/// and the per-call copy of `extra`.
#[derive(Debug, Clone)]
pub struct FindContext<E = ()> {
    pub(crate) results: Vec<Record>,
    pub(crate) index: usize,
    pub(crate) count: usize,
    pub(crate) reverse: bool,
    pub(crate) requested_start: Option<usize>,
    pub(crate) starting_index: usize,
    pub(crate) extra: E,
}

impl<E> FindContext<E> {
    pub(crate) fn new<O>(
        options: &FindOptions<O>,
        count: usize,
        starting_index: usize,
        extra: E,
    ) -> Self {
        Self {
            results: Vec::new(),
            index: starting_index,
            count,
            reverse: options.reverse,
            requested_start: options.starting_index,
            starting_index,
            extra,
        }
    }

    /// Records accepted so far
    pub fn results(&self) -> &[Record] {
        &self.results
    }

    /// Position currently being visited
    pub fn index(&self) -> usize {
        self.index
    }

    /// Collection length when the scan began
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the scan runs from high index to low
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// Starting position as given in the options, before clamping
    pub fn requested_start(&self) -> Option<usize> {
        self.requested_start
    }

    /// Resolved (clamped) starting position
    pub fn starting_index(&self) -> usize {
        self.starting_index
    }

    /// Caller-owned state
    pub fn extra(&self) -> &E {
        &self.extra
    }

    /// Mutable caller-owned state
    pub fn extra_mut(&mut self) -> &mut E {
        &mut self.extra
    }

    pub(crate) fn into_results(self) -> Vec<Record> {
        self.results
    }
}
