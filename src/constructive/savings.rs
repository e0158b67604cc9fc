//! Savings-based constructive heuristic adapted to open paths.
//!
//! # Algorithm
//!
//! Every stop starts as its own one-stop [`Fragment`]. For each pair of stops
//! `i < j` the saving
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! measures how much cheaper it is to chain `i → j` than to serve both
//! straight from the depot. Pairs are processed in decreasing order of
//! saving, and the fragment ending at `i` absorbs the fragment starting at
//! `j` whenever the two are distinct. Once all pairs are processed the
//! longest fragment is kept, the remaining stops follow in ascending index
//! order, and the depot is prefixed.
//!
//! Without a depot return there is nothing tying fragments together, so the
//! result can be poor when merges leave several fragments of equal length.
//! The solver always compares it against the other constructors.
//!
//! # Complexity
//!
//! O(n² log n), dominated by sorting the savings.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use log::trace;
use thiserror::Error;

use crate::distance::DistanceMatrix;
use crate::models::{Route, DEPOT};

use super::Constructor;

/// A saving for chaining stop `i` directly into stop `j`.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// An ordered chain of stops built up by savings merges.
///
/// A fragment is never empty. Its id is the stop it was created from and
/// survives every merge in which it absorbs another fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    id: usize,
    nodes: Vec<usize>,
}

impl Fragment {
    fn singleton(stop: usize) -> Self {
        Self {
            id: stop,
            nodes: vec![stop],
        }
    }

    /// Stable identifier of this fragment.
    pub fn id(&self) -> usize {
        self.id
    }

    /// First stop of the chain.
    pub fn start(&self) -> usize {
        self.nodes[0]
    }

    /// Last stop of the chain.
    pub fn end(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    /// Number of stops in the chain.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; fragments hold at least one stop.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stops in chain order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }
}

/// Reasons a [`FragmentSet::merge`] is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MergeRejection {
    /// Both stops already belong to the same fragment.
    #[error("stops already share a fragment")]
    SameFragment,
    /// The tail stop is not the end of its fragment.
    #[error("tail stop is not the end of its fragment")]
    TailNotAtEnd,
    /// The head stop is not the start of its fragment.
    #[error("head stop is not the start of its fragment")]
    HeadNotAtStart,
    /// One of the indices is the depot or out of range.
    #[error("index is not a stop")]
    NotAStop,
}

/// Disjoint fragments covering every stop of an instance.
///
/// # Examples
///
/// ```
/// use open_route::constructive::{FragmentSet, MergeRejection};
///
/// let mut set = FragmentSet::singletons(4);
/// assert_eq!(set.merge(1, 2), Ok(1));
/// assert_eq!(set.merge(2, 1), Err(MergeRejection::SameFragment));
/// assert_eq!(set.merge(1, 3), Err(MergeRejection::TailNotAtEnd));
/// assert_eq!(set.merge(2, 3), Ok(1));
/// assert_eq!(set.longest().unwrap().nodes(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct FragmentSet {
    /// Slot per fragment id; `None` once absorbed (and for the depot).
    fragments: Vec<Option<Fragment>>,
    /// Fragment id holding each stop.
    owner: Vec<usize>,
}

impl FragmentSet {
    /// One single-stop fragment per stop `1..n`.
    pub fn singletons(n: usize) -> Self {
        let fragments = (0..n)
            .map(|i| (i != DEPOT).then(|| Fragment::singleton(i)))
            .collect();
        Self {
            fragments,
            owner: (0..n).collect(),
        }
    }

    /// The fragment currently holding `stop`.
    pub fn fragment_of(&self, stop: usize) -> Option<&Fragment> {
        if stop == DEPOT {
            return None;
        }
        let id = *self.owner.get(stop)?;
        self.fragments[id].as_ref()
    }

    /// Appends the fragment starting at `head` to the fragment ending at
    /// `tail`, returning the id of the merged fragment.
    pub fn merge(&mut self, tail: usize, head: usize) -> Result<usize, MergeRejection> {
        let tail_frag = self.fragment_of(tail).ok_or(MergeRejection::NotAStop)?;
        let head_frag = self.fragment_of(head).ok_or(MergeRejection::NotAStop)?;
        let (tail_id, head_id) = (tail_frag.id, head_frag.id);

        if tail_id == head_id {
            return Err(MergeRejection::SameFragment);
        }
        if tail_frag.end() != tail {
            return Err(MergeRejection::TailNotAtEnd);
        }
        if head_frag.start() != head {
            return Err(MergeRejection::HeadNotAtStart);
        }

        let absorbed = self.fragments[head_id]
            .take()
            .ok_or(MergeRejection::NotAStop)?;
        for &stop in &absorbed.nodes {
            self.owner[stop] = tail_id;
        }
        if let Some(survivor) = self.fragments[tail_id].as_mut() {
            survivor.nodes.extend(absorbed.nodes);
        }
        Ok(tail_id)
    }

    /// Live fragments in ascending id order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().flatten()
    }

    /// The longest fragment; ties go to the lowest id.
    pub fn longest(&self) -> Option<&Fragment> {
        self.fragments().fold(None, |best: Option<&Fragment>, f| match best {
            Some(b) if b.len() >= f.len() => Some(b),
            _ => Some(f),
        })
    }
}

/// Constructs a route with the open-path savings heuristic.
///
/// # Examples
///
/// ```
/// use open_route::constructive::open_savings;
/// use open_route::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(5);
/// for i in 0..5 {
///     for j in 0..5 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// assert_eq!(open_savings(&dm).as_slice(), &[0, 1, 2, 3, 4]);
/// ```
pub fn open_savings(distances: &DistanceMatrix) -> Route {
    let n = distances.size();
    if n <= 2 {
        return Route::identity(n);
    }

    let mut savings = Vec::with_capacity((n - 1) * (n - 2) / 2);
    for i in 1..n {
        for j in (i + 1)..n {
            let value = distances.get(DEPOT, i) + distances.get(DEPOT, j) - distances.get(i, j);
            savings.push(Saving { i, j, value });
        }
    }
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut set = FragmentSet::singletons(n);
    let mut merges = 0;
    for saving in &savings {
        if set.merge(saving.i, saving.j).is_ok() {
            merges += 1;
        }
    }

    let mut order = Vec::with_capacity(n);
    order.push(DEPOT);
    let mut used = vec![false; n];
    if let Some(longest) = set.longest() {
        trace!(
            "savings: {merges} merges, longest fragment has {} of {} stops",
            longest.len(),
            n - 1
        );
        for &stop in longest.nodes() {
            used[stop] = true;
            order.push(stop);
        }
    }
    order.extend((1..n).filter(|&stop| !used[stop]));

    Route::from_order(order)
}

/// [`Constructor`] wrapper around [`open_savings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSavings;

impl Constructor for OpenSavings {
    fn name(&self) -> &'static str {
        "savings"
    }

    fn construct(&self, distances: &DistanceMatrix) -> Vec<Route> {
        vec![open_savings(distances)]
    }
}
