//! Edge-labelled search frontier shared by both A* variants.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use mts_core::EdgeId;

/// Heap entry: (priority key, label cost, edge).  `Reverse` turns the max
/// heap into a min heap; the edge id makes ties deterministic.
type Entry = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>, EdgeId)>;

/// Open list plus best-known cost and back-link per labelled edge.
///
/// Entries are never decreased in place.  An improved label is pushed again
/// and the outdated entry is skipped when it surfaces.
#[derive(Default)]
pub(crate) struct Frontier {
    heap:    BinaryHeap<Entry>,
    best:    FxHashMap<EdgeId, f64>,
    link:    FxHashMap<EdgeId, Option<EdgeId>>,
    settled: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `cost` for `edge` if it beats the current label.  `estimate`
    /// is the heuristic part of the priority key.
    pub fn relax(&mut self, edge: EdgeId, cost: f64, link: Option<EdgeId>, estimate: f64) -> bool {
        if self.best.get(&edge).is_some_and(|&c| c <= cost) {
            return false;
        }
        self.best.insert(edge, cost);
        self.link.insert(edge, link);
        self.heap.push(Reverse((OrderedFloat(cost + estimate), OrderedFloat(cost), edge)));
        true
    }

    /// Pop the cheapest live label as `(edge, cost)`.
    pub fn pop(&mut self) -> Option<(EdgeId, f64)> {
        while let Some(Reverse((_, OrderedFloat(cost), edge))) = self.heap.pop() {
            if self.is_stale(edge, cost) {
                continue;
            }
            self.settled += 1;
            return Some((edge, cost));
        }
        None
    }

    /// Smallest priority key among live labels.
    pub fn min_key(&mut self) -> Option<f64> {
        while let Some(&Reverse((OrderedFloat(key), OrderedFloat(cost), edge))) = self.heap.peek() {
            if self.is_stale(edge, cost) {
                self.heap.pop();
                continue;
            }
            return Some(key);
        }
        None
    }

    #[inline]
    pub fn cost(&self, edge: EdgeId) -> Option<f64> {
        self.best.get(&edge).copied()
    }

    pub fn settled(&self) -> u64 {
        self.settled
    }

    /// Follow back-links starting at `edge` (inclusive).
    pub fn chain(&self, edge: EdgeId) -> Vec<EdgeId> {
        let mut out = vec![edge];
        let mut cur = edge;
        // Links form a forest for non-negative weights; the bound only
        // matters if a caller broke that contract.
        while out.len() <= self.link.len() {
            match self.link.get(&cur).copied().flatten() {
                Some(next) => {
                    out.push(next);
                    cur = next;
                }
                None => break,
            }
        }
        out
    }

    #[inline]
    fn is_stale(&self, edge: EdgeId, cost: f64) -> bool {
        self.best.get(&edge).is_some_and(|&best| cost > best)
    }
}
