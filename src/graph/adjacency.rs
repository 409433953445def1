//! A set-valued adjacency paired with its inverse.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::Position;

/// A directed adjacency between positions, kept together with its inverse.
///
/// Every insertion of an edge `from → to` also records `to → from` in the
/// inverse map, so both directions always describe the same set of edges.
/// Edges are a set: inserting an edge twice has no effect.
///
/// # Examples
///
/// ```
/// use splicekit::graph::Adjacency;
///
/// let mut adjacency = Adjacency::default();
/// assert!(adjacency.insert(10, 20));
/// assert!(adjacency.insert(10, 35));
/// assert!(!adjacency.insert(10, 20));
///
/// assert_eq!(adjacency.len(), 2);
/// assert_eq!(
///     adjacency.targets(10).map(|t| t.iter().copied().collect::<Vec<_>>()),
///     Some(vec![20, 35])
/// );
/// assert!(adjacency.sources(35).unwrap().contains(&10));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Adjacency {
    /// The forward map.
    forward: BTreeMap<Position, BTreeSet<Position>>,

    /// The inverse map.
    inverse: BTreeMap<Position, BTreeSet<Position>>,
}

impl Adjacency {
    /// Inserts an edge and its inverse.
    ///
    /// Returns whether the edge was newly inserted.
    pub fn insert(&mut self, from: Position, to: Position) -> bool {
        let inserted = self.forward.entry(from).or_default().insert(to);
        self.inverse.entry(to).or_default().insert(from);
        inserted
    }

    /// Gets the targets of a source position.
    pub fn targets(&self, from: Position) -> Option<&BTreeSet<Position>> {
        self.forward.get(&from)
    }

    /// Gets the sources of a target position.
    pub fn sources(&self, to: Position) -> Option<&BTreeSet<Position>> {
        self.inverse.get(&to)
    }

    /// Iterates over the distinct source positions in increasing order.
    pub fn source_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.forward.keys().copied()
    }

    /// Iterates over every edge in increasing `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.forward
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }

    /// Iterates over every edge of the inverse map in increasing `(to, from)`
    /// order.
    pub fn inverse_edges(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.inverse
            .iter()
            .flat_map(|(to, sources)| sources.iter().map(move |from| (*to, *from)))
    }

    /// Gets the number of edges.
    pub fn len(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    /// Returns whether there are no edges.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Unions another adjacency into this one.
    pub fn merge(&mut self, other: Adjacency) {
        for (from, targets) in other.forward {
            for to in targets {
                self.insert(from, to);
            }
        }
    }
}
