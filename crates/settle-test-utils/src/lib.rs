//! Test utilities and mock types for Settle development.
//!
//! Provides mock implementations of [`PathMap`] ([`OpenPathMap`],
//! [`CountingMap`]) and layout fixtures in [`fixtures`] for building
//! [`MainGrid`](settle_engine::MainGrid) scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashSet;

use settle_core::{PathRequester, Pos, SearchType};
use settle_path::PathMap;
use settle_space::HexSpace;

/// Mock implementation of [`PathMap`].
///
/// Backed by two `HashSet<Pos>`: tiles blocked for everybody and tiles
/// matching every search type. Ownership plays no part.
pub struct OpenPathMap {
    space: HexSpace,
    blocked: HashSet<Pos>,
    targets: HashSet<Pos>,
}

impl OpenPathMap {
    /// An open `width × height` map with no targets.
    ///
    /// # Panics
    ///
    /// If the dimensions are rejected by [`HexSpace::new`].
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            space: HexSpace::new(width, height).expect("valid test dimensions"),
            blocked: HashSet::new(),
            targets: HashSet::new(),
        }
    }

    pub fn block(&mut self, pos: Pos) -> &mut Self {
        self.blocked.insert(pos);
        self
    }

    pub fn unblock(&mut self, pos: Pos) -> &mut Self {
        self.blocked.remove(&pos);
        self
    }

    /// Mark `pos` as matching every search type.
    pub fn add_target(&mut self, pos: Pos) -> &mut Self {
        self.targets.insert(pos);
        self
    }

    pub fn blocked(&self) -> impl Iterator<Item = &Pos> {
        self.blocked.iter()
    }
}

impl PathMap for OpenPathMap {
    fn space(&self) -> &HexSpace {
        &self.space
    }

    fn is_blocked(&self, _requester: &dyn PathRequester, pos: Pos) -> bool {
        self.blocked.contains(&pos)
    }

    fn fits_search_type(
        &self,
        pos: Pos,
        _search_type: SearchType,
        _requester: &dyn PathRequester,
    ) -> bool {
        self.targets.contains(&pos)
    }
}

/// Wraps another [`PathMap`] and records every tile the search asked
/// about, in order.
pub struct CountingMap<M> {
    inner: M,
    blocked_queries: RefCell<Vec<Pos>>,
    predicate_queries: RefCell<Vec<Pos>>,
}

impl<M: PathMap> CountingMap<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            blocked_queries: RefCell::new(Vec::new()),
            predicate_queries: RefCell::new(Vec::new()),
        }
    }

    /// Tiles passed to [`PathMap::is_blocked`].
    pub fn blocked_queries(&self) -> Vec<Pos> {
        self.blocked_queries.borrow().clone()
    }

    /// Tiles passed to [`PathMap::fits_search_type`].
    pub fn predicate_queries(&self) -> Vec<Pos> {
        self.predicate_queries.borrow().clone()
    }

    /// Every tile the search touched through either query.
    pub fn touched(&self) -> HashSet<Pos> {
        self.blocked_queries
            .borrow()
            .iter()
            .chain(self.predicate_queries.borrow().iter())
            .copied()
            .collect()
    }

    pub fn reset(&self) {
        self.blocked_queries.borrow_mut().clear();
        self.predicate_queries.borrow_mut().clear();
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: PathMap> PathMap for CountingMap<M> {
    fn space(&self) -> &HexSpace {
        self.inner.space()
    }

    fn is_blocked(&self, requester: &dyn PathRequester, pos: Pos) -> bool {
        self.blocked_queries.borrow_mut().push(pos);
        self.inner.is_blocked(requester, pos)
    }

    fn fits_search_type(
        &self,
        pos: Pos,
        search_type: SearchType,
        requester: &dyn PathRequester,
    ) -> bool {
        self.predicate_queries.borrow_mut().push(pos);
        self.inner.fits_search_type(pos, search_type, requester)
    }

    fn cost(&self, from: Pos, to: Pos) -> u32 {
        self.inner.cost(from, to)
    }

    fn heuristic_cost(&self, from: Pos, to: Pos) -> u32 {
        self.inner.heuristic_cost(from, to)
    }
}
