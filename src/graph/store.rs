//! In-memory communication graph storage
//!
//! Arena-style store: people and edges live in vectors addressed by stable
//! integer keys, with adjacency lists per node and an address index for
//! lookup by email. Pipeline stages mutate node/edge records in place; each
//! stage owns the fields it writes.

use super::edge::CommunicationEdge;
use super::node::Person;
use super::types::{EdgeId, PersonId};
use orgnet_graph_algorithms::GraphView;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during graph mutation
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Person {0} not found")]
    PersonNotFound(PersonId),

    #[error("Edge {0} -> {1} already exists")]
    EdgeAlreadyExists(PersonId, PersonId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Directed weighted communication graph.
#[derive(Debug, Default)]
pub struct CommGraph {
    /// Person storage; `PersonId` indexes into this arena
    people: Vec<Person>,

    /// Edge storage; `EdgeId` indexes into this arena
    edges: Vec<CommunicationEdge>,

    /// Outgoing edges per person
    outgoing: Vec<Vec<EdgeId>>,

    /// Incoming edges per person
    incoming: Vec<Vec<EdgeId>>,

    /// Normalized address -> person
    address_index: FxHashMap<String, PersonId>,

    /// (source, target) -> edge, for reverse-edge lookups
    edge_index: FxHashMap<(PersonId, PersonId), EdgeId>,
}

impl CommGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a person by address, creating the node on first sight.
    pub fn intern_person(&mut self, email: &str, name: &str) -> PersonId {
        if let Some(&id) = self.address_index.get(email) {
            return id;
        }
        let id = PersonId::new(self.people.len() as u32);
        self.people.push(Person::new(id, email, name));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.address_index.insert(email.to_string(), id);
        id
    }

    /// Create a directed edge between two existing people.
    pub fn add_edge(&mut self, source: PersonId, target: PersonId) -> GraphResult<EdgeId> {
        if source.index() >= self.people.len() {
            return Err(GraphError::PersonNotFound(source));
        }
        if target.index() >= self.people.len() {
            return Err(GraphError::PersonNotFound(target));
        }
        if self.edge_index.contains_key(&(source, target)) {
            return Err(GraphError::EdgeAlreadyExists(source, target));
        }

        let id = EdgeId::new(self.edges.len() as u32);
        self.edges.push(CommunicationEdge::new(id, source, target));
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);
        self.edge_index.insert((source, target), id);
        Ok(id)
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.index()]
    }

    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.people[id.index()]
    }

    pub fn person_id(&self, email: &str) -> Option<PersonId> {
        self.address_index.get(email).copied()
    }

    pub fn person_by_address(&self, email: &str) -> Option<&Person> {
        self.person_id(email).map(|id| self.person(id))
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn people_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.people.iter_mut()
    }

    pub fn edge(&self, id: EdgeId) -> &CommunicationEdge {
        &self.edges[id.index()]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut CommunicationEdge {
        &mut self.edges[id.index()]
    }

    pub fn edges(&self) -> &[CommunicationEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut CommunicationEdge> {
        self.edges.iter_mut()
    }

    /// Edge from `source` to `target`, if one was materialized.
    pub fn edge_between(&self, source: PersonId, target: PersonId) -> Option<EdgeId> {
        self.edge_index.get(&(source, target)).copied()
    }

    pub fn out_edges(&self, id: PersonId) -> &[EdgeId] {
        &self.outgoing[id.index()]
    }

    pub fn in_edges(&self, id: PersonId) -> &[EdgeId] {
        &self.incoming[id.index()]
    }

    /// Distinct outgoing neighbors, in edge-creation order.
    pub fn out_neighbors(&self, id: PersonId) -> Vec<PersonId> {
        self.outgoing[id.index()]
            .iter()
            .map(|&eid| self.edges[eid.index()].target)
            .collect()
    }

    /// Predecessors and successors combined.
    pub fn neighbors(&self, id: PersonId) -> BTreeSet<PersonId> {
        let mut set = BTreeSet::new();
        for &eid in &self.outgoing[id.index()] {
            set.insert(self.edges[eid.index()].target);
        }
        for &eid in &self.incoming[id.index()] {
            set.insert(self.edges[eid.index()].source);
        }
        set
    }

    /// Total incident edge count (in + out).
    pub fn degree(&self, id: PersonId) -> usize {
        self.outgoing[id.index()].len() + self.incoming[id.index()].len()
    }

    pub fn node_count(&self) -> usize {
        self.people.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Directed graph density: edges / (n · (n−1)). 0 for n < 2.
    pub fn density(&self) -> f64 {
        let n = self.people.len();
        if n < 2 {
            return 0.0;
        }
        self.edges.len() as f64 / (n * (n - 1)) as f64
    }

    /// Directed CSR view for the algorithms crate, optionally carrying the
    /// composite edge weights.
    pub fn view(&self, weighted: bool) -> GraphView {
        if weighted {
            let edges: Vec<(usize, usize, f64)> = self
                .edges
                .iter()
                .map(|e| (e.source.index(), e.target.index(), e.weight))
                .collect();
            GraphView::weighted(self.people.len(), &edges)
        } else {
            let edges: Vec<(usize, usize)> = self
                .edges
                .iter()
                .map(|e| (e.source.index(), e.target.index()))
                .collect();
            GraphView::unweighted(self.people.len(), &edges)
        }
    }

    /// Undirected projection: reciprocal edges merged, weights summed.
    pub fn undirected_view(&self, weighted: bool) -> GraphView {
        if weighted {
            let edges: Vec<(usize, usize, f64)> = self
                .edges
                .iter()
                .map(|e| (e.source.index(), e.target.index(), e.weight))
                .collect();
            GraphView::undirected_weighted(self.people.len(), &edges)
        } else {
            let edges: Vec<(usize, usize)> = self
                .edges
                .iter()
                .map(|e| (e.source.index(), e.target.index()))
                .collect();
            GraphView::undirected_unweighted(self.people.len(), &edges)
        }
    }

    /// Directed unweighted view with one node's incident edges removed, for
    /// removal simulations. The excluded node stays in the index space as an
    /// isolated node; the graph itself is never mutated.
    pub fn view_excluding(&self, excluded: PersonId) -> GraphView {
        let edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .filter(|e| e.source != excluded && e.target != excluded)
            .map(|e| (e.source.index(), e.target.index()))
            .collect();
        GraphView::unweighted(self.people.len(), &edges)
    }
}
