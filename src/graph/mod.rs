//! # Connection Graph
//!
//! Undirected edges between live cubes, each rendered as a line segment whose
//! endpoints are rewritten every frame from the cubes' world positions.
//!
//! ## Invariants
//!
//! - A connection always has two distinct live endpoints
//! - (A, B) and (B, A) denote the same connection
//! - Under [`DuplicatePolicy::Reject`] at most one connection exists per pair
//! - The pending [`SelectionSet`] never holds more than two objects
//!
//! ## Selection flow
//!
//! Objects are offered one at a time with [`ConnectionGraph::select`]. The
//! second distinct object completes the pair: a connection is created (policy
//! permitting), the selection is cleared and connection mode is left.

use std::fmt;

use cgmath::{Vector3, Zero};

use crate::gfx::scene::{ObjectId, SpatialRegistry};

/// What to do when a pair that is already connected is connected again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the existing connection, create nothing
    #[default]
    Reject,
    /// Create a parallel connection
    AllowParallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Line geometry of one connection, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
}

impl Default for LineSegment {
    fn default() -> Self {
        Self {
            start: Vector3::zero(),
            end: Vector3::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub endpoint_a: ObjectId,
    pub endpoint_b: ObjectId,
    pub line: LineSegment,
}

impl Connection {
    /// Order-independent pair comparison
    pub fn connects(&self, a: ObjectId, b: ObjectId) -> bool {
        (self.endpoint_a == a && self.endpoint_b == b) || (self.endpoint_a == b && self.endpoint_b == a)
    }

    pub fn involves(&self, id: ObjectId) -> bool {
        self.endpoint_a == id || self.endpoint_b == id
    }
}

/// Result of offering an object to a [`SelectionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Added; the set now holds this many objects
    Added(usize),
    AlreadySelected,
    /// The set already holds two objects; nothing changed
    Full,
}

/// Up to two objects waiting to be paired, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<ObjectId>,
}

impl SelectionSet {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ObjectId) -> SelectOutcome {
        if self.items.contains(&id) {
            return SelectOutcome::AlreadySelected;
        }
        if self.items.len() >= Self::CAPACITY {
            log::info!("selection full, ignoring {id}");
            return SelectOutcome::Full;
        }
        self.items.push(id);
        SelectOutcome::Added(self.items.len())
    }

    pub fn remove(&mut self, id: ObjectId) {
        self.items.retain(|item| *item != id);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.items.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= Self::CAPACITY
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Outcome of a connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Created(ConnectionId),
    /// Pair already connected and the policy rejects duplicates
    Duplicate,
    /// One endpoint is not live, or both endpoints are the same object
    Invalid,
}

/// Outcome of [`ConnectionGraph::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Object is waiting for a partner
    Pending,
    AlreadySelected,
    /// Object is not live
    Ignored,
    /// The second object completed a pair
    Paired(ConnectOutcome),
}

#[derive(Debug, Default)]
pub struct ConnectionGraph {
    connections: Vec<Connection>,
    selection: SelectionSet,
    policy: DuplicatePolicy,
    connection_mode: bool,
    next_id: u64,
}

impl ConnectionGraph {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Offer an object for pairing. Completing a pair connects it, clears the
    /// selection and leaves connection mode.
    pub fn select(&mut self, id: ObjectId, registry: &SpatialRegistry) -> SelectionEvent {
        if !registry.contains(id) {
            return SelectionEvent::Ignored;
        }

        match self.selection.push(id) {
            SelectOutcome::AlreadySelected => SelectionEvent::AlreadySelected,
            SelectOutcome::Full => SelectionEvent::Ignored,
            SelectOutcome::Added(count) if count < SelectionSet::CAPACITY => {
                log::debug!("selected {id} for connection");
                SelectionEvent::Pending
            }
            SelectOutcome::Added(_) => {
                let (a, b) = (self.selection.items()[0], self.selection.items()[1]);
                let outcome = self.connect(a, b, registry);
                self.selection.clear();
                self.connection_mode = false;
                SelectionEvent::Paired(outcome)
            }
        }
    }

    /// Remove an object from the pending selection
    pub fn deselect(&mut self, id: ObjectId) {
        self.selection.remove(id);
    }

    /// Abort the pending pairing without connecting
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn enter_connection_mode(&mut self) {
        self.connection_mode = true;
    }

    /// Leave connection mode, dropping any half-made pair
    pub fn exit_connection_mode(&mut self) {
        self.connection_mode = false;
        self.selection.clear();
    }

    pub fn in_connection_mode(&self) -> bool {
        self.connection_mode
    }

    /// Connect two live objects
    pub fn connect(&mut self, a: ObjectId, b: ObjectId, registry: &SpatialRegistry) -> ConnectOutcome {
        let (Some(pos_a), Some(pos_b)) = (registry.world_position(a), registry.world_position(b)) else {
            return ConnectOutcome::Invalid;
        };
        if a == b {
            return ConnectOutcome::Invalid;
        }
        if self.policy == DuplicatePolicy::Reject && self.is_connected(a, b) {
            log::info!("{a} and {b} are already connected");
            return ConnectOutcome::Duplicate;
        }

        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.connections.push(Connection {
            id,
            endpoint_a: a,
            endpoint_b: b,
            line: LineSegment {
                start: pos_a,
                end: pos_b,
            },
        });
        log::info!("connected {a} and {b} ({id})");
        ConnectOutcome::Created(id)
    }

    pub fn is_connected(&self, a: ObjectId, b: ObjectId) -> bool {
        self.connections.iter().any(|c| c.connects(a, b))
    }

    /// Remove every connection touching `id`, returning them so their line
    /// resources can be released
    pub fn remove_incident(&mut self, id: ObjectId) -> Vec<Connection> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.involves(id));
        self.connections = kept;
        removed
    }

    /// Rewrite every line from its endpoints' current world positions.
    /// A connection whose endpoint vanished is dropped.
    pub fn sync_lines(&mut self, registry: &SpatialRegistry) {
        self.connections.retain_mut(|connection| {
            match (
                registry.world_position(connection.endpoint_a),
                registry.world_position(connection.endpoint_b),
            ) {
                (Some(start), Some(end)) => {
                    connection.line = LineSegment { start, end };
                    true
                }
                _ => {
                    log::warn!("dropping {} with a dead endpoint", connection.id);
                    false
                }
            }
        });
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Drop all connections, the selection and connection mode
    pub fn clear(&mut self) {
        self.connections.clear();
        self.selection.clear();
        self.connection_mode = false;
    }
}
