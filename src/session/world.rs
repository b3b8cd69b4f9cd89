//! Mutable world state shared by the state machine and the event router.

use crate::gfx::scene::{ObjectId, SpatialRegistry};
use crate::graph::ConnectionGraph;

/// Live cubes plus the connections between them.
///
/// Deleting through [`World::delete_object`] keeps the two consistent: a
/// connection never outlives either endpoint.
#[derive(Debug, Default)]
pub struct World {
    pub registry: SpatialRegistry,
    pub graph: ConnectionGraph,
}

impl World {
    pub fn new(graph: ConnectionGraph) -> Self {
        Self {
            registry: SpatialRegistry::new(),
            graph,
        }
    }

    /// Remove an object, every connection incident to it, and any pending
    /// selection of it. Returns `false` if the object was not live.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        if self.registry.remove(id).is_none() {
            return false;
        }
        let removed = self.graph.remove_incident(id);
        self.graph.deselect(id);
        log::debug!("deleted {id} and {} incident connection(s)", removed.len());
        true
    }

    /// Drop every object, connection and pending selection
    pub fn clear(&mut self) {
        self.registry.clear();
        self.graph.clear();
    }
}
