use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{NameID, RoadClassification};

/// Identifies one directed edge of the surrounding road graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeID(pub usize);

impl fmt::Display for EdgeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EdgeID({})", self.0)
    }
}

/// Everything the classifier needs to know about an edge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeData {
    pub classification: RoadClassification,
    pub name: Option<NameID>,
}

/// Read-only view of the road graph's edges. The graph itself lives
/// elsewhere; classification only ever looks up edge data.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoadNetwork {
    edges: Vec<EdgeData>,
}

impl RoadNetwork {
    pub fn new() -> RoadNetwork {
        RoadNetwork { edges: Vec::new() }
    }

    pub fn add_edge(&mut self, data: EdgeData) -> EdgeID {
        self.edges.push(data);
        EdgeID(self.edges.len() - 1)
    }

    pub fn edge(&self, id: EdgeID) -> &EdgeData {
        &self.edges[id.0]
    }
}
