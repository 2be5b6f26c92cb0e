//! Paths and the world map
//!
//! Each path owns six nodes unlocked strictly in order. Node identifiers
//! starting with `fit` belong to the fitness track and never count toward
//! path progress.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of nodes on every path
pub const NODES_PER_PATH: usize = 6;

const FITNESS_PREFIX: &str = "fit";

/// One of the three thematic tracks chosen at onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Path {
    /// Strength to navigate challenges
    #[default]
    Resilience,
    /// Concentration and presence
    Focus,
    /// Gratitude and optimism
    Positivity,
}

impl Path {
    /// All paths in display order
    pub const ALL: [Path; 3] = [Path::Resilience, Path::Focus, Path::Positivity];

    /// Stable identifier as persisted
    #[inline]
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Path::Resilience => "resilience",
            Path::Focus => "focus",
            Path::Positivity => "positivity",
        }
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Path::Resilience => "Resilience",
            Path::Focus => "Focus",
            Path::Positivity => "Positivity",
        }
    }

    /// One-line description shown at onboarding
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Path::Resilience => "Build strength to navigate life's challenges.",
            Path::Focus => "Sharpen your concentration and be more present.",
            Path::Positivity => "Cultivate a more optimistic and grateful outlook.",
        }
    }

    /// Nodes of this path in unlock order
    pub fn nodes(self) -> impl Iterator<Item = &'static MapNode> {
        MAP_NODES.iter().filter(move |n| n.path == self)
    }

    /// The node that the next all-tasks-completed day unlocks, if any.
    ///
    /// Only non-fitness entries of `unlocked` are counted.
    #[must_use]
    pub fn next_unlock(self, unlocked: &[NodeId]) -> Option<&'static MapNode> {
        let count = unlocked.iter().filter(|id| !id.is_fitness()).count();
        self.nodes().nth(count)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Path {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownPath(s.to_string()))
    }
}

/// Identifier of a map node (path node or fitness pseudo-node)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Whether this id belongs to the fitness track
    #[inline]
    #[must_use]
    pub fn is_fitness(&self) -> bool {
        self.0.starts_with(FITNESS_PREFIX)
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position on the map, in percent of the map's height and width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    /// Percent from the top edge
    pub top: u8,
    /// Percent from the left edge
    pub left: u8,
}

/// Static reference data for one map node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapNode {
    /// Persisted identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Owning path
    pub path: Path,
    /// Screen position
    pub position: NodePosition,
}

impl MapNode {
    /// Owned identifier for persistence
    #[inline]
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::from(self.id)
    }

    /// Look up a node by id
    #[must_use]
    pub fn find(id: &str) -> Option<&'static MapNode> {
        MAP_NODES.iter().find(|n| n.id == id)
    }
}

const fn node(id: &'static str, name: &'static str, path: Path, top: u8, left: u8) -> MapNode {
    MapNode {
        id,
        name,
        path,
        position: NodePosition { top, left },
    }
}

/// Every path node, grouped by path and in unlock order within a path
pub static MAP_NODES: [MapNode; 18] = [
    node("r1", "Steadfast Stone", Path::Resilience, 10, 50),
    node("r2", "Grit Grove", Path::Resilience, 25, 30),
    node("r3", "Unbending Mountain", Path::Resilience, 40, 70),
    node("r4", "Anchor Point", Path::Resilience, 55, 40),
    node("r5", "The Summit of Self", Path::Resilience, 70, 60),
    node("r6", "Resilient River", Path::Resilience, 85, 30),
    node("f1", "Quiet Clearing", Path::Focus, 10, 50),
    node("f2", "Concentration Creek", Path::Focus, 25, 70),
    node("f3", "Mindful Monolith", Path::Focus, 40, 30),
    node("f4", "The Focused Eye", Path::Focus, 55, 60),
    node("f5", "Deep Work Depths", Path::Focus, 70, 40),
    node("f6", "Clarity Peak", Path::Focus, 85, 70),
    node("p1", "Gratitude Gardens", Path::Positivity, 10, 50),
    node("p2", "Sun-Kissed Summit", Path::Positivity, 25, 30),
    node("p3", "Joyful Spring", Path::Positivity, 40, 70),
    node("p4", "Kindness Meadow", Path::Positivity, 55, 40),
    node("p5", "The Optimist's Outlook", Path::Positivity, 70, 60),
    node("p6", "Serenity Shore", Path::Positivity, 85, 30),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_path_has_six_nodes() {
        for path in Path::ALL {
            assert_eq!(path.nodes().count(), NODES_PER_PATH);
        }
    }

    #[test]
    fn next_unlock_is_sequential() {
        let mut unlocked = Vec::new();
        for expected in ["f1", "f2", "f3", "f4", "f5", "f6"] {
            let next = Path::Focus.next_unlock(&unlocked).unwrap();
            assert_eq!(next.id, expected);
            unlocked.push(next.node_id());
        }
        assert!(Path::Focus.next_unlock(&unlocked).is_none());
    }

    #[test]
    fn fitness_nodes_do_not_count() {
        let unlocked = vec![NodeId::from("fitness-hub"), NodeId::from("r1")];
        assert_eq!(Path::Resilience.next_unlock(&unlocked).unwrap().id, "r2");
    }

    #[test]
    fn path_round_trips_through_str() {
        assert_eq!("Focus".parse::<Path>().unwrap(), Path::Focus);
        assert!("courage".parse::<Path>().is_err());
        assert_eq!(serde_json::to_string(&Path::Positivity).unwrap(), "\"positivity\"");
    }
}
