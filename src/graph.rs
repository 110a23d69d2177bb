//! Node and segment store for the map being built.
//!
//! Nodes and segments are keyed by structured ids. String ids only appear
//! when the map is rendered (see [`crate::escher`]).

use std::fmt;

use indexmap::IndexMap;

use crate::geometry::Point;

/// Identifies one species reference curve inside one reaction glyph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CurveId {
    pub reaction_glyph: String,
    pub reference_glyph: String,
    pub species_glyph: String,
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.reaction_glyph, self.reference_glyph, self.species_glyph
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// Metabolite node, keyed by its species glyph id.
    Species(String),
    /// Start vertex of trunk curve segment `index`.
    Trunk { reaction_glyph: String, index: usize },
    /// Final trunk vertex; `index` is the trunk's segment count.
    TrunkEnd { reaction_glyph: String, index: usize },
    /// Start vertex of metabolite curve segment `index`.
    Curve { curve: CurveId, index: usize },
    /// Point where a metabolite curve meets the trunk off-vertex.
    Splice(CurveId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Species(glyph) => write!(f, "{glyph}"),
            NodeKey::Trunk {
                reaction_glyph,
                index,
            } => write!(f, "{reaction_glyph}-{index}"),
            NodeKey::TrunkEnd {
                reaction_glyph,
                index,
            } => write!(f, "{reaction_glyph}-{index}-end"),
            NodeKey::Curve { curve, index } => write!(f, "{curve}-{index}"),
            NodeKey::Splice(curve) => write!(f, "{curve}-0-extra"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    Trunk { reaction_glyph: String, index: usize },
    Curve { curve: CurveId, index: usize },
    /// Trunk half from the split segment's origin to the splice node.
    SpliceLeft(CurveId),
    /// Trunk half from the splice node to the split segment's target.
    SpliceRight(CurveId),
    /// Direct anchor edge used when no trunk segment holds the splice point.
    SpliceFallback(CurveId),
}

impl SegmentKey {
    /// Segments that make up the reaction trunk, including split halves.
    pub fn is_trunk(&self) -> bool {
        matches!(
            self,
            SegmentKey::Trunk { .. } | SegmentKey::SpliceLeft(_) | SegmentKey::SpliceRight(_)
        )
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::Trunk {
                reaction_glyph,
                index,
            } => write!(f, "{reaction_glyph}-{index}"),
            SegmentKey::Curve { curve, index } => write!(f, "{curve}-{index}"),
            SegmentKey::SpliceLeft(curve) => write!(f, "{curve}-0-extra-left"),
            SegmentKey::SpliceRight(curve) => write!(f, "{curve}-0-extra-right"),
            SegmentKey::SpliceFallback(curve) => write!(f, "{curve}-0-extra"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Multimarker,
    Metabolite {
        name: String,
        label: Point,
        is_primary: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: Point,
    pub kind: NodeKind,
}

impl Node {
    pub fn multimarker(position: Point) -> Self {
        Self {
            position,
            kind: NodeKind::Multimarker,
        }
    }

    pub fn metabolite(name: impl Into<String>, position: Point) -> Self {
        Self {
            position,
            kind: NodeKind::Metabolite {
                name: name.into(),
                label: position,
                is_primary: false,
            },
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.kind, NodeKind::Metabolite { is_primary: true, .. })
    }

    /// Flag a metabolite as primary. Never clears the flag.
    pub fn mark_primary(&mut self) {
        if let NodeKind::Metabolite { is_primary, .. } = &mut self.kind {
            *is_primary = true;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: NodeKey,
    pub to: NodeKey,
    pub b1: Option<Point>,
    pub b2: Option<Point>,
}

impl Segment {
    pub fn straight(from: NodeKey, to: NodeKey) -> Self {
        Self {
            from,
            to,
            b1: None,
            b2: None,
        }
    }
}

pub type NodeMap = IndexMap<NodeKey, Node>;
pub type SegmentMap = IndexMap<SegmentKey, Segment>;

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionMetabolite {
    pub display_id: String,
    /// -1 for reactants, +1 for products.
    pub coefficient: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    pub name: String,
    pub reversible: bool,
    pub metabolites: Vec<ReactionMetabolite>,
    pub label: Point,
    pub segments: SegmentMap,
}

/// The assembled map: global nodes plus reactions keyed by reaction id.
#[derive(Clone, Debug, Default)]
pub struct MapGraph {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub nodes: NodeMap,
    pub reactions: IndexMap<String, Reaction>,
}

impl MapGraph {
    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Segments whose endpoints are missing from the node map.
    pub fn dangling_segments(&self) -> Vec<(&str, &SegmentKey)> {
        let nodes = &self.nodes;
        self.reactions
            .iter()
            .flat_map(move |(id, reaction)| {
                reaction
                    .segments
                    .iter()
                    .filter(move |(_, segment)| {
                        !nodes.contains_key(&segment.from) || !nodes.contains_key(&segment.to)
                    })
                    .map(move |(key, _)| (id.as_str(), key))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> CurveId {
        CurveId {
            reaction_glyph: "rg1".to_string(),
            reference_glyph: "srg2".to_string(),
            species_glyph: "sg3".to_string(),
        }
    }

    #[test]
    fn rendered_ids() {
        let trunk = NodeKey::Trunk {
            reaction_glyph: "rg1".to_string(),
            index: 0,
        };
        let end = NodeKey::TrunkEnd {
            reaction_glyph: "rg1".to_string(),
            index: 2,
        };
        assert_eq!(trunk.to_string(), "rg1-0");
        assert_eq!(end.to_string(), "rg1-2-end");
        assert_eq!(NodeKey::Species("sg3".to_string()).to_string(), "sg3");
        assert_eq!(
            NodeKey::Curve {
                curve: curve(),
                index: 1
            }
            .to_string(),
            "rg1-srg2-sg3-1"
        );
        assert_eq!(NodeKey::Splice(curve()).to_string(), "rg1-srg2-sg3-0-extra");
        assert_eq!(
            SegmentKey::SpliceLeft(curve()).to_string(),
            "rg1-srg2-sg3-0-extra-left"
        );
        assert_eq!(
            SegmentKey::SpliceFallback(curve()).to_string(),
            "rg1-srg2-sg3-0-extra"
        );
    }

    #[test]
    fn trunk_segment_kinds() {
        assert!(SegmentKey::Trunk {
            reaction_glyph: "rg1".to_string(),
            index: 0
        }
        .is_trunk());
        assert!(SegmentKey::SpliceRight(curve()).is_trunk());
        assert!(!SegmentKey::SpliceFallback(curve()).is_trunk());
        assert!(!SegmentKey::Curve {
            curve: curve(),
            index: 0
        }
        .is_trunk());
    }

    #[test]
    fn primary_flag_is_sticky() {
        let mut node = Node::metabolite("atp_c", Point::new(1.0, 2.0));
        assert!(!node.is_primary());
        node.mark_primary();
        node.mark_primary();
        assert!(node.is_primary());

        let mut marker = Node::multimarker(Point::new(0.0, 0.0));
        marker.mark_primary();
        assert!(!marker.is_primary());
    }
}
