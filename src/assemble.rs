//! Reaction assembly: species nodes first, then one isolated build per
//! reaction glyph folded into the map.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::graph::{
    CurveId, MapGraph, Node, NodeKey, NodeMap, Reaction, ReactionMetabolite, Segment, SegmentKey,
    SegmentMap,
};
use crate::options::ConvertOptions;
use crate::sbml::{ReactionDecl, ReactionGlyph, SbmlModel};
use crate::species::SpeciesResolver;
use crate::splice::attach_metabolite;
use crate::trunk::build_trunk;

/// Distance past the canvas corner where unplaced reaction labels go.
const OFFSCREEN_LABEL_MARGIN: f64 = 100.0;

/// Mutable state for a single reaction glyph.
///
/// Reads the shared species nodes but only writes its own nodes and segments,
/// so reactions can be built independently and merged afterwards.
pub struct ReactionBuild<'a> {
    reaction_glyph: &'a str,
    shared: &'a NodeMap,
    nodes: NodeMap,
    segments: SegmentMap,
    primary: Vec<NodeKey>,
}

/// Output of one [`ReactionBuild`].
#[derive(Clone, Debug, Default)]
pub struct ReactionParts {
    pub nodes: NodeMap,
    pub segments: SegmentMap,
    /// Species nodes referenced as a main substrate or product.
    pub primary: Vec<NodeKey>,
    pub label: Option<Point>,
}

impl<'a> ReactionBuild<'a> {
    pub fn new(reaction_glyph: &'a str, shared: &'a NodeMap) -> Self {
        Self {
            reaction_glyph,
            shared,
            nodes: NodeMap::new(),
            segments: SegmentMap::new(),
            primary: Vec::new(),
        }
    }

    pub fn reaction_glyph(&self) -> &'a str {
        self.reaction_glyph
    }

    pub fn position(&self, key: &NodeKey) -> Option<Point> {
        self.nodes
            .get(key)
            .or_else(|| self.shared.get(key))
            .map(|node| node.position)
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key) || self.shared.contains_key(key)
    }

    pub fn add_node(&mut self, key: NodeKey, node: Node) {
        self.nodes.insert(key, node);
    }

    pub fn segments(&self) -> &SegmentMap {
        &self.segments
    }

    pub fn add_segment(&mut self, key: SegmentKey, segment: Segment) {
        self.segments.insert(key, segment);
    }

    /// Replace `target` with `from -> splice` and `splice -> to`.
    ///
    /// Both halves are straight: control points of a bezier `target` are
    /// dropped, matching the straight-chord test that picked it.
    pub fn split_segment(
        &mut self,
        target: &SegmentKey,
        splice: &NodeKey,
        curve: &CurveId,
    ) -> bool {
        let removed = match self.segments.shift_remove(target) {
            Some(segment) => segment,
            None => return false,
        };
        self.segments.insert(
            SegmentKey::SpliceLeft(curve.clone()),
            Segment::straight(removed.from, splice.clone()),
        );
        self.segments.insert(
            SegmentKey::SpliceRight(curve.clone()),
            Segment::straight(splice.clone(), removed.to),
        );
        true
    }

    pub fn mark_primary(&mut self, key: NodeKey) {
        if !self.primary.contains(&key) {
            self.primary.push(key);
        }
    }

    pub fn finish(self, label: Option<Point>) -> ReactionParts {
        ReactionParts {
            nodes: self.nodes,
            segments: self.segments,
            primary: self.primary,
            label,
        }
    }
}

/// Trunk plus every attached metabolite curve of one reaction glyph.
pub fn build_reaction(
    glyph: &ReactionGlyph,
    shared: &NodeMap,
    options: &ConvertOptions,
) -> Result<ReactionParts> {
    let mut build = ReactionBuild::new(&glyph.id, shared);
    let trunk = build_trunk(&mut build, &glyph.curve, options.label_offset);
    for reference in &glyph.references {
        attach_metabolite(&mut build, &trunk, reference)?;
    }
    Ok(build.finish(trunk.label))
}

/// Build the whole map graph for a parsed model.
pub fn convert_model(model: &SbmlModel, options: &ConvertOptions) -> Result<MapGraph> {
    let resolver = SpeciesResolver::new(&model.species);
    let layout = &model.layout;
    let mut graph = MapGraph {
        id: model.id.clone(),
        width: layout.width,
        height: layout.height,
        ..MapGraph::default()
    };

    let offscreen = Point::new(
        layout.width + OFFSCREEN_LABEL_MARGIN,
        layout.height + OFFSCREEN_LABEL_MARGIN,
    );
    for decl in &model.reactions {
        let reaction = reaction_stub(decl, &resolver, offscreen)?;
        graph.reactions.insert(decl.id.clone(), reaction);
    }

    for glyph in &layout.species_glyphs {
        let name = resolver.resolve(&glyph.species)?;
        graph.nodes.insert(
            NodeKey::Species(glyph.id.clone()),
            Node::metabolite(name, glyph.bbox.center()),
        );
    }

    let mut laid_out = HashSet::new();
    for glyph in &layout.reaction_glyphs {
        if !graph.reactions.contains_key(&glyph.reaction) {
            return Err(Error::UnknownReaction {
                glyph: glyph.id.clone(),
                reaction: glyph.reaction.clone(),
            });
        }
        let parts = build_reaction(glyph, &graph.nodes, options)?;
        if !laid_out.insert(glyph.reaction.as_str()) {
            log::warn!(
                "Reaction {:?} has more than one glyph; keeping {:?}",
                glyph.reaction,
                glyph.id
            );
        }
        merge_reaction(&mut graph, &glyph.reaction, parts);
    }

    log::debug!(
        "Built {} nodes across {} reactions",
        graph.nodes.len(),
        graph.reactions.len()
    );
    Ok(graph)
}

fn reaction_stub(
    decl: &ReactionDecl,
    resolver: &SpeciesResolver,
    label: Point,
) -> Result<Reaction> {
    let mut metabolites = Vec::with_capacity(decl.reactants.len() + decl.products.len());
    for species in &decl.reactants {
        metabolites.push(ReactionMetabolite {
            display_id: resolver.resolve(species)?.to_string(),
            coefficient: -1,
        });
    }
    for species in &decl.products {
        metabolites.push(ReactionMetabolite {
            display_id: resolver.resolve(species)?.to_string(),
            coefficient: 1,
        });
    }
    Ok(Reaction {
        name: decl.name.clone().unwrap_or_else(|| decl.id.clone()),
        reversible: decl.reversible,
        metabolites,
        label,
        segments: IndexMap::new(),
    })
}

fn merge_reaction(graph: &mut MapGraph, reaction_id: &str, parts: ReactionParts) {
    graph.nodes.extend(parts.nodes);
    for key in &parts.primary {
        if let Some(node) = graph.nodes.get_mut(key) {
            node.mark_primary();
        }
    }
    if let Some(reaction) = graph.reactions.get_mut(reaction_id) {
        if let Some(label) = parts.label {
            reaction.label = label;
        }
        reaction.segments = parts.segments;
    }
}
