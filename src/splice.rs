//! Attaches species reference curves to a reaction trunk.
//!
//! Flux runs substrate -> reaction -> product, so every chain built here points
//! from the species toward the trunk for consumed metabolites and from the trunk
//! toward the species for produced ones, whatever order the layout stored the
//! curve points in.

use crate::assemble::ReactionBuild;
use crate::error::{Error, Result};
use crate::geometry::{is_point_on_segment, Point};
use crate::graph::{CurveId, Node, NodeKey, Segment, SegmentKey};
use crate::sbml::SpeciesReferenceGlyph;
use crate::trunk::Trunk;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Substrate,
    SideSubstrate,
    Product,
    SideProduct,
}

impl Role {
    pub fn parse(role: &str) -> Option<Role> {
        match role {
            "substrate" => Some(Role::Substrate),
            "sidesubstrate" => Some(Role::SideSubstrate),
            "product" => Some(Role::Product),
            "sideproduct" => Some(Role::SideProduct),
            _ => None,
        }
    }

    pub fn is_producing(self) -> bool {
        matches!(self, Role::Product | Role::SideProduct)
    }

    /// Main (non-side) metabolites are drawn as primary nodes.
    pub fn is_main(self) -> bool {
        matches!(self, Role::Substrate | Role::Product)
    }
}

/// Order a link between the trunk side and the species side along the flux.
fn orient(producing: bool, trunk_side: NodeKey, species_side: NodeKey) -> (NodeKey, NodeKey) {
    if producing {
        (trunk_side, species_side)
    } else {
        (species_side, trunk_side)
    }
}

/// Build the chain for one species reference glyph and hook it onto the trunk.
///
/// Unknown roles are logged and skipped without touching the build.
pub fn attach_metabolite(
    build: &mut ReactionBuild,
    trunk: &Trunk,
    reference: &SpeciesReferenceGlyph,
) -> Result<()> {
    let role = match Role::parse(&reference.role) {
        Some(role) => role,
        None => {
            log::warn!(
                "Skipping species reference glyph {:?}: unknown role {:?}",
                reference.id,
                reference.role
            );
            return Ok(());
        }
    };

    let species = NodeKey::Species(reference.species_glyph.clone());
    if !build.contains_node(&species) {
        return Err(Error::UnknownSpeciesGlyph {
            reference: reference.id.clone(),
            glyph: reference.species_glyph.clone(),
        });
    }
    if reference.curve.is_empty() {
        return Err(Error::EmptyMetaboliteCurve {
            reference: reference.id.clone(),
        });
    }

    let curve = CurveId {
        reaction_glyph: build.reaction_glyph().to_string(),
        reference_glyph: reference.id.clone(),
        species_glyph: reference.species_glyph.clone(),
    };
    let producing = role.is_producing();
    let last = reference.curve.len() - 1;

    for (index, segment) in reference.curve.iter().enumerate() {
        let next = if index == last {
            species.clone()
        } else {
            NodeKey::Curve {
                curve: curve.clone(),
                index: index + 1,
            }
        };
        let near = if index == 0 {
            attach_to_anchor(build, trunk, &curve, segment.start, producing)
        } else {
            let key = NodeKey::Curve {
                curve: curve.clone(),
                index,
            };
            build.add_node(key.clone(), Node::multimarker(segment.start));
            key
        };

        let (from, to) = orient(producing, near, next);
        let (b1, b2) = if producing {
            (segment.base_point1, segment.base_point2)
        } else {
            (segment.base_point2, segment.base_point1)
        };
        build.add_segment(
            SegmentKey::Curve {
                curve: curve.clone(),
                index,
            },
            Segment { from, to, b1, b2 },
        );
    }

    if role.is_main() {
        build.mark_primary(species);
    }
    Ok(())
}

/// Pick the node the first curve point hangs from, splicing the trunk when
/// the point is not one of its anchors.
fn attach_to_anchor(
    build: &mut ReactionBuild,
    trunk: &Trunk,
    curve: &CurveId,
    point: Point,
    producing: bool,
) -> NodeKey {
    let anchor = if producing {
        trunk.end.as_ref()
    } else {
        trunk.start.as_ref()
    };
    let anchor = match anchor {
        Some(anchor) => anchor,
        None => {
            // No trunk: the curve's own first point stands in for the anchor.
            let key = NodeKey::Curve {
                curve: curve.clone(),
                index: 0,
            };
            build.add_node(key.clone(), Node::multimarker(point));
            return key;
        }
    };

    // Exact comparison on purpose; the splice search below uses a tolerance.
    if build.position(anchor) == Some(point) {
        return anchor.clone();
    }

    let splice = NodeKey::Splice(curve.clone());
    build.add_node(splice.clone(), Node::multimarker(point));
    match find_containing_segment(build, point) {
        Some(target) => {
            build.split_segment(&target, &splice, curve);
        }
        None => {
            log::warn!(
                "No trunk segment of {:?} contains ({}, {}); linking {} to {} directly",
                curve.reaction_glyph,
                point.x,
                point.y,
                curve.reference_glyph,
                anchor
            );
            let (from, to) = orient(producing, anchor.clone(), splice.clone());
            build.add_segment(
                SegmentKey::SpliceFallback(curve.clone()),
                Segment::straight(from, to),
            );
        }
    }
    splice
}

/// First trunk segment, in insertion order, whose straight line holds `point`.
pub fn find_containing_segment(build: &ReactionBuild, point: Point) -> Option<SegmentKey> {
    build
        .segments()
        .iter()
        .filter(|(key, _)| key.is_trunk())
        .find(|(_, segment)| {
            match (build.position(&segment.from), build.position(&segment.to)) {
                (Some(a), Some(b)) => is_point_on_segment(point, a, b),
                _ => false,
            }
        })
        .map(|(key, _)| key.clone())
}
