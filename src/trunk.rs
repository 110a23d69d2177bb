use crate::assemble::ReactionBuild;
use crate::geometry::Point;
use crate::graph::{Node, NodeKey, Segment, SegmentKey};
use crate::options::LabelOffset;
use crate::sbml::CurveSegment;

/// Anchors of a reaction trunk. Both are `None` when the glyph has no curve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trunk {
    pub start: Option<NodeKey>,
    pub end: Option<NodeKey>,
    pub label: Option<Point>,
}

/// Turn a reaction curve into a chain of multimarker nodes `S0 -> S1 -> ... -> E`.
pub fn build_trunk(
    build: &mut ReactionBuild,
    curve: &[CurveSegment],
    label_offset: LabelOffset,
) -> Trunk {
    if curve.is_empty() {
        return Trunk::default();
    }
    let reaction_glyph = build.reaction_glyph();
    let trunk_node = |index: usize| NodeKey::Trunk {
        reaction_glyph: reaction_glyph.to_string(),
        index,
    };
    let end = NodeKey::TrunkEnd {
        reaction_glyph: reaction_glyph.to_string(),
        index: curve.len(),
    };

    let last = curve.len() - 1;
    for (index, segment) in curve.iter().enumerate() {
        let start = trunk_node(index);
        build.add_node(start.clone(), Node::multimarker(segment.start));
        let to = if index == last {
            build.add_node(end.clone(), Node::multimarker(segment.end));
            end.clone()
        } else {
            trunk_node(index + 1)
        };
        build.add_segment(
            SegmentKey::Trunk {
                reaction_glyph: reaction_glyph.to_string(),
                index,
            },
            Segment {
                from: start,
                to,
                b1: segment.base_point1,
                b2: segment.base_point2,
            },
        );
    }

    let first = &curve[0];
    let mid = first.start.midpoint(first.end);
    Trunk {
        start: Some(trunk_node(0)),
        end: Some(end),
        label: Some(Point::new(mid.x, mid.y + label_offset.dy())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeMap;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> CurveSegment {
        CurveSegment::line(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn chains_curve_segments() {
        let shared = NodeMap::new();
        let mut build = ReactionBuild::new("rg", &shared);
        let curve = [line(0.0, 0.0, 10.0, 0.0), line(10.0, 0.0, 20.0, 0.0)];
        let trunk = build_trunk(&mut build, &curve, LabelOffset::Midpoint);
        let parts = build.finish(trunk.label);

        assert_eq!(trunk.start.as_ref().unwrap().to_string(), "rg-0");
        assert_eq!(trunk.end.as_ref().unwrap().to_string(), "rg-2-end");
        let ids: Vec<String> = parts.nodes.keys().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["rg-0", "rg-1", "rg-2-end"]);

        let chain: Vec<(String, String)> = parts
            .segments
            .values()
            .map(|s| (s.from.to_string(), s.to.to_string()))
            .collect();
        assert_eq!(
            chain,
            vec![
                ("rg-0".to_string(), "rg-1".to_string()),
                ("rg-1".to_string(), "rg-2-end".to_string()),
            ]
        );
        assert_eq!(
            parts.nodes[&trunk.end.clone().unwrap()].position,
            Point::new(20.0, 0.0)
        );
        assert_eq!(parts.label, Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn raised_label_sits_above_first_segment() {
        let shared = NodeMap::new();
        let mut build = ReactionBuild::new("rg", &shared);
        let curve = [line(0.0, 40.0, 10.0, 60.0), line(10.0, 60.0, 90.0, 60.0)];
        let trunk = build_trunk(&mut build, &curve, LabelOffset::Raised);
        assert_eq!(trunk.label, Some(Point::new(5.0, 30.0)));
    }

    #[test]
    fn single_segment_trunk() {
        let shared = NodeMap::new();
        let mut build = ReactionBuild::new("rg", &shared);
        let trunk = build_trunk(&mut build, &[line(1.0, 2.0, 3.0, 4.0)], LabelOffset::Midpoint);
        let parts = build.finish(trunk.label);
        assert_eq!(parts.nodes.len(), 2);
        assert_eq!(parts.segments.len(), 1);
        assert_eq!(
            parts.segments[0].to,
            NodeKey::TrunkEnd {
                reaction_glyph: "rg".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn missing_curve_has_no_anchors() {
        let shared = NodeMap::new();
        let mut build = ReactionBuild::new("rg", &shared);
        let trunk = build_trunk(&mut build, &[], LabelOffset::Raised);
        assert_eq!(trunk, Trunk::default());
        let parts = build.finish(trunk.label);
        assert!(parts.nodes.is_empty());
        assert!(parts.segments.is_empty());
    }

    #[test]
    fn bezier_control_points_are_kept() {
        let shared = NodeMap::new();
        let mut build = ReactionBuild::new("rg", &shared);
        let mut segment = line(0.0, 0.0, 30.0, 0.0);
        segment.base_point1 = Some(Point::new(10.0, 5.0));
        segment.base_point2 = Some(Point::new(20.0, 5.0));
        let trunk = build_trunk(&mut build, &[segment], LabelOffset::Midpoint);
        let parts = build.finish(trunk.label);
        assert_eq!(parts.segments[0].b1, Some(Point::new(10.0, 5.0)));
        assert_eq!(parts.segments[0].b2, Some(Point::new(20.0, 5.0)));
    }
}
