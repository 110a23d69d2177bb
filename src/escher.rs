//! Escher map document: rendering of the typed graph into the JSON layout the
//! viewer loads.

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::graph::{MapGraph, Node, NodeKind, Reaction};

pub const HOMEPAGE: &str = "https://escher.github.io";
pub const SCHEMA: &str = "https://escher.github.io/escher/jsonschema/1-0-0#";

/// `[header, body]`, serialized as a two element array.
#[derive(Debug, Serialize)]
pub struct EscherMap(pub MapHeader, pub MapBody);

#[derive(Debug, Serialize)]
pub struct MapHeader {
    pub map_name: String,
    pub map_id: String,
    pub map_description: String,
    pub homepage: String,
    pub schema: String,
}

#[derive(Debug, Serialize)]
pub struct MapBody {
    pub reactions: IndexMap<String, EscherReaction>,
    pub nodes: IndexMap<String, EscherNode>,
    pub text_labels: IndexMap<String, serde_json::Value>,
    pub canvas: Canvas,
}

#[derive(Debug, Serialize)]
pub struct EscherReaction {
    pub name: String,
    pub bigg_id: String,
    pub reversibility: bool,
    pub metabolites: Vec<EscherMetabolite>,
    pub label_x: f64,
    pub label_y: f64,
    pub segments: IndexMap<String, EscherSegment>,
}

#[derive(Debug, Serialize)]
pub struct EscherMetabolite {
    pub bigg_id: String,
    pub coefficient: i32,
}

#[derive(Debug, Serialize)]
pub struct EscherSegment {
    pub from_node_id: String,
    pub to_node_id: String,
    pub b1: Option<Point>,
    pub b2: Option<Point>,
}

#[derive(Debug, Serialize)]
pub struct EscherNode {
    pub node_type: &'static str,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigg_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_is_primary: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Canvas {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Layout area grown by a 5% margin on every side.
    pub fn around(width: f64, height: f64) -> Self {
        Self {
            x: -width / 20.0,
            y: -height / 20.0,
            width: width * 1.1,
            height: height * 1.1,
        }
    }
}

/// Render structured ids to strings and wrap the graph in map metadata.
pub fn render(graph: &MapGraph) -> Result<EscherMap> {
    let mut nodes = IndexMap::with_capacity(graph.nodes.len());
    for (key, node) in &graph.nodes {
        let id = key.to_string();
        if nodes.contains_key(&id) {
            return Err(Error::DuplicateNodeId(id));
        }
        nodes.insert(id, render_node(node));
    }

    let reactions = graph
        .reactions
        .iter()
        .map(|(id, reaction)| -> Result<(String, EscherReaction)> {
            Ok((id.clone(), render_reaction(id, reaction)?))
        })
        .collect::<Result<IndexMap<_, _>>>()?;

    let header = MapHeader {
        map_name: graph.id.clone(),
        map_id: graph.id.clone(),
        map_description: String::new(),
        homepage: HOMEPAGE.to_string(),
        schema: SCHEMA.to_string(),
    };
    let body = MapBody {
        reactions,
        nodes,
        text_labels: IndexMap::new(),
        canvas: Canvas::around(graph.width, graph.height),
    };
    Ok(EscherMap(header, body))
}

fn render_node(node: &Node) -> EscherNode {
    match &node.kind {
        NodeKind::Multimarker => EscherNode {
            node_type: "multimarker",
            x: node.position.x,
            y: node.position.y,
            bigg_id: None,
            name: None,
            label_x: None,
            label_y: None,
            node_is_primary: None,
        },
        NodeKind::Metabolite {
            name,
            label,
            is_primary,
        } => EscherNode {
            node_type: "metabolite",
            x: node.position.x,
            y: node.position.y,
            bigg_id: Some(name.clone()),
            name: Some(name.clone()),
            label_x: Some(label.x),
            label_y: Some(label.y),
            node_is_primary: Some(*is_primary),
        },
    }
}

fn render_reaction(id: &str, reaction: &Reaction) -> Result<EscherReaction> {
    let mut segments = IndexMap::with_capacity(reaction.segments.len());
    for (key, segment) in &reaction.segments {
        let segment_id = key.to_string();
        if segments.contains_key(&segment_id) {
            return Err(Error::DuplicateSegmentId {
                reaction: id.to_string(),
                segment: segment_id,
            });
        }
        segments.insert(
            segment_id,
            EscherSegment {
                from_node_id: segment.from.to_string(),
                to_node_id: segment.to.to_string(),
                b1: segment.b1,
                b2: segment.b2,
            },
        );
    }

    Ok(EscherReaction {
        name: reaction.name.clone(),
        bigg_id: reaction.name.clone(),
        reversibility: reaction.reversible,
        metabolites: reaction
            .metabolites
            .iter()
            .map(|metabolite| EscherMetabolite {
                bigg_id: metabolite.display_id.clone(),
                coefficient: metabolite.coefficient,
            })
            .collect(),
        label_x: reaction.label.x,
        label_y: reaction.label.y,
        segments,
    })
}

/// Write the map as JSON, four-space indented unless `compact`.
pub fn write_json<W: Write>(map: &EscherMap, writer: W, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(writer, map)?;
    } else {
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
        map.serialize(&mut serializer)?;
    }
    Ok(())
}
