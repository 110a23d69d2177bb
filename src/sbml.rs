//! Typed access to an SBML model and its layout extension.
//!
//! The tree walk mirrors the layout package's element nesting. Attributes are
//! looked up by local name so `layout:x` and `x` are read the same way.

use roxmltree::{Document, Node};

use crate::error::{Error, Result};
use crate::geometry::{BBox, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Sbml,
    CellDesigner,
}

#[derive(Clone, Debug, Default)]
pub struct SbmlModel {
    pub id: String,
    pub species: Vec<SpeciesDecl>,
    pub reactions: Vec<ReactionDecl>,
    pub layout: Layout,
}

#[derive(Clone, Debug)]
pub struct SpeciesDecl {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ReactionDecl {
    pub id: String,
    pub name: Option<String>,
    pub reversible: bool,
    pub reactants: Vec<String>,
    pub products: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub species_glyphs: Vec<SpeciesGlyph>,
    pub reaction_glyphs: Vec<ReactionGlyph>,
}

#[derive(Clone, Debug)]
pub struct SpeciesGlyph {
    pub id: String,
    pub species: String,
    pub bbox: BBox,
}

#[derive(Clone, Debug)]
pub struct ReactionGlyph {
    pub id: String,
    pub reaction: String,
    /// Trunk geometry; empty when the glyph carries no curve.
    pub curve: Vec<CurveSegment>,
    pub references: Vec<SpeciesReferenceGlyph>,
}

#[derive(Clone, Debug)]
pub struct SpeciesReferenceGlyph {
    pub id: String,
    /// Raw role attribute; interpreted by [`crate::splice::Role::parse`].
    pub role: String,
    pub species_glyph: String,
    pub curve: Vec<CurveSegment>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSegment {
    pub start: Point,
    pub end: Point,
    pub base_point1: Option<Point>,
    pub base_point2: Option<Point>,
}

impl CurveSegment {
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            base_point1: None,
            base_point2: None,
        }
    }
}

/// Classify a parsed document by its root element and declared namespaces.
pub fn identify_format(doc: &Document) -> Option<InputFormat> {
    let root = doc.root_element();
    if !root.has_tag_name("sbml") {
        return None;
    }
    if root
        .namespaces()
        .any(|ns| ns.name() == Some("celldesigner"))
    {
        return Some(InputFormat::CellDesigner);
    }
    Some(InputFormat::Sbml)
}

/// Parse SBML text into a model, rejecting anything that is not plain SBML.
pub fn parse_sbml_str(xml: &str) -> Result<SbmlModel> {
    let doc = Document::parse(xml)?;
    match identify_format(&doc) {
        Some(InputFormat::Sbml) => parse_model(&doc),
        Some(InputFormat::CellDesigner) => Err(Error::UnsupportedFormat(
            "CellDesigner documents must be converted to SBML first".to_string(),
        )),
        None => Err(Error::UnsupportedFormat(format!(
            "root element <{}> is neither SBML nor CellDesigner",
            doc.root_element().tag_name().name()
        ))),
    }
}

pub fn parse_model(doc: &Document) -> Result<SbmlModel> {
    let model = require_child(doc.root_element(), "model")?;
    let id = attr(&model, "id").unwrap_or_default().to_string();

    let species = list_items(model, "listOfSpecies", "species")
        .map(|node| -> Result<SpeciesDecl> {
            Ok(SpeciesDecl {
                id: require_attr(&node, "id")?.to_string(),
                name: attr(&node, "name").map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let reactions = list_items(model, "listOfReactions", "reaction")
        .map(|node| parse_reaction(&node))
        .collect::<Result<Vec<_>>>()?;

    let layouts = model
        .descendants()
        .find(|node| node.has_tag_name("listOfLayouts"))
        .ok_or_else(|| missing_element("listOfLayouts", &model))?;
    let layout_node = require_child(layouts, "layout")?;
    let layout = parse_layout(&layout_node)?;

    Ok(SbmlModel {
        id,
        species,
        reactions,
        layout,
    })
}

fn parse_reaction(node: &Node) -> Result<ReactionDecl> {
    let species_refs = |list: &str| -> Result<Vec<String>> {
        list_items(*node, list, "speciesReference")
            .map(|reference| -> Result<String> {
                Ok(require_attr(&reference, "species")?.to_string())
            })
            .collect()
    };
    Ok(ReactionDecl {
        id: require_attr(node, "id")?.to_string(),
        name: attr(node, "name").map(str::to_string),
        // Only an explicit "true" marks a reaction reversible.
        reversible: attr(node, "reversible").map_or(false, |value| value == "true"),
        reactants: species_refs("listOfReactants")?,
        products: species_refs("listOfProducts")?,
    })
}

fn parse_layout(layout: &Node) -> Result<Layout> {
    let dimensions = require_child(*layout, "dimensions")?;
    let width = require_f64(&dimensions, "width")?;
    let height = require_f64(&dimensions, "height")?;

    let species_glyphs = list_items(*layout, "listOfSpeciesGlyphs", "speciesGlyph")
        .map(|node| -> Result<SpeciesGlyph> {
            Ok(SpeciesGlyph {
                id: require_attr(&node, "id")?.to_string(),
                species: require_attr(&node, "species")?.to_string(),
                bbox: parse_bbox(&require_child(node, "boundingBox")?)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let reaction_glyphs = list_items(*layout, "listOfReactionGlyphs", "reactionGlyph")
        .map(|node| parse_reaction_glyph(&node))
        .collect::<Result<Vec<_>>>()?;

    Ok(Layout {
        width,
        height,
        species_glyphs,
        reaction_glyphs,
    })
}

fn parse_reaction_glyph(node: &Node) -> Result<ReactionGlyph> {
    let references = list_items(
        *node,
        "listOfSpeciesReferenceGlyphs",
        "speciesReferenceGlyph",
    )
    .map(|reference| -> Result<SpeciesReferenceGlyph> {
        Ok(SpeciesReferenceGlyph {
            id: require_attr(&reference, "id")?.to_string(),
            role: attr(&reference, "role").unwrap_or_default().to_string(),
            species_glyph: require_attr(&reference, "speciesGlyph")?.to_string(),
            curve: parse_curve(&reference)?,
        })
    })
    .collect::<Result<Vec<_>>>()?;

    Ok(ReactionGlyph {
        id: require_attr(node, "id")?.to_string(),
        reaction: require_attr(node, "reaction")?.to_string(),
        curve: parse_curve(node)?,
        references,
    })
}

fn parse_curve(owner: &Node) -> Result<Vec<CurveSegment>> {
    let curve = match child(*owner, "curve") {
        Some(curve) => curve,
        None => return Ok(Vec::new()),
    };
    list_items(curve, "listOfCurveSegments", "curveSegment")
        .map(|segment| -> Result<CurveSegment> {
            Ok(CurveSegment {
                start: parse_point(&require_child(segment, "start")?)?,
                end: parse_point(&require_child(segment, "end")?)?,
                base_point1: child(segment, "basePoint1")
                    .map(|node| parse_point(&node))
                    .transpose()?,
                base_point2: child(segment, "basePoint2")
                    .map(|node| parse_point(&node))
                    .transpose()?,
            })
        })
        .collect()
}

fn parse_bbox(node: &Node) -> Result<BBox> {
    let position = parse_point(&require_child(*node, "position")?)?;
    let dimensions = require_child(*node, "dimensions")?;
    Ok(BBox {
        x: position.x,
        y: position.y,
        w: require_f64(&dimensions, "width")?,
        h: require_f64(&dimensions, "height")?,
    })
}

fn parse_point(node: &Node) -> Result<Point> {
    Ok(Point {
        x: require_f64(node, "x")?,
        y: require_f64(node, "y")?,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

fn require_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| missing_element(name, &node))
}

/// Items of a `listOfX` container; an absent container yields nothing.
fn list_items<'a, 'input: 'a>(
    owner: Node<'a, 'input>,
    list: &str,
    item: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    child(owner, list)
        .into_iter()
        .flat_map(move |list| list.children().filter(move |node| node.has_tag_name(item)))
}

fn attr<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attribute| attribute.name() == name)
        .map(|attribute| attribute.value())
}

fn require_attr<'a>(node: &Node<'a, '_>, name: &str) -> Result<&'a str> {
    attr(node, name).ok_or_else(|| Error::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

fn require_f64(node: &Node, name: &str) -> Result<f64> {
    let value = require_attr(node, name)?;
    value.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        attribute: name.to_string(),
        value: value.to_string(),
    })
}

fn missing_element(element: &str, parent: &Node) -> Error {
    let context = match attr(parent, "id") {
        Some(id) => format!("<{} id={:?}>", parent.tag_name().name(), id),
        None => format!("<{}>", parent.tag_name().name()),
    };
    Error::MissingElement {
        element: element.to_string(),
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core"
      xmlns:layout="http://www.sbml.org/sbml/level3/version1/layout/version1"
      level="3" version="1">
  <model id="toy">
    <listOfSpecies>
      <species id="s_glc" name="glc__D_c"/>
      <species id="s_g6p"/>
    </listOfSpecies>
    <listOfReactions>
      <reaction id="r_hex" name="HEX1" reversible="false">
        <listOfReactants><speciesReference species="s_glc"/></listOfReactants>
        <listOfProducts><speciesReference species="s_g6p"/></listOfProducts>
      </reaction>
    </listOfReactions>
    <layout:listOfLayouts>
      <layout:layout layout:id="l1">
        <layout:dimensions layout:width="400" layout:height="300"/>
        <layout:listOfSpeciesGlyphs>
          <layout:speciesGlyph layout:id="sg_glc" layout:species="s_glc">
            <layout:boundingBox>
              <layout:position layout:x="0" layout:y="0"/>
              <layout:dimensions layout:width="20" layout:height="10"/>
            </layout:boundingBox>
          </layout:speciesGlyph>
        </layout:listOfSpeciesGlyphs>
        <layout:listOfReactionGlyphs>
          <layout:reactionGlyph layout:id="rg_hex" layout:reaction="r_hex">
            <layout:curve>
              <layout:listOfCurveSegments>
                <layout:curveSegment xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="CubicBezier">
                  <layout:start layout:x="10" layout:y="20"/>
                  <layout:end layout:x="50" layout:y="20"/>
                  <layout:basePoint1 layout:x="20" layout:y="10"/>
                  <layout:basePoint2 layout:x="40" layout:y="10"/>
                </layout:curveSegment>
              </layout:listOfCurveSegments>
            </layout:curve>
            <layout:listOfSpeciesReferenceGlyphs>
              <layout:speciesReferenceGlyph layout:id="srg1" layout:speciesGlyph="sg_glc" layout:role="substrate">
                <layout:curve>
                  <layout:listOfCurveSegments>
                    <layout:curveSegment>
                      <layout:start layout:x="10" layout:y="20"/>
                      <layout:end layout:x="10" layout:y="5"/>
                    </layout:curveSegment>
                  </layout:listOfCurveSegments>
                </layout:curve>
              </layout:speciesReferenceGlyph>
            </layout:listOfSpeciesReferenceGlyphs>
          </layout:reactionGlyph>
        </layout:listOfReactionGlyphs>
      </layout:layout>
    </layout:listOfLayouts>
  </model>
</sbml>"#;

    #[test]
    fn parses_model_and_layout() {
        let model = parse_sbml_str(DOC).unwrap();
        assert_eq!(model.id, "toy");
        assert_eq!(model.species.len(), 2);
        assert_eq!(model.species[0].name.as_deref(), Some("glc__D_c"));
        assert_eq!(model.species[1].name, None);

        let reaction = &model.reactions[0];
        assert_eq!(reaction.name.as_deref(), Some("HEX1"));
        assert!(!reaction.reversible);
        assert_eq!(reaction.reactants, vec!["s_glc".to_string()]);
        assert_eq!(reaction.products, vec!["s_g6p".to_string()]);

        let layout = &model.layout;
        assert_eq!((layout.width, layout.height), (400.0, 300.0));
        assert_eq!(layout.species_glyphs[0].bbox.center(), Point::new(10.0, 5.0));

        let glyph = &layout.reaction_glyphs[0];
        assert_eq!(glyph.reaction, "r_hex");
        assert_eq!(glyph.curve.len(), 1);
        assert_eq!(glyph.curve[0].base_point1, Some(Point::new(20.0, 10.0)));
        assert_eq!(glyph.references[0].role, "substrate");
        assert_eq!(glyph.references[0].curve[0].start, Point::new(10.0, 20.0));
        assert_eq!(glyph.references[0].curve[0].base_point1, None);
    }

    #[test]
    fn identifies_celldesigner() {
        let xml = r#"<sbml xmlns="http://www.sbml.org/sbml/level2/version4"
            xmlns:celldesigner="http://www.sbml.org/2001/ns/celldesigner"><model id="m"/></sbml>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(identify_format(&doc), Some(InputFormat::CellDesigner));
        assert!(matches!(
            parse_sbml_str(xml),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reaction_without_reversible_attribute_is_irreversible() {
        let xml = DOC.replace(r#"name="HEX1" reversible="false""#, r#"name="HEX1""#);
        let model = parse_sbml_str(&xml).unwrap();
        assert!(!model.reactions[0].reversible);

        let xml = DOC.replace(r#"reversible="false""#, r#"reversible="true""#);
        let model = parse_sbml_str(&xml).unwrap();
        assert!(model.reactions[0].reversible);
    }

    #[test]
    fn rejects_non_sbml_root() {
        let doc = Document::parse("<sbgn><map/></sbgn>").unwrap();
        assert_eq!(identify_format(&doc), None);
    }

    #[test]
    fn missing_layout_is_fatal() {
        let xml = r#"<sbml><model id="m"><listOfSpecies/></model></sbml>"#;
        let err = parse_sbml_str(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingElement { ref element, .. } if element == "listOfLayouts"
        ));
    }

    #[test]
    fn bad_coordinate_is_fatal() {
        let xml = DOC.replace(r#"layout:width="400""#, r#"layout:width="wide""#);
        let err = parse_sbml_str(&xml).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { ref value, .. } if value == "wide"));
    }
}
