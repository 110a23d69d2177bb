//! Convert SBML layout-extension maps into Escher metabolic map JSON.
//!
//! The pipeline parses the model ([`sbml`]), places one metabolite node per
//! species glyph, then rebuilds every reaction from its trunk curve
//! ([`trunk`]) and the curves of its species references ([`splice`]).

pub mod assemble;
pub mod error;
pub mod escher;
pub mod geometry;
pub mod graph;
pub mod options;
pub mod sbml;
pub mod species;
pub mod splice;
pub mod trunk;

pub use assemble::convert_model;
pub use error::{Error, Result};
pub use escher::{render, write_json, EscherMap};
pub use graph::MapGraph;
pub use options::{ConvertOptions, LabelOffset};
pub use sbml::{identify_format, parse_model, parse_sbml_str, InputFormat, SbmlModel};

/// Parse SBML text and produce the Escher map document.
pub fn convert_str(xml: &str, options: &ConvertOptions) -> Result<EscherMap> {
    let model = parse_sbml_str(xml)?;
    let graph = convert_model(&model, options)?;
    render(&graph)
}
