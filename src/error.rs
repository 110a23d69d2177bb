#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("unsupported input: {0}")]
    UnsupportedFormat(String),
    #[error("missing <{element}> in {context}")]
    MissingElement { element: String, context: String },
    #[error("missing attribute {attribute:?} on <{element}>")]
    MissingAttribute { element: String, attribute: String },
    #[error("attribute {attribute:?} is not a number: {value:?}")]
    InvalidNumber { attribute: String, value: String },
    #[error("species {species:?} is not declared in the model")]
    UnknownSpecies { species: String },
    #[error("reaction glyph {glyph:?} refers to undeclared reaction {reaction:?}")]
    UnknownReaction { glyph: String, reaction: String },
    #[error("species reference glyph {reference:?} refers to unknown species glyph {glyph:?}")]
    UnknownSpeciesGlyph { reference: String, glyph: String },
    #[error("species reference glyph {reference:?} has no curve segments")]
    EmptyMetaboliteCurve { reference: String },
    #[error("node id {0:?} is produced twice")]
    DuplicateNodeId(String),
    #[error("segment id {segment:?} is produced twice in reaction {reaction:?}")]
    DuplicateSegmentId { reaction: String, segment: String },
    #[error("failed to serialize map: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
