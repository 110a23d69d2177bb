use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::sbml::SpeciesDecl;

/// Species id to display id lookup.
#[derive(Clone, Debug, Default)]
pub struct SpeciesResolver {
    names: HashMap<String, String>,
}

impl SpeciesResolver {
    pub fn new(species: &[SpeciesDecl]) -> Self {
        let names = species
            .iter()
            .map(|decl| {
                let name = decl.name.clone().unwrap_or_else(|| decl.id.clone());
                (decl.id.clone(), name)
            })
            .collect();
        Self { names }
    }

    pub fn resolve(&self, species: &str) -> Result<&str> {
        self.names
            .get(species)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownSpecies {
                species: species.to_string(),
            })
    }
}
