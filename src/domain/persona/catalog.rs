//! The embedded persona catalog.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::domain::foundation::PersonaId;

use super::Persona;

static CATALOG: Lazy<PersonaCatalog> = Lazy::new(|| {
    PersonaCatalog::from_yaml(include_str!("../../../data/personas.yaml"))
        .expect("embedded persona catalog is valid")
});

/// Returns the process-wide persona catalog.
pub fn catalog() -> &'static PersonaCatalog {
    &CATALOG
}

/// Immutable catalog of decoy personas.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaCatalog {
    default_persona: PersonaId,
    /// Minimum affinity weight a persona must clear to be auto-selected.
    affinity_floor: u32,
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// Parses a catalog from YAML and checks its internal consistency.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let catalog: PersonaCatalog =
            serde_yaml::from_str(yaml).map_err(|e| format!("persona catalog: {}", e))?;

        if catalog.personas.is_empty() {
            return Err("persona catalog: no personas defined".to_string());
        }
        if catalog.get(&catalog.default_persona).is_none() {
            return Err(format!(
                "persona catalog: default persona '{}' is not defined",
                catalog.default_persona
            ));
        }
        Ok(catalog)
    }

    /// Looks a persona up by id.
    pub fn get(&self, id: &PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| &p.id == id)
    }

    /// The designated fallback persona.
    pub fn default_persona(&self) -> &Persona {
        self.get(&self.default_persona)
            .expect("catalog validation guarantees the default persona exists")
    }

    /// Minimum affinity weight for auto-selection.
    pub fn affinity_floor(&self) -> u32 {
        self.affinity_floor
    }

    /// All personas, in catalog order.
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }
}
