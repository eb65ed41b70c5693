//! Affinity-based persona selection.

use tracing::debug;

use crate::domain::detection::ScamType;
use crate::domain::foundation::PersonaId;

use super::{catalog, Persona, PersonaCatalog};

/// Maps a scam category to the decoy identity best suited to play it.
#[derive(Debug, Clone)]
pub struct PersonaSelector {
    catalog: &'static PersonaCatalog,
    auto_select: bool,
}

impl PersonaSelector {
    /// Creates a selector over the embedded catalog.
    pub fn new(auto_select: bool) -> Self {
        Self {
            catalog: catalog(),
            auto_select,
        }
    }

    /// Selects a persona for the detected scam type.
    ///
    /// A valid explicit override always wins. Otherwise the persona with the
    /// highest affinity for the type is chosen, ties broken by persona id
    /// ordering; an unknown type, a disabled auto-select, or no persona
    /// clearing the affinity floor all fall back to the default persona.
    pub fn select(
        &self,
        scam_type: Option<ScamType>,
        override_id: Option<&PersonaId>,
    ) -> &'static Persona {
        if let Some(id) = override_id {
            match self.catalog.get(id) {
                Some(persona) => return persona,
                None => debug!(persona_id = %id, "unknown persona override, ignoring"),
            }
        }

        if !self.auto_select {
            return self.catalog.default_persona();
        }

        let Some(scam_type) = scam_type else {
            return self.catalog.default_persona();
        };

        self.catalog
            .personas()
            .iter()
            .filter_map(|p| p.affinity_for(scam_type).map(|weight| (p, weight)))
            .filter(|(_, weight)| *weight >= self.catalog.affinity_floor())
            // Highest affinity wins; equal weights resolve to the smaller id.
            .max_by(|(a, wa), (b, wb)| wa.cmp(wb).then(b.id.cmp(&a.id)))
            .map(|(persona, _)| persona)
            .unwrap_or_else(|| self.catalog.default_persona())
    }
}

impl Default for PersonaSelector {
    fn default() -> Self {
        Self::new(true)
    }
}
