use super::model::{Persona, PersonaOverride, PersonaSlug};
use super::preset::get_default_presets;
use crate::error::{NexusError, Result};

/// Read-only persona lookup, fixed at construction.
///
/// Always contains the orchestrator persona.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    orchestrator: usize,
}

impl PersonaCatalog {
    /// Builds a catalog from explicit entries. Later duplicates replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = Persona>) -> Result<Self> {
        let mut personas: Vec<Persona> = Vec::new();
        for persona in entries {
            match personas.iter_mut().find(|p| p.slug == persona.slug) {
                Some(existing) => *existing = persona,
                None => personas.push(persona),
            }
        }
        let orchestrator = personas
            .iter()
            .position(|p| p.slug.is_orchestrator())
            .ok_or_else(|| NexusError::config("persona catalog has no orchestrator persona"))?;
        Ok(Self {
            personas,
            orchestrator,
        })
    }

    /// The built-in presets, unmodified.
    pub fn presets() -> Self {
        let personas = get_default_presets();
        let orchestrator = personas
            .iter()
            .position(|p| p.slug.is_orchestrator())
            .unwrap_or_default();
        Self {
            personas,
            orchestrator,
        }
    }

    /// Presets with `[[persona]]` overrides applied.
    pub fn with_overrides(overrides: &[PersonaOverride]) -> Result<Self> {
        let mut personas = get_default_presets();
        for patch in overrides {
            match personas.iter_mut().find(|p| p.slug == patch.slug) {
                Some(existing) => existing.apply(patch),
                None => personas.push(Self::persona_from_override(patch)?),
            }
        }
        Self::new(personas)
    }

    fn persona_from_override(patch: &PersonaOverride) -> Result<Persona> {
        let (Some(name), Some(system_instruction)) = (&patch.name, &patch.system_instruction)
        else {
            return Err(NexusError::config(format!(
                "persona '{}' has no preset; `name` and `system_instruction` are required",
                patch.slug
            )));
        };
        Ok(Persona {
            slug: patch.slug,
            name: name.clone(),
            icon: patch.icon.clone().unwrap_or_default(),
            description: patch.description.clone().unwrap_or_default(),
            system_instruction: system_instruction.clone(),
            use_cases: patch.use_cases.clone().unwrap_or_default(),
        })
    }

    pub fn get(&self, slug: PersonaSlug) -> Option<&Persona> {
        self.personas.iter().find(|p| p.slug == slug)
    }

    pub fn contains(&self, slug: PersonaSlug) -> bool {
        self.get(slug).is_some()
    }

    pub fn orchestrator(&self) -> &Persona {
        &self.personas[self.orchestrator]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::presets()
    }
}
