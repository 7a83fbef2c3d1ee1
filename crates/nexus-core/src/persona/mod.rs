//! Persona domain module.
//!
//! # Module Structure
//!
//! - `model`: `PersonaSlug`, `Persona`, and config-supplied `PersonaOverride`
//! - `preset`: Built-in personas shipped with the application
//! - `catalog`: Immutable lookup over presets plus overrides
//!
//! # Usage
//!
//! ```ignore
//! use nexus_core::persona::{PersonaCatalog, PersonaSlug};
//!
//! let catalog = PersonaCatalog::presets();
//! let research = catalog.get(PersonaSlug::Research);
//! ```

mod catalog;
mod model;
mod preset;

pub use catalog::PersonaCatalog;
pub use model::{Persona, PersonaOverride, PersonaSlug};
pub use preset::get_default_presets;
