//! Scene reference names shared by the synchronization core and engines.

use super::EntityRef;
use crate::prediction::PocketDescriptor;

/// Whole-structure atoms (ball-and-stick) representation.
pub const POLYMER_ATOMS: &str = "polymer-atoms";
/// Whole-structure molecular surface.
pub const POLYMER_SURFACE: &str = "polymer-surface";
/// Whole-structure cartoon.
pub const POLYMER_CARTOON: &str = "polymer-cartoon";
/// Atoms representation restricted to confidently predicted residues.
pub const CONFIDENT_ATOMS: &str = "polymer-confident-atoms";
/// Surface restricted to confidently predicted residues.
pub const CONFIDENT_SURFACE: &str = "polymer-confident-surface";
/// Cartoon restricted to confidently predicted residues.
pub const CONFIDENT_CARTOON: &str = "polymer-confident-cartoon";

/// Root entity of a pocket. Its reference is the pocket name, so engine
/// notifications can be matched back to a pocket by name.
#[must_use]
pub fn pocket_root(pocket: &PocketDescriptor) -> EntityRef {
    EntityRef::new(pocket.name.as_str())
}

/// Atoms visual beneath a pocket root.
#[must_use]
pub fn pocket_atoms(pocket: &PocketDescriptor) -> EntityRef {
    EntityRef::new(format!("{}-atoms-visual", pocket.name))
}

/// Surface visual beneath a pocket root.
#[must_use]
pub fn pocket_surface(pocket: &PocketDescriptor) -> EntityRef {
    EntityRef::new(format!("{}-surface-visual", pocket.name))
}
