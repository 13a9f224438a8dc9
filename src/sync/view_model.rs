use std::rc::Rc;

use crate::prediction::PocketDescriptor;
use crate::selection::SelectionEntry;

/// One row of the pocket list, in rank order.
///
/// Everything except `is_visible` is fixed when the structure is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PocketViewModel {
    /// The pocket this row describes.
    pub pocket: Rc<PocketDescriptor>,
    /// Average conservation, three decimals or `"N/A"`.
    pub conservation_score: String,
    /// Average AlphaFold confidence, three decimals or `"N/A"`.
    pub plddt_score: String,
    /// Whether the pocket is shown.
    pub is_visible: bool,
    /// Cached selection for this pocket.
    pub selection: Rc<SelectionEntry>,
}

impl PocketViewModel {
    /// Pocket name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.pocket.name
    }

    /// Copy of this row with a different visibility.
    #[must_use]
    pub fn with_visibility(&self, is_visible: bool) -> Self {
        Self {
            is_visible,
            ..self.clone()
        }
    }
}
