//! Viewer options with TOML preset support.
//!
//! Representation modes, baseline coloring, the pocket palette and score
//! aggregation policy are consolidated here. Options serialize to/from TOML
//! so a viewer can restore its last configuration or ship named presets.

mod colors;
mod conservation;
mod display;

use std::path::Path;

pub use colors::ColorOptions;
pub use conservation::{ConservationOptions, MissingResidue};
pub use display::{DisplayOptions, PocketsView, PolymerColor, PolymerView};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PocketViewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[display]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Representation and coloring modes.
    pub display: DisplayOptions,
    /// Pocket palette.
    #[schemars(skip)]
    pub colors: ColorOptions,
    /// Score aggregation.
    pub conservation: ConservationOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, PocketViewError> {
        let content =
            std::fs::read_to_string(path).map_err(PocketViewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| PocketViewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PocketViewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PocketViewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PocketViewError::Io)?;
        }
        std::fs::write(path, content).map_err(PocketViewError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
polymer_view = "cartoon"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.display.polymer_view, PolymerView::Cartoon);
        // Everything else should be default
        assert_eq!(opts.display.pockets_view, PocketsView::Surface);
        assert_eq!(opts.display.polymer_color, PolymerColor::Conservation);
        assert_eq!(opts.colors.palette_size(), 7);
        assert_eq!(opts.conservation.missing_residue, MissingResidue::Skip);
    }

    #[test]
    fn palette_lookup() {
        let colors = ColorOptions::default();
        assert_eq!(colors.pocket_rgb(1), Some([206.0 / 255.0, 0.0, 0.0]));
        assert_eq!(colors.pocket_rgb(0), None);
        assert_eq!(colors.pocket_rgb(8), None);

        let empty = ColorOptions {
            pocket_palette: vec![],
        };
        assert_eq!(empty.palette_size(), 1);
    }

    #[test]
    fn save_then_load_preset() {
        let dir = std::env::temp_dir()
            .join(format!("pocketview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.display.show_only_confident = true;
        opts.conservation.missing_residue = MissingResidue::FailPocket;
        opts.save(&dir.join("confident.toml")).unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["confident".to_owned()]);
        let loaded = Options::load(&dir.join("confident.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("conservation"));
        // Palette is edited as a preset file, not through the UI
        assert!(!props.contains_key("colors"));

        let display = &props["display"]["properties"];
        assert!(display.get("polymer_view").is_some());
        assert!(display.get("show_only_confident").is_some());
    }
}
