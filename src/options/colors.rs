use serde::{Deserialize, Serialize};

/// Default pocket palette: the colour-blind-safe Wong scheme with red first.
const DEFAULT_POCKET_PALETTE: [&str; 7] = [
    "CE0000", "F0E442", "E69F00", "56B4E9", "009E73", "0072B2", "DA74AD",
];

/// Color palette options for pocket overlays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorOptions {
    /// Pocket palette as `RRGGBB` hex strings. Pocket `i` uses entry
    /// `i mod len`.
    pub pocket_palette: Vec<String>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            pocket_palette: DEFAULT_POCKET_PALETTE
                .iter()
                .map(|&c| c.to_owned())
                .collect(),
        }
    }
}

impl ColorOptions {
    /// Number of palette entries; never zero.
    #[must_use]
    pub fn palette_size(&self) -> usize {
        self.pocket_palette.len().max(1)
    }

    /// RGB for a palette color index (1-based, as stored in color mappings).
    /// Returns `None` for the baseline index or an undecodable entry.
    #[must_use]
    pub fn pocket_rgb(&self, color_index: u32) -> Option<[f32; 3]> {
        let slot = (color_index as usize).checked_sub(1)?;
        parse_hex(self.pocket_palette.get(slot)?)
    }
}

fn parse_hex(hex: &str) -> Option<[f32; 3]> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let channel = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;
    Some([channel(16), channel(8), channel(0)])
}
