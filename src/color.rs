use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use thermo_panda::data::{Dataset, GroupKey};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group → Color32
// ---------------------------------------------------------------------------

/// Stable colour per group, so a location keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<GroupKey, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// One colour per location, plus the ungrouped and unlabelled series.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let keys: Vec<GroupKey> = std::iter::once(GroupKey::All)
            .chain(dataset.locations.iter().cloned().map(GroupKey::Location))
            .chain(std::iter::once(GroupKey::Unlabelled))
            .collect();
        let palette = generate_palette(keys.len());

        ColorMap {
            mapping: keys.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given group.
    pub fn color_for(&self, key: &GroupKey) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}
