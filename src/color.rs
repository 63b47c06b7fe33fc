use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::trend::TrendDirection;

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
// Program → Color32
// ---------------------------------------------------------------------------

/// One stable colour per program, shared by the line and bar charts.
///
/// Built from the full table so a program keeps its colour when filters change.
#[derive(Debug, Clone, Default)]
pub struct ProgramColors {
    mapping: BTreeMap<String, Color32>,
}

impl ProgramColors {
    pub fn new(programs: &BTreeSet<String>) -> Self {
        let palette = generate_palette(programs.len());
        let mapping = programs.iter().cloned().zip(palette).collect();
        ProgramColors { mapping }
    }

    pub fn color_for(&self, program: &str) -> Color32 {
        self.mapping.get(program).copied().unwrap_or(Color32::GRAY)
    }
}

/// Text colour for an insight line.
pub fn direction_color(direction: TrendDirection) -> Color32 {
    match direction {
        TrendDirection::Improved => Color32::from_rgb(0x4C, 0xAF, 0x50),
        TrendDirection::Worsened => Color32::from_rgb(0xE5, 0x39, 0x35),
        TrendDirection::Stable => Color32::from_rgb(0xFF, 0x8C, 0x00),
        TrendDirection::InsufficientData => Color32::GRAY,
    }
}
