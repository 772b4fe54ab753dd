use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{ClassId, CLASS_RANGE};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.65);
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
// Class colours
// ---------------------------------------------------------------------------

/// Fixed colour per class so a class keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct ClassColors {
    colors: Vec<Color32>,
}

impl Default for ClassColors {
    fn default() -> Self {
        let n = (CLASS_RANGE.end() - CLASS_RANGE.start() + 1) as usize;
        Self {
            colors: generate_palette(n),
        }
    }
}

impl ClassColors {
    pub fn color_for(&self, class_id: ClassId) -> Color32 {
        let idx = usize::from(class_id.get()) - *CLASS_RANGE.start() as usize;
        self.colors.get(idx).copied().unwrap_or(Color32::GRAY)
    }
}
