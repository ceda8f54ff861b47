use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Airline → Color32
// ---------------------------------------------------------------------------

/// Stable colour per airline across every selection.
#[derive(Debug, Clone)]
pub struct AirlineColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl AirlineColors {
    /// Assign palette entries to `airlines` in the given order.
    pub fn new(airlines: &[String]) -> Self {
        let mapping = airlines
            .iter()
            .cloned()
            .zip(generate_palette(airlines.len()))
            .collect();
        AirlineColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, airline: &str) -> Color32 {
        self.mapping
            .get(airline)
            .copied()
            .unwrap_or(self.default_color)
    }
}

impl Default for AirlineColors {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn unknown_airlines_get_the_default() {
        let colors = AirlineColors::new(&["Indigo".to_string(), "Vistara".to_string()]);
        assert_ne!(colors.color_for("Indigo"), colors.color_for("Vistara"));
        assert_eq!(colors.color_for("Nope"), Color32::GRAY);
    }
}
