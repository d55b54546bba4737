use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::state::Role;

// ---------------------------------------------------------------------------
// Role accent colors
// ---------------------------------------------------------------------------

/// Accent color for each role's dashboard header and primary chart.
pub fn role_color(role: Role) -> Color32 {
    match role {
        Role::Athlete => Color32::from_rgb(0x1f, 0x77, 0xb4),
        Role::Coach => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        Role::Trainer => Color32::from_rgb(0xff, 0x7f, 0x0e),
        Role::TeamDoctor => Color32::from_rgb(0xd6, 0x27, 0x28),
    }
}

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues. Used by
/// multi-series charts (sleep stages, systolic/diastolic, heart-rate zones).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_and_sized() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let mut dedup = colors.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), 5);
        assert!(generate_palette(0).is_empty());
    }
}
