/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 22;

/// Generate tray icon pixel data.
/// Returns RGBA for a filled circle: green when the current intensity is
/// below the alert threshold, dark gray otherwise (including unknown).
pub fn generate_tray_icon(below_threshold: bool) -> Vec<u8> {
    let size = ICON_SIZE;
    let mut rgba = vec![0u8; (size * size * 4) as usize];

    // Green reads as "cleaner than your threshold"; the gray works in
    // both light and dark menu bars.
    let (red, green, blue) = if below_threshold {
        (52.0, 168.0, 83.0)
    } else {
        (80.0, 80.0, 80.0)
    };

    let center = size as f32 / 2.0;
    let radius = size as f32 / 2.0 - 2.0;

    for y in 0..size {
        for x in 0..size {
            let idx = ((y * size + x) * 4) as usize;

            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist <= radius {
                let alpha = if dist > radius - 1.5 {
                    // Anti-aliasing edge
                    ((radius - dist) / 1.5).clamp(0.0, 1.0)
                } else {
                    1.0
                };

                rgba[idx] = (red * alpha) as u8;
                rgba[idx + 1] = (green * alpha) as u8;
                rgba[idx + 2] = (blue * alpha) as u8;
                rgba[idx + 3] = (255.0 * alpha) as u8;
            }
        }
    }

    rgba
}
