//! Tray icon artwork, rendered into a 32×32 RGBA buffer.
//!
//! The glyph is a white mouse outline (body, button split and wheel line)
//! with a status dot in the lower-right corner: forest green when
//! acceleration is on, red when it is off, ringed in black.  Rendering is
//! plain pixel math so it can be tested anywhere; the Windows tray turns the
//! buffer into an `HICON`.

use accel_core::ToggleState;

/// Width and height of the icon in pixels.
pub const ICON_SIZE: usize = 32;

pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];
pub const WHITE: Rgba = [255, 255, 255, 255];
pub const BLACK: Rgba = [0, 0, 0, 255];
pub const RED: Rgba = [255, 0, 0, 255];
pub const FOREST_GREEN: Rgba = [34, 139, 34, 255];

/// Mouse outline as line segments `(x0, y0, x1, y1)`.
const OUTLINE: [(f32, f32, f32, f32); 10] = [
    (8.0, 4.0, 24.0, 4.0),
    (6.0, 6.0, 8.0, 4.0),
    (24.0, 4.0, 26.0, 6.0),
    (6.0, 6.0, 6.0, 24.0),
    (26.0, 6.0, 26.0, 24.0),
    (6.0, 16.0, 26.0, 16.0),
    (16.0, 4.0, 16.0, 16.0),
    (6.0, 24.0, 8.0, 28.0),
    (26.0, 24.0, 24.0, 28.0),
    (8.0, 28.0, 24.0, 28.0),
];

/// Status dot: centre and radius, plus the width of its ring.
const DOT_CENTER: (f32, f32) = (23.5, 23.5);
const DOT_RADIUS: f32 = 7.5;
const RING_WIDTH: f32 = 2.0;

/// A square RGBA image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pixels: Vec<u8>,
}

impl IconImage {
    fn blank() -> Self {
        Self {
            pixels: vec![0; ICON_SIZE * ICON_SIZE * 4],
        }
    }

    /// Colour at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= ICON_SIZE || y >= ICON_SIZE {
            return None;
        }
        let i = (y * ICON_SIZE + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= ICON_SIZE || y as usize >= ICON_SIZE {
            return;
        }
        let i = (y as usize * ICON_SIZE + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels in the BGRA order expected by 32-bit GDI bitmaps.
    pub fn to_bgra(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect()
    }

    /// Draws a 2px-wide line.
    fn line(&mut self, (x0, y0, x1, y1): (f32, f32, f32, f32), color: Rgba) {
        let steps = ((x1 - x0).abs().max((y1 - y0).abs()) * 4.0).ceil().max(1.0) as i32;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let x = (x0 + (x1 - x0) * t).round() as i32;
            let y = (y0 + (y1 - y0) * t).round() as i32;
            for (dx, dy) in [(-1, -1), (0, -1), (-1, 0), (0, 0)] {
                self.set(x + dx, y + dy, color);
            }
        }
    }

    /// Fills a disc and strokes its edge with a ring.
    fn dot(&mut self, fill: Rgba, ring: Rgba) {
        let (cx, cy) = DOT_CENTER;
        let inner = DOT_RADIUS - RING_WIDTH / 2.0;
        let outer = DOT_RADIUS + RING_WIDTH / 2.0;
        for y in 0..ICON_SIZE as i32 {
            for x in 0..ICON_SIZE as i32 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= outer && d >= inner {
                    self.set(x, y, ring);
                } else if d < inner {
                    self.set(x, y, fill);
                }
            }
        }
    }
}

/// Status dot colour for `state`.
pub fn status_color(state: ToggleState) -> Rgba {
    match state {
        ToggleState::Enabled => FOREST_GREEN,
        ToggleState::Disabled => RED,
    }
}

/// Renders the tray icon for `state`.
pub fn render_icon(state: ToggleState) -> IconImage {
    let mut image = IconImage::blank();
    for segment in OUTLINE {
        image.line(segment, WHITE);
    }
    image.dot(status_color(state), BLACK);
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_icon_has_expected_dimensions() {
        let image = render_icon(ToggleState::Enabled);
        assert_eq!(image.as_rgba().len(), ICON_SIZE * ICON_SIZE * 4);
        assert_eq!(image.pixel(ICON_SIZE, 0), None);
    }

    #[test]
    fn test_dot_centre_uses_state_colour() {
        let on = render_icon(ToggleState::Enabled);
        let off = render_icon(ToggleState::Disabled);
        assert_eq!(on.pixel(23, 23), Some(FOREST_GREEN));
        assert_eq!(off.pixel(23, 23), Some(RED));
    }

    #[test]
    fn test_dot_has_black_ring() {
        let image = render_icon(ToggleState::Enabled);
        // Directly above the centre, on the ring radius.
        assert_eq!(image.pixel(23, 16), Some(BLACK));
    }

    #[test]
    fn test_outline_is_white_and_background_transparent() {
        let image = render_icon(ToggleState::Disabled);
        assert_eq!(image.pixel(12, 4), Some(WHITE), "top edge of the mouse body");
        assert_eq!(image.pixel(6, 10), Some(WHITE), "left side of the mouse body");
        assert_eq!(image.pixel(0, 0), Some(TRANSPARENT));
        assert_eq!(image.pixel(0, 31), Some(TRANSPARENT));
    }

    #[test]
    fn test_states_render_different_images() {
        assert_ne!(
            render_icon(ToggleState::Enabled),
            render_icon(ToggleState::Disabled)
        );
    }

    #[test]
    fn test_to_bgra_swaps_red_and_blue() {
        let image = render_icon(ToggleState::Disabled);
        let bgra = image.to_bgra();
        let i = (23 * ICON_SIZE + 23) * 4;
        assert_eq!(&bgra[i..i + 4], &[0, 0, 255, 255]);
    }
}
