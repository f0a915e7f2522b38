//! Color values exchanged between the pipette, previews and surfaces.

use image::Rgba;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// An RGBA8 color sampled from a screen snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SampledColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SampledColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Hex notation without alpha, e.g. `#FF8000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgba<u8>> for SampledColor {
    fn from(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }
}

impl From<SampledColor> for Rgba<u8> {
    fn from(color: SampledColor) -> Self {
        Rgba([color.r, color.g, color.b, color.a])
    }
}

impl From<Color> for SampledColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SampledColor> for Color {
    fn from(color: SampledColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}
