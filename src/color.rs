//! Pixel color values
//!
//! Colors are plain `smart-leds` values: three channels for RGB chemistries
//! and four channels for strands with a dedicated white die.

use smart_leds::{RGB8, RGBW, White};

use crate::math8::scale8;

pub type Rgb = RGB8;
pub type Rgbw = RGBW<u8>;

/// A color value that can be stored in a strand pixel buffer
pub trait Pixel: Copy + Default + PartialEq + core::fmt::Debug {
    /// Number of 8-bit channels transmitted per pixel
    const CHANNELS: u8;

    /// Scale every channel by `limit` (255 keeps the color as is)
    #[must_use]
    fn scaled(self, limit: u8) -> Self;
}

impl Pixel for Rgb {
    const CHANNELS: u8 = 3;

    fn scaled(self, limit: u8) -> Self {
        Rgb {
            r: scale8(self.r, limit),
            g: scale8(self.g, limit),
            b: scale8(self.b, limit),
        }
    }
}

impl Pixel for Rgbw {
    const CHANNELS: u8 = 4;

    fn scaled(self, limit: u8) -> Self {
        Rgbw {
            r: scale8(self.r, limit),
            g: scale8(self.g, limit),
            b: scale8(self.b, limit),
            a: White(scale8(self.a.0, limit)),
        }
    }
}

/// Build a pixel color from its red, green and blue components
pub const fn pixel_from_rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

/// Build a pixel color for RGBW strands
pub const fn pixel_from_rgbw(r: u8, g: u8, b: u8, w: u8) -> Rgbw {
    Rgbw { r, g, b, a: White(w) }
}
