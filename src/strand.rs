//! LED strand configuration and pixel buffer
//!
//! A strand is one physical chain of addressable LEDs on one controller
//! channel. Its pixel buffer does not exist until [`Strand::initialize`]
//! is called, after which it always holds exactly `num_pixels` colors.

use core::fmt;

use heapless::Vec;

use crate::color::Pixel;

const LED_NAME_WS2812_V1: &str = "ws2812_v1";
const LED_NAME_WS2812B_V1: &str = "ws2812b_v1";
const LED_NAME_WS2812B_V2: &str = "ws2812b_v2";
const LED_NAME_WS2812B_V3: &str = "ws2812b_v3";
const LED_NAME_WS2813_V1: &str = "ws2813_v1";
const LED_NAME_WS2813_V2: &str = "ws2813_v2";
const LED_NAME_WS2813_V3: &str = "ws2813_v3";
const LED_NAME_SK6812_V1: &str = "sk6812_v1";
const LED_NAME_SK6812W_V1: &str = "sk6812w_v1";

const LED_ID_WS2812_V1: u8 = 0;
const LED_ID_WS2812B_V1: u8 = 1;
const LED_ID_WS2812B_V2: u8 = 2;
const LED_ID_WS2812B_V3: u8 = 3;
const LED_ID_WS2813_V1: u8 = 4;
const LED_ID_WS2813_V2: u8 = 5;
const LED_ID_WS2813_V3: u8 = 6;
const LED_ID_SK6812_V1: u8 = 7;
const LED_ID_SK6812W_V1: u8 = 8;

/// Supported LED chemistries and timing revisions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LedType {
    Ws2812V1 = LED_ID_WS2812_V1,
    Ws2812bV1 = LED_ID_WS2812B_V1,
    Ws2812bV2 = LED_ID_WS2812B_V2,
    Ws2812bV3 = LED_ID_WS2812B_V3,
    Ws2813V1 = LED_ID_WS2813_V1,
    Ws2813V2 = LED_ID_WS2813_V2,
    Ws2813V3 = LED_ID_WS2813_V3,
    Sk6812V1 = LED_ID_SK6812_V1,
    /// RGBW variant with a separate white die
    Sk6812wV1 = LED_ID_SK6812W_V1,
}

impl LedType {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            LED_ID_WS2812_V1 => Self::Ws2812V1,
            LED_ID_WS2812B_V1 => Self::Ws2812bV1,
            LED_ID_WS2812B_V2 => Self::Ws2812bV2,
            LED_ID_WS2812B_V3 => Self::Ws2812bV3,
            LED_ID_WS2813_V1 => Self::Ws2813V1,
            LED_ID_WS2813_V2 => Self::Ws2813V2,
            LED_ID_WS2813_V3 => Self::Ws2813V3,
            LED_ID_SK6812_V1 => Self::Sk6812V1,
            LED_ID_SK6812W_V1 => Self::Sk6812wV1,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws2812V1 => LED_NAME_WS2812_V1,
            Self::Ws2812bV1 => LED_NAME_WS2812B_V1,
            Self::Ws2812bV2 => LED_NAME_WS2812B_V2,
            Self::Ws2812bV3 => LED_NAME_WS2812B_V3,
            Self::Ws2813V1 => LED_NAME_WS2813_V1,
            Self::Ws2813V2 => LED_NAME_WS2813_V2,
            Self::Ws2813V3 => LED_NAME_WS2813_V3,
            Self::Sk6812V1 => LED_NAME_SK6812_V1,
            Self::Sk6812wV1 => LED_NAME_SK6812W_V1,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            LED_NAME_WS2812_V1 => Some(Self::Ws2812V1),
            LED_NAME_WS2812B_V1 => Some(Self::Ws2812bV1),
            LED_NAME_WS2812B_V2 => Some(Self::Ws2812bV2),
            LED_NAME_WS2812B_V3 => Some(Self::Ws2812bV3),
            LED_NAME_WS2813_V1 => Some(Self::Ws2813V1),
            LED_NAME_WS2813_V2 => Some(Self::Ws2813V2),
            LED_NAME_WS2813_V3 => Some(Self::Ws2813V3),
            LED_NAME_SK6812_V1 => Some(Self::Sk6812V1),
            LED_NAME_SK6812W_V1 => Some(Self::Sk6812wV1),
            _ => None,
        }
    }

    /// Number of color channels per pixel on the wire
    pub const fn channels(self) -> u8 {
        match self {
            Self::Sk6812wV1 => 4,
            _ => 3,
        }
    }
}

/// Strand identity: controller channel and data pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrandId {
    pub channel: u8,
    pub gpio: u8,
}

/// Static configuration of one strand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrandConfig {
    /// RMT channel driving the strand
    pub channel: u8,
    /// Data GPIO
    pub gpio: u8,
    pub led_type: LedType,
    /// Brightness ceiling applied on transmission (255 = full)
    pub bright_limit: u8,
    pub num_pixels: u16,
}

impl StrandConfig {
    /// Single 20 pixel WS2812B strand on GPIO 17
    pub const DEFAULT: Self = Self {
        channel: 0,
        gpio: 17,
        led_type: LedType::Ws2812bV3,
        bright_limit: 32,
        num_pixels: 20,
    };

    pub const fn id(&self) -> StrandId {
        StrandId {
            channel: self.channel,
            gpio: self.gpio,
        }
    }
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandError {
    /// The pixel buffer has not been allocated yet
    Uninitialized,
    /// `num_pixels` exceeds the buffer capacity
    TooManyPixels { requested: u16, capacity: usize },
    /// Color type does not match the LED chemistry
    ChannelMismatch {
        led_type_channels: u8,
        color_channels: u8,
    },
}

impl fmt::Display for StrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("strand is not initialized"),
            Self::TooManyPixels {
                requested,
                capacity,
            } => write!(f, "{requested} pixels requested, capacity is {capacity}"),
            Self::ChannelMismatch {
                led_type_channels,
                color_channels,
            } => write!(
                f,
                "led type uses {led_type_channels} channels, color has {color_channels}"
            ),
        }
    }
}

impl core::error::Error for StrandError {}

/// One LED strand and its pixel buffer
///
/// `MAX_PIXELS` is the buffer capacity; the configured pixel count
/// must not exceed it.
#[derive(Debug, Clone)]
pub struct Strand<C: Pixel, const MAX_PIXELS: usize> {
    config: StrandConfig,
    pixels: Option<Vec<C, MAX_PIXELS>>,
}

impl<C: Pixel, const MAX_PIXELS: usize> Strand<C, MAX_PIXELS> {
    /// Create a strand with no pixel buffer
    pub const fn new(config: StrandConfig) -> Self {
        Self {
            config,
            pixels: None,
        }
    }

    /// Allocate the pixel buffer with every pixel off
    ///
    /// Calling this again resets the buffer.
    pub fn initialize(&mut self) -> Result<(), StrandError> {
        if self.config.led_type.channels() != C::CHANNELS {
            return Err(StrandError::ChannelMismatch {
                led_type_channels: self.config.led_type.channels(),
                color_channels: C::CHANNELS,
            });
        }

        let count = usize::from(self.config.num_pixels);
        let mut pixels = Vec::new();
        pixels
            .resize(count, C::default())
            .map_err(|()| StrandError::TooManyPixels {
                requested: self.config.num_pixels,
                capacity: MAX_PIXELS,
            })?;
        self.pixels = Some(pixels);

        Ok(())
    }

    pub const fn config(&self) -> &StrandConfig {
        &self.config
    }

    pub const fn id(&self) -> StrandId {
        self.config.id()
    }

    /// Configured number of pixels
    pub const fn pixel_count(&self) -> usize {
        self.config.num_pixels as usize
    }

    pub const fn is_initialized(&self) -> bool {
        self.pixels.is_some()
    }

    /// Pixel buffer
    pub fn pixels(&self) -> Result<&[C], StrandError> {
        self.pixels
            .as_deref()
            .ok_or(StrandError::Uninitialized)
    }

    /// Mutable pixel buffer
    pub fn pixels_mut(&mut self) -> Result<&mut [C], StrandError> {
        self.pixels
            .as_deref_mut()
            .ok_or(StrandError::Uninitialized)
    }
}
