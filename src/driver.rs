//! Strand driver boundary
//!
//! The driver owns the hardware side: it prepares strands for output and
//! transmits a strand's pixel buffer on request. Rendering never talks to
//! hardware directly.

use core::fmt;

use smart_leds::SmartLedsWrite;

use crate::color::Pixel;
use crate::strand::{Strand, StrandError, StrandId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The strand could not be prepared or read
    Strand(StrandError),
    /// The driver has no output bound to this strand
    UnknownStrand(StrandId),
    /// The hardware rejected or aborted the transmission
    Transmit,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strand(err) => write!(f, "strand error: {err}"),
            Self::UnknownStrand(id) => write!(
                f,
                "no output for strand on channel {} gpio {}",
                id.channel, id.gpio
            ),
            Self::Transmit => f.write_str("transmission failed"),
        }
    }
}

impl core::error::Error for DriverError {}

impl From<StrandError> for DriverError {
    fn from(err: StrandError) -> Self {
        Self::Strand(err)
    }
}

/// Abstract strand driver
///
/// Implement this trait to support different hardware platforms.
pub trait StrandDriver<C: Pixel> {
    /// Prepare every strand for output
    ///
    /// The default implementation allocates each strand's pixel buffer.
    fn initialize<const MAX_PIXELS: usize>(
        &mut self,
        strands: &mut [Strand<C, MAX_PIXELS>],
    ) -> Result<(), DriverError> {
        for strand in strands {
            strand.initialize()?;
        }
        Ok(())
    }

    /// Transmit the strand's pixel buffer to the LEDs
    fn update_pixels<const MAX_PIXELS: usize>(
        &mut self,
        strand: &Strand<C, MAX_PIXELS>,
    ) -> Result<(), DriverError>;
}

/// Driver backed by a `smart-leds` writer
///
/// The writer is bound to a single strand; any RMT or SPI adapter that
/// implements [`SmartLedsWrite`] can be used. Colors are scaled by the
/// strand's brightness ceiling on the way out, the buffer itself is left
/// untouched.
pub struct SmartLedsDriver<W> {
    strand: StrandId,
    writer: W,
}

impl<W: SmartLedsWrite> SmartLedsDriver<W> {
    pub const fn new(strand: StrandId, writer: W) -> Self {
        Self { strand, writer }
    }

    pub const fn strand(&self) -> StrandId {
        self.strand
    }

    /// Get a reference to the underlying writer
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<C, W> StrandDriver<C> for SmartLedsDriver<W>
where
    C: Pixel + Into<W::Color>,
    W: SmartLedsWrite,
{
    fn update_pixels<const MAX_PIXELS: usize>(
        &mut self,
        strand: &Strand<C, MAX_PIXELS>,
    ) -> Result<(), DriverError> {
        if strand.id() != self.strand {
            return Err(DriverError::UnknownStrand(strand.id()));
        }

        let limit = strand.config().bright_limit;
        let pixels = strand.pixels()?;
        self.writer
            .write(pixels.iter().map(|pixel| pixel.scaled(limit)))
            .map_err(|_| DriverError::Transmit)
    }
}
