//! Pixel masks and mask rendering
//!
//! A mask holds one flag per pixel. Rendering writes the "on" color to every
//! flagged pixel and the "off" color to every other pixel, replacing the
//! whole buffer each time. Nothing is transmitted here.

use core::fmt;

use heapless::Vec;

use crate::color::Pixel;
use crate::strand::{Strand, StrandError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskError {
    /// Mask length differs from the number of pixels
    LengthMismatch { expected: usize, actual: usize },
    /// Mask does not fit into its storage
    TooLong { len: usize, capacity: usize },
    IndexOutOfRange { index: usize, len: usize },
    Strand(StrandError),
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "mask has {actual} flags, strand has {expected} pixels")
            }
            Self::TooLong { len, capacity } => {
                write!(f, "mask of {len} flags exceeds capacity {capacity}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for mask of {len} flags")
            }
            Self::Strand(err) => write!(f, "strand error: {err}"),
        }
    }
}

impl core::error::Error for MaskError {}

impl From<StrandError> for MaskError {
    fn from(err: StrandError) -> Self {
        Self::Strand(err)
    }
}

/// Per-pixel on/off flags
///
/// N is the maximum number of flags the mask can hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask<const N: usize> {
    flags: Vec<bool, N>,
}

impl<const N: usize> Mask<N> {
    /// Create a mask of `len` flags, all off
    pub fn new(len: usize) -> Result<Self, MaskError> {
        let mut flags = Vec::new();
        flags
            .resize(len, false)
            .map_err(|()| MaskError::TooLong { len, capacity: N })?;
        Ok(Self { flags })
    }

    pub fn from_slice(flags: &[bool]) -> Result<Self, MaskError> {
        let flags = Vec::from_slice(flags).map_err(|()| MaskError::TooLong {
            len: flags.len(),
            capacity: N,
        })?;
        Ok(Self { flags })
    }

    /// Create a mask of `len` flags with the given indices switched on
    pub fn with_lit(len: usize, indices: &[usize]) -> Result<Self, MaskError> {
        let mut mask = Self::new(len)?;
        for &index in indices {
            mask.set(index, true)?;
        }
        Ok(mask)
    }

    /// Create a mask with exactly one pixel on
    pub fn single(len: usize, index: usize) -> Result<Self, MaskError> {
        Self::with_lit(len, &[index])
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.flags.get(index).copied()
    }

    pub fn set(&mut self, index: usize, lit: bool) -> Result<(), MaskError> {
        let len = self.flags.len();
        let flag = self
            .flags
            .get_mut(index)
            .ok_or(MaskError::IndexOutOfRange { index, len })?;
        *flag = lit;
        Ok(())
    }

    /// Number of pixels switched on
    pub fn count_lit(&self) -> usize {
        self.flags.iter().filter(|lit| **lit).count()
    }

    /// Flip every flag in place
    pub fn invert(&mut self) {
        for flag in &mut self.flags {
            *flag = !*flag;
        }
    }

    /// Logical complement of this mask
    #[must_use]
    pub fn complement(&self) -> Self {
        let mut mask = self.clone();
        mask.invert();
        mask
    }

    /// Move every flag one pixel up, the last flag wraps to pixel 0
    pub fn rotate_forward(&mut self) {
        if !self.flags.is_empty() {
            self.flags.rotate_right(1);
        }
    }

    /// Move every flag one pixel down, pixel 0 wraps to the end
    pub fn rotate_backward(&mut self) {
        if !self.flags.is_empty() {
            self.flags.rotate_left(1);
        }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }
}

impl<const N: usize> AsRef<[bool]> for Mask<N> {
    fn as_ref(&self) -> &[bool] {
        &self.flags
    }
}

/// Space separated `0`/`1` dump, one digit per pixel
impl<const N: usize> fmt::Display for Mask<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lit) in self.flags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(if *lit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Write `on` to every flagged pixel and `off` to the rest
///
/// The mask must have exactly one flag per pixel; on mismatch nothing
/// is written.
pub fn render_mask<C: Copy>(pixels: &mut [C], mask: &[bool], on: C, off: C) -> Result<(), MaskError> {
    if mask.len() != pixels.len() {
        return Err(MaskError::LengthMismatch {
            expected: pixels.len(),
            actual: mask.len(),
        });
    }

    for (pixel, lit) in pixels.iter_mut().zip(mask) {
        *pixel = if *lit { on } else { off };
    }
    Ok(())
}

/// Render a mask into the strand's pixel buffer
pub fn apply_mask<C: Pixel, const MAX_PIXELS: usize>(
    strand: &mut Strand<C, MAX_PIXELS>,
    mask: &[bool],
    on: C,
    off: C,
) -> Result<(), MaskError> {
    render_mask(strand.pixels_mut()?, mask, on, off)
}
