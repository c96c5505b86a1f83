//! Display loop
//!
//! Renders a mask onto one strand, flushes it, sleeps for a fixed interval
//! and repeats. The strand buffer is owned by the loop for its whole life,
//! so rendering, transmission and the next mask update never interleave.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::clock::{SystemClock, UtcOffset, log_time};
use crate::color::Pixel;
use crate::delay::sleep;
use crate::driver::StrandDriver;
use crate::mask::{Mask, MaskError, apply_mask};
use crate::strand::{Strand, StrandError};

/// Default pause between frames
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// How the mask changes between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    /// Keep the mask as is
    #[default]
    Hold,
    /// Move every lit pixel one position up, wrapping at the end
    ChaseForward,
    /// Move every lit pixel one position down, wrapping at pixel 0
    ChaseBackward,
    /// Swap lit and unlit pixels
    Blink,
}

/// Display loop configuration
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig<C> {
    pub color_on: C,
    pub color_off: C,
    /// Pause after each flushed frame
    pub interval: Duration,
    pub animation: Animation,
}

impl<C: Copy> DisplayConfig<C> {
    /// Static mask redrawn every [`DEFAULT_INTERVAL`]
    pub const fn new(color_on: C, color_off: C) -> Self {
        Self {
            color_on,
            color_off,
            interval: DEFAULT_INTERVAL,
            animation: Animation::Hold,
        }
    }

    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Counters kept by the display loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered so far
    pub frames: u32,
    /// Frames whose transmission failed
    pub failed_flushes: u32,
}

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Buffer rendered and transmitted
    Flushed,
    /// Visual update skipped, the loop keeps going
    Skipped,
}

/// Mask display loop for one strand
///
/// M is the mask capacity.
pub struct DisplayLoop<'a, C, D, const MAX_PIXELS: usize, const M: usize>
where
    C: Pixel,
    D: StrandDriver<C>,
{
    strand: &'a mut Strand<C, MAX_PIXELS>,
    driver: D,
    mask: Mask<M>,
    config: DisplayConfig<C>,
    stats: FrameStats,
}

impl<'a, C, D, const MAX_PIXELS: usize, const M: usize> DisplayLoop<'a, C, D, MAX_PIXELS, M>
where
    C: Pixel,
    D: StrandDriver<C>,
{
    /// Create a display loop
    ///
    /// Fails if the strand is not initialized or the mask length differs
    /// from the strand's pixel count.
    pub fn new(
        strand: &'a mut Strand<C, MAX_PIXELS>,
        driver: D,
        mask: Mask<M>,
        config: DisplayConfig<C>,
    ) -> Result<Self, MaskError> {
        check_mask(strand, &mask)?;
        Ok(Self {
            strand,
            driver,
            mask,
            config,
            stats: FrameStats::default(),
        })
    }

    /// Render the current mask and transmit it
    ///
    /// Transmission errors are logged and counted, never returned.
    pub fn render_frame(&mut self) -> FrameOutcome {
        self.stats.frames = self.stats.frames.wrapping_add(1);

        if let Err(err) = apply_mask(
            self.strand,
            self.mask.as_slice(),
            self.config.color_on,
            self.config.color_off,
        ) {
            log!("display: render failed: {}", err);
            return FrameOutcome::Skipped;
        }

        match self.driver.update_pixels(self.strand) {
            Ok(()) => FrameOutcome::Flushed,
            Err(err) => {
                self.stats.failed_flushes = self.stats.failed_flushes.wrapping_add(1);
                log!("display: flush failed: {}", err);
                FrameOutcome::Skipped
            }
        }
    }

    /// Update the mask for the next frame
    pub fn advance(&mut self) {
        match self.config.animation {
            Animation::Hold => {}
            Animation::ChaseForward => self.mask.rotate_forward(),
            Animation::ChaseBackward => self.mask.rotate_backward(),
            Animation::Blink => self.mask.invert(),
        }
    }

    /// Replace the mask shown from the next frame on
    pub fn set_mask(&mut self, mask: Mask<M>) -> Result<(), MaskError> {
        check_mask(self.strand, &mask)?;
        self.mask = mask;
        Ok(())
    }

    pub const fn mask(&self) -> &Mask<M> {
        &self.mask
    }

    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    pub const fn config(&self) -> &DisplayConfig<C> {
        &self.config
    }

    pub fn strand(&self) -> &Strand<C, MAX_PIXELS> {
        self.strand
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the loop forever
    ///
    /// Each iteration renders, flushes, sleeps for the configured interval
    /// and only then advances the mask.
    pub async fn run<Dl: DelayNs>(&mut self, delay: &mut Dl) -> ! {
        self.log_start();
        loop {
            self.render_frame();
            sleep(delay, self.config.interval).await;
            self.advance();
        }
    }

    /// Run the loop forever, logging the local time every `log_every`
    ///
    /// The clock is read before the first frame and then whenever
    /// `log_every` worth of frame intervals has passed.
    pub async fn run_with_clock<Dl, Clk>(
        &mut self,
        delay: &mut Dl,
        clock: &Clk,
        offset: UtcOffset,
        log_every: Duration,
    ) -> !
    where
        Dl: DelayNs,
        Clk: SystemClock,
    {
        self.log_start();
        let frames_per_log = frames_per(log_every, self.config.interval);
        let mut until_log = 0;
        loop {
            if until_log == 0 {
                log_time(clock, offset);
                until_log = frames_per_log;
            }
            until_log -= 1;

            self.render_frame();
            sleep(delay, self.config.interval).await;
            self.advance();
        }
    }

    fn log_start(&self) {
        log!(
            "display: running {} pixel(s) every {} us",
            self.strand.pixel_count(),
            self.config.interval.as_micros()
        );
    }
}

/// Number of frames covering `span`, at least one
fn frames_per(span: Duration, interval: Duration) -> u32 {
    let frames = span.as_micros() / interval.as_micros().max(1);
    u32::try_from(frames).unwrap_or(u32::MAX).max(1)
}

fn check_mask<C: Pixel, const MAX_PIXELS: usize, const M: usize>(
    strand: &Strand<C, MAX_PIXELS>,
    mask: &Mask<M>,
) -> Result<(), MaskError> {
    if !strand.is_initialized() {
        return Err(MaskError::Strand(StrandError::Uninitialized));
    }
    if mask.len() != strand.pixel_count() {
        return Err(MaskError::LengthMismatch {
            expected: strand.pixel_count(),
            actual: mask.len(),
        });
    }
    Ok(())
}
