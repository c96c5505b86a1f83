//! Clock application wiring
//!
//! Startup order: initialize the strands, set the clock over NTP if it
//! looks unset, then hand the first strand to the display loop for good.
//! The running loop logs the local time every [`TIME_LOG_INTERVAL`].

use core::convert::Infallible;
use core::fmt;

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::clock::{ClockSyncConfig, SyncOutcome, SystemClock, refresh_if_unset};
use crate::color::Pixel;
use crate::display::{DisplayConfig, DisplayLoop};
use crate::driver::{DriverError, StrandDriver};
use crate::mask::{Mask, MaskError};
use crate::net::{ConnectivityFlag, NetworkLink};
use crate::strand::Strand;

/// How often the running clock logs the local time
pub const TIME_LOG_INTERVAL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    Driver(DriverError),
    Mask(MaskError),
    /// No strand was configured
    NoStrands,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(err) => write!(f, "driver error: {err}"),
            Self::Mask(err) => write!(f, "mask error: {err}"),
            Self::NoStrands => f.write_str("no strands configured"),
        }
    }
}

impl core::error::Error for StartupError {}

impl From<DriverError> for StartupError {
    fn from(err: DriverError) -> Self {
        Self::Driver(err)
    }
}

impl From<MaskError> for StartupError {
    fn from(err: MaskError) -> Self {
        Self::Mask(err)
    }
}

/// Everything needed to set the system clock
pub struct TimeSource<'a, N, C> {
    pub network: &'a mut N,
    pub connectivity: &'a ConnectivityFlag,
    pub clock: &'a C,
    pub config: ClockSyncConfig,
}

impl<N: NetworkLink, C: SystemClock> TimeSource<'_, N, C> {
    /// Set the clock over NTP unless it already looks valid
    pub async fn refresh<D: DelayNs>(&mut self, delay: &mut D) -> SyncOutcome {
        refresh_if_unset(
            self.network,
            self.connectivity,
            self.clock,
            delay,
            &self.config,
        )
        .await
    }
}

/// Initialize all strands and build the display loop for the first one
pub fn prepare_display<'a, C, D, const MAX_PIXELS: usize, const M: usize>(
    strands: &'a mut [Strand<C, MAX_PIXELS>],
    mut driver: D,
    mask: Mask<M>,
    config: DisplayConfig<C>,
) -> Result<DisplayLoop<'a, C, D, MAX_PIXELS, M>, StartupError>
where
    C: Pixel,
    D: StrandDriver<C>,
{
    log!("app: initializing {} strand(s)...", strands.len());
    driver.initialize(strands)?;

    let strand = strands.first_mut().ok_or(StartupError::NoStrands)?;
    log!("app: mask {}", mask);
    Ok(DisplayLoop::new(strand, driver, mask, config)?)
}

/// Run the clock until power-off
///
/// Only returns on a startup configuration error. A clock that could not
/// be synchronized is not an error; the display runs with whatever time
/// the system holds.
pub async fn run_clock<C, D, N, Clk, Dl, const MAX_PIXELS: usize, const M: usize>(
    strands: &mut [Strand<C, MAX_PIXELS>],
    driver: D,
    mut time: TimeSource<'_, N, Clk>,
    delay: &mut Dl,
    mask: Mask<M>,
    config: DisplayConfig<C>,
) -> Result<Infallible, StartupError>
where
    C: Pixel,
    D: StrandDriver<C>,
    N: NetworkLink,
    Clk: SystemClock,
    Dl: DelayNs,
{
    log!("app: *********************");
    log!("app: * starting clock    *");
    log!("app: *********************");

    let mut display = prepare_display(strands, driver, mask, config)?;

    let outcome = time.refresh(delay).await;
    if !outcome.is_time_valid() {
        log!("app: running with unsynchronized time");
    }

    display
        .run_with_clock(delay, time.clock, time.config.utc_offset, TIME_LOG_INTERVAL)
        .await
}
