//! Wall-clock time and one-shot NTP synchronization
//!
//! Synchronization is best effort: it brings the network up, waits for the
//! SNTP client to set the system clock for a bounded number of polls, tears
//! the network down and reports what happened. It never fails the caller.

pub mod civil;

use embassy_futures::select::{Either, select};
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

pub use civil::{CivilDateTime, UtcOffset, Weekday};

use crate::delay::sleep;
use crate::net::{ConnectivityFlag, NetworkLink};

/// Process-wide system clock
pub trait SystemClock {
    /// Seconds since the Unix epoch, 0 if the clock was never set
    fn unix_time(&self) -> i64;
}

/// Clock synchronization settings
#[derive(Debug, Clone, Copy)]
pub struct ClockSyncConfig {
    /// Maximum number of clock polls after SNTP was started
    pub max_retries: u8,
    /// Pause before each poll
    pub retry_interval: Duration,
    /// How long to wait for the link, `None` waits forever
    pub connect_timeout: Option<Duration>,
    pub ntp_server: &'static str,
    /// Local years before this one mean the clock is unset
    pub min_valid_year: i32,
    pub utc_offset: UtcOffset,
}

impl ClockSyncConfig {
    pub const DEFAULT: Self = Self {
        max_retries: 10,
        retry_interval: Duration::from_millis(2000),
        connect_timeout: None,
        ntp_server: "pool.ntp.org",
        min_valid_year: 2016,
        utc_offset: UtcOffset::UTC,
    };
}

impl Default for ClockSyncConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a synchronization attempt achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The clock was plausible already, the network was not touched
    AlreadySet { year: i32 },
    /// The clock became plausible after `attempts` polls
    Synced { attempts: u8, year: i32 },
    /// All polls were used up, the clock is still implausible
    Unsynced { attempts: u8, year: i32 },
    /// The link or the SNTP client could not be brought up
    NetworkUnavailable,
}

impl SyncOutcome {
    /// Whether the clock can be trusted after this outcome
    pub const fn is_time_valid(self) -> bool {
        matches!(self, Self::AlreadySet { .. } | Self::Synced { .. })
    }
}

/// Current local time
pub fn local_time<C: SystemClock>(clock: &C, offset: UtcOffset) -> CivilDateTime {
    CivilDateTime::from_unix_with_offset(clock.unix_time(), offset)
}

/// Whether the clock reads a plausible calendar year
pub fn is_time_plausible<C: SystemClock>(clock: &C, config: &ClockSyncConfig) -> bool {
    local_time(clock, config.utc_offset).year >= config.min_valid_year
}

/// Log the current local time in `asctime` layout
pub fn log_time<C: SystemClock>(clock: &C, offset: UtcOffset) {
    log!("time: {}", local_time(clock, offset));
}

/// Bring the network up, let SNTP set the clock, tear the network down
///
/// The clock is polled at most `max_retries` times, each poll preceded by
/// `retry_interval`. The network is disconnected exactly once on every
/// path, whether or not the clock got set.
pub async fn ensure_time_synced<N, C, D>(
    network: &mut N,
    connectivity: &ConnectivityFlag,
    clock: &C,
    delay: &mut D,
    config: &ClockSyncConfig,
) -> SyncOutcome
where
    N: NetworkLink,
    C: SystemClock,
    D: DelayNs,
{
    let outcome = sync_over_network(network, connectivity, clock, delay, config).await;

    if let Err(err) = network.disconnect() {
        log!("clock_sync: failed to stop network: {:?}", err);
    }

    match outcome {
        SyncOutcome::Synced { attempts, year } => {
            log!("clock_sync: time set after {} poll(s), year {}", attempts, year);
        }
        SyncOutcome::Unsynced { attempts, year } => {
            log!(
                "clock_sync: time still unset after {} poll(s), year {}; continuing",
                attempts,
                year
            );
        }
        SyncOutcome::NetworkUnavailable => {
            log!("clock_sync: network unavailable; continuing with current time");
        }
        SyncOutcome::AlreadySet { .. } => {}
    }

    outcome
}

/// Synchronize only if the clock looks unset
pub async fn refresh_if_unset<N, C, D>(
    network: &mut N,
    connectivity: &ConnectivityFlag,
    clock: &C,
    delay: &mut D,
    config: &ClockSyncConfig,
) -> SyncOutcome
where
    N: NetworkLink,
    C: SystemClock,
    D: DelayNs,
{
    let year = local_time(clock, config.utc_offset).year;
    if year >= config.min_valid_year {
        return SyncOutcome::AlreadySet { year };
    }

    log!(
        "clock_sync: time is not set yet (year {}), getting time over NTP",
        year
    );
    ensure_time_synced(network, connectivity, clock, delay, config).await
}

async fn sync_over_network<N, C, D>(
    network: &mut N,
    connectivity: &ConnectivityFlag,
    clock: &C,
    delay: &mut D,
    config: &ClockSyncConfig,
) -> SyncOutcome
where
    N: NetworkLink,
    C: SystemClock,
    D: DelayNs,
{
    if let Err(err) = network.connect() {
        log!("clock_sync: connect failed: {:?}", err);
        return SyncOutcome::NetworkUnavailable;
    }

    match config.connect_timeout {
        None => connectivity.wait_connected().await,
        Some(timeout) => {
            match select(connectivity.wait_connected(), sleep(delay, timeout)).await {
                Either::First(()) => {}
                Either::Second(()) => {
                    log!("clock_sync: no connection after {} ms", timeout.as_millis());
                    return SyncOutcome::NetworkUnavailable;
                }
            }
        }
    }

    log!("clock_sync: initializing SNTP with {}", config.ntp_server);
    if let Err(err) = network.start_time_sync(config.ntp_server) {
        log!("clock_sync: SNTP start failed: {:?}", err);
        return SyncOutcome::NetworkUnavailable;
    }

    let mut attempts = 0;
    let mut last_year = None;
    while attempts < config.max_retries {
        attempts += 1;
        log!(
            "clock_sync: waiting for system time to be set... ({}/{})",
            attempts,
            config.max_retries
        );
        sleep(delay, config.retry_interval).await;

        let year = local_time(clock, config.utc_offset).year;
        if year >= config.min_valid_year {
            return SyncOutcome::Synced { attempts, year };
        }
        last_year = Some(year);
    }

    let year = last_year.unwrap_or_else(|| local_time(clock, config.utc_offset).year);
    SyncOutcome::Unsynced { attempts, year }
}
