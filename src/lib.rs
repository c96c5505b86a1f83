#![no_std]

#[macro_use]
mod logging;

pub mod app;
pub mod clock;
pub mod color;
mod delay;
pub mod display;
pub mod driver;
pub mod mask;
pub mod math8;
pub mod net;
pub mod strand;

pub use app::{StartupError, TIME_LOG_INTERVAL, TimeSource, prepare_display, run_clock};
pub use clock::{
    ClockSyncConfig, SyncOutcome, SystemClock, ensure_time_synced, refresh_if_unset,
};
pub use color::{Pixel, Rgb, Rgbw, pixel_from_rgb, pixel_from_rgbw};
pub use display::{DEFAULT_INTERVAL, Animation, DisplayConfig, DisplayLoop, FrameOutcome, FrameStats};
pub use driver::{DriverError, SmartLedsDriver, StrandDriver};
pub use mask::{Mask, MaskError, apply_mask, render_mask};
pub use net::{ConnectivityFlag, NetworkEvent, NetworkLink};
pub use strand::{LedType, Strand, StrandConfig, StrandError, StrandId};
pub use embassy_time::Duration;
