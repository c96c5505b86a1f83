use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// Suspend for exactly `duration`, at microsecond resolution
///
/// Always calls the delay at least once, even for a zero duration.
pub(crate) async fn sleep<D: DelayNs>(delay: &mut D, duration: Duration) {
    let mut remaining = duration.as_micros();
    loop {
        let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
        delay.delay_us(chunk).await;
        remaining -= u64::from(chunk);
        if remaining == 0 {
            break;
        }
    }
}
