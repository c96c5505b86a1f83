//! Console logging
//!
//! Log lines go to `esp-println` when the `esp32-log` feature is enabled.
//! Otherwise the arguments are only type-checked.

macro_rules! log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!($($arg)*);
        #[cfg(not(feature = "esp32-log"))]
        {
            let _ = core::format_args!($($arg)*);
        }
    }};
}
