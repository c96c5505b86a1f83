//! Network connectivity
//!
//! The network event handler is the only writer of the connectivity flag;
//! clock synchronization waits on it. Built on `critical-section`, so the
//! flag can be shared between tasks and interrupt handlers.

use core::cell::Cell;
use core::future::poll_fn;
use core::task::Poll;

use critical_section::Mutex;
use embassy_sync::waitqueue::AtomicWaker;

/// Station events reported by the WiFi stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Station interface started
    StationStarted,
    /// Address acquired, the link is usable
    GotIp,
    /// Association lost
    Disconnected,
}

/// Shared "connected" flag with async waiting
pub struct ConnectivityFlag {
    connected: Mutex<Cell<bool>>,
    waker: AtomicWaker,
}

impl ConnectivityFlag {
    /// Create a new flag in the disconnected state
    pub const fn new() -> Self {
        Self {
            connected: Mutex::new(Cell::new(false)),
            waker: AtomicWaker::new(),
        }
    }

    pub fn set_connected(&self) {
        critical_section::with(|cs| self.connected.borrow(cs).set(true));
        self.waker.wake();
    }

    pub fn set_disconnected(&self) {
        critical_section::with(|cs| self.connected.borrow(cs).set(false));
    }

    pub fn is_connected(&self) -> bool {
        critical_section::with(|cs| self.connected.borrow(cs).get())
    }

    /// Wait until the link is reported connected
    ///
    /// Returns immediately if it already is. Only one task should wait
    /// at a time.
    pub async fn wait_connected(&self) {
        poll_fn(|cx| {
            self.waker.register(cx.waker());
            if self.is_connected() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await;
    }

    /// Update the flag from a station event
    ///
    /// Returns `true` if the caller should (re)start the connection attempt.
    pub fn handle_event(&self, event: NetworkEvent) -> bool {
        match event {
            NetworkEvent::StationStarted => true,
            NetworkEvent::GotIp => {
                self.set_connected();
                false
            }
            NetworkEvent::Disconnected => {
                self.set_disconnected();
                true
            }
        }
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Network stack operations used for time synchronization
pub trait NetworkLink {
    type Error: core::fmt::Debug;

    /// Bring the station interface up and start associating
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Start the SNTP client against `server`
    fn start_time_sync(&mut self, server: &str) -> Result<(), Self::Error>;

    /// Stop the time client and bring the interface down
    fn disconnect(&mut self) -> Result<(), Self::Error>;
}
