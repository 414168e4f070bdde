//! Driver for the Pimoroni Blinkt!, a strip of 8 addressable RGB LEDs
//! bit-banged over two GPIO lines. Pins can be driven natively through
//! rppal or through the kernel's sysfs interface; both back the same
//! [`Blinkt`] strip.

pub mod error;
pub mod gpio;
pub mod strip;

pub use crate::error::{Error, Result};
pub use crate::strip::{Blinkt, Pixel};

/// BCM number of the data line.
pub const DAT: u8 = 23;
/// BCM number of the clock line.
pub const CLK: u8 = 24;

pub const NUM_PIXELS: usize = 8;

/// Blocks the calling thread for `ms` milliseconds.
pub fn delay(ms: u64) {
    std::thread::sleep(std::time::Duration::from_millis(ms));
}
