pub mod native;
pub mod sysfs;

#[cfg(test)]
pub mod mock;

pub use native::NativeGpio;
pub use sysfs::SysfsGpio;

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    Output,
}

/// Minimal pin-control surface needed to bit-bang a serial protocol.
///
/// `setup` and `configure_pin` do all the slow, fallible work of claiming a
/// line; `write` is the inner loop and runs once per transmitted bit, so it
/// only touches handles cached at configuration time. Writing to a pin that
/// was never configured is a programming error and panics.
pub trait GpioPort: Sized {
    fn setup() -> Result<Self>;

    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    fn write(&mut self, pin: u8, level: bool) -> Result<()>;

    fn cleanup(&mut self) -> Result<()>;
}
