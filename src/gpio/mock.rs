use crate::Result;
use crate::gpio::{GpioPort, PinMode};

/// Records every configuration and write so tests can decode the bit
/// stream a render produced.
#[derive(Debug, Default)]
pub struct RecordingGpio {
    pub configured: Vec<u8>,
    pub writes: Vec<(u8, bool)>,
}

impl GpioPort for RecordingGpio {
    fn setup() -> Result<Self> {
        Ok(Self::default())
    }

    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let PinMode::Output = mode;
        if !self.configured.contains(&pin) {
            self.configured.push(pin);
        }
        Ok(())
    }

    fn write(&mut self, pin: u8, level: bool) -> Result<()> {
        assert!(
            self.configured.contains(&pin),
            "pin {pin} written before being configured as an output"
        );
        self.writes.push((pin, level));
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.configured.clear();
        Ok(())
    }
}
