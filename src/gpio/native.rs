use std::collections::HashMap;

use log::debug;
use rppal::gpio::{Gpio, Level, OutputPin};

use crate::gpio::{GpioPort, PinMode};
use crate::{Error, Result};

/// GPIO access through the memory-mapped peripheral registers, via rppal.
/// No sysfs side effects; a claimed pin reverts to an input when its handle
/// is dropped, which stands in for unexport.
#[derive(Debug)]
pub struct NativeGpio {
    gpio: Gpio,
    pins: HashMap<u8, OutputPin>,
}

impl GpioPort for NativeGpio {
    fn setup() -> Result<Self> {
        let gpio = Gpio::new().map_err(Error::GpioInit)?;
        Ok(Self {
            gpio,
            pins: HashMap::new(),
        })
    }

    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let PinMode::Output = mode;
        if !self.pins.contains_key(&pin) {
            let output = self
                .gpio
                .get(pin)
                .map_err(|e| Error::PinClaim(pin, e))?
                .into_output();
            self.pins.insert(pin, output);
        }
        Ok(())
    }

    fn write(&mut self, pin: u8, level: bool) -> Result<()> {
        let output = self
            .pins
            .get_mut(&pin)
            .unwrap_or_else(|| panic!("pin {pin} written before being configured as an output"));
        output.write(if level { Level::High } else { Level::Low });
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        for (pin, _output) in self.pins.drain() {
            debug!("releasing pin {pin}");
        }
        Ok(())
    }
}
