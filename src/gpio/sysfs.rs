use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::gpio::{GpioPort, PinMode};
use crate::{Error, Result};

const GPIO_ROOT: &str = "/sys/class/gpio";

/// Open write handles to one exported pin's control files. A handle exists
/// in the registry if and only if the pin has been exported and opened.
#[derive(Debug)]
struct PinHandle {
    value: fs::File,
    #[allow(dead_code)]
    direction: fs::File,
}

/// GPIO access through the kernel's sysfs pseudo-filesystem.
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    pins: HashMap<u8, PinHandle>,
}

impl SysfsGpio {
    /// Uses `root` in place of `/sys/class/gpio`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pins: HashMap::new(),
        }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn exported(&self, pin: u8) -> bool {
        self.pin_dir(pin).exists()
    }

    fn export(&self, pin: u8) -> Result<()> {
        fs::write(self.root.join("export"), pin.to_string()).map_err(|e| Error::Export(pin, e))
    }

    fn unexport(&self, pin: u8) -> Result<()> {
        fs::write(self.root.join("unexport"), pin.to_string()).map_err(|e| Error::Unexport(pin, e))
    }
}

impl GpioPort for SysfsGpio {
    fn setup() -> Result<Self> {
        Ok(Self::with_root(GPIO_ROOT))
    }

    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let PinMode::Output = mode;

        if !self.exported(pin) {
            self.export(pin)?;
        }

        if !self.pins.contains_key(&pin) {
            let pin_dir = self.pin_dir(pin);
            let value = fs::OpenOptions::new()
                .write(true)
                .open(pin_dir.join("value"))
                .map_err(|e| Error::PinOpen(pin, e))?;
            let mut direction = fs::OpenOptions::new()
                .write(true)
                .open(pin_dir.join("direction"))
                .map_err(|e| Error::PinOpen(pin, e))?;
            direction
                .write_all(b"out")
                .map_err(|e| Error::PinDirection(pin, e))?;
            self.pins.insert(pin, PinHandle { value, direction });
        }

        Ok(())
    }

    fn write(&mut self, pin: u8, level: bool) -> Result<()> {
        let handle = self
            .pins
            .get_mut(&pin)
            .unwrap_or_else(|| panic!("pin {pin} written before being configured as an output"));
        let value: &[u8] = if level { b"1" } else { b"0" };
        handle
            .value
            .write_all(value)
            .map_err(|e| Error::PinWrite(pin, e))
    }

    fn cleanup(&mut self) -> Result<()> {
        for (pin, handle) in self.pins.drain() {
            debug!("releasing pin {pin}");
            drop(handle);
            fs::write(self.root.join("unexport"), pin.to_string())
                .map_err(|e| Error::Unexport(pin, e))?;
        }
        Ok(())
    }
}
