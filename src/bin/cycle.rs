//! Cycles the whole strip through the color wheel until interrupted;
//! Control + C clears the strip and releases the pins before exiting.

use std::sync::{Arc, Mutex};

use blinkt::gpio::{GpioPort, SysfsGpio};
use blinkt::{Blinkt, Result, delay};

fn color_wheel(wheel_pos: u8) -> (u8, u8, u8) {
    match wheel_pos {
        0..85 => (255 - wheel_pos * 3, wheel_pos * 3, 0),
        85..170 => (0, 255 - (wheel_pos - 85) * 3, (wheel_pos - 85) * 3),
        170..=255 => ((wheel_pos - 170) * 3, 0, 255 - (wheel_pos - 170) * 3),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut strip = Blinkt::with_brightness(SysfsGpio::setup()?, 0.5);
    strip.setup()?;

    let strip = Arc::new(Mutex::new(strip));
    Blinkt::set_clear_on_exit(&strip, true)?;

    let mut wheel_pos = 0u8;
    loop {
        {
            let mut strip = strip.lock().unwrap_or_else(|e| e.into_inner());
            let (r, g, b) = color_wheel(wheel_pos);
            strip.set_all(r, g, b);
            strip.show()?;
        }
        wheel_pos = wheel_pos.wrapping_add(1);
        delay(20);
    }
}
