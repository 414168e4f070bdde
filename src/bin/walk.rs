//! Walks a red pixel across the strip, then clears it.

use blinkt::gpio::{GpioPort, NativeGpio};
use blinkt::{Blinkt, NUM_PIXELS, Result, delay};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut strip = Blinkt::new(NativeGpio::setup()?);
    strip.setup()?;

    delay(100);

    for pixel in 0..NUM_PIXELS {
        strip.set_pixel(pixel, 255, 0, 0);
        strip.show()?;
        delay(100);
    }

    delay(1000);
    strip.clear();
    strip.show()?;
    strip.cleanup()
}
