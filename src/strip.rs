use std::process;
use std::sync::{Arc, Mutex};

use log::{error, info};

use crate::gpio::{GpioPort, PinMode};
use crate::{CLK, DAT, NUM_PIXELS, Result};

// Raw 5-bit brightness used when the caller does not supply one.
const DEFAULT_BRIGHTNESS: u8 = 15;

const MIN_BRIGHTNESS: f32 = 0.0;
const MAX_BRIGHTNESS: f32 = 1.0;

// Every LED frame starts with three marker bits above the brightness code.
const LED_FRAME_MARKER: u8 = 0b1110_0000;

const SOF_PULSES: usize = 32;
// Four more than the start marker: one extra clock of margin per pixel in
// the shift-register chain, so the last pixel's data latches. Some drivers
// in this family send four zero bytes plus one 0xFF byte instead; the
// pulse-train form is what we ship and what the tests pin down.
const EOF_PULSES: usize = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    red: u8,
    green: u8,
    blue: u8,
    brightness: u8,
}

impl Pixel {
    fn off(brightness: u8) -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            brightness,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// The raw 5-bit brightness code transmitted on the wire.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

fn brightness_code(brightness: f32) -> u8 {
    assert!(
        (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&brightness),
        "supplied brightness was {brightness}, expected a value between {MIN_BRIGHTNESS} and {MAX_BRIGHTNESS}"
    );
    (brightness * 31.0).floor() as u8
}

/// An 8-pixel Blinkt! strip driven over two bit-banged lines.
///
/// Pixel setters only edit the in-memory buffer; nothing reaches the wire
/// until [`Blinkt::show`] runs.
#[derive(Debug)]
pub struct Blinkt<P: GpioPort> {
    port: P,
    pixels: [Pixel; NUM_PIXELS],
}

impl<P: GpioPort> Blinkt<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            pixels: [Pixel::off(DEFAULT_BRIGHTNESS); NUM_PIXELS],
        }
    }

    pub fn with_brightness(port: P, brightness: f32) -> Self {
        Self {
            port,
            pixels: [Pixel::off(brightness_code(brightness)); NUM_PIXELS],
        }
    }

    /// Claims the data and clock lines as outputs.
    pub fn setup(&mut self) -> Result<()> {
        self.port.configure_pin(DAT, PinMode::Output)?;
        self.port.configure_pin(CLK, PinMode::Output)?;
        Ok(())
    }

    pub fn set_pixel(&mut self, pixel: usize, red: u8, green: u8, blue: u8) {
        assert!(
            pixel < NUM_PIXELS,
            "supplied pixel index was {pixel}, expected a value below {NUM_PIXELS}"
        );
        self.pixels[pixel].red = red;
        self.pixels[pixel].green = green;
        self.pixels[pixel].blue = blue;
    }

    pub fn set_all(&mut self, red: u8, green: u8, blue: u8) {
        for pixel in 0..NUM_PIXELS {
            self.set_pixel(pixel, red, green, blue);
        }
    }

    /// Turns every pixel off, keeping its brightness. Takes effect on the
    /// next [`Blinkt::show`].
    pub fn clear(&mut self) {
        self.set_all(0, 0, 0);
    }

    /// Sets the brightness of every pixel; `brightness` must lie in
    /// `[0.0, 1.0]`.
    pub fn set_brightness(&mut self, brightness: f32) {
        let code = brightness_code(brightness);
        for pixel in &mut self.pixels {
            pixel.brightness = code;
        }
    }

    pub fn set_pixel_brightness(&mut self, pixel: usize, brightness: f32) {
        assert!(
            pixel < NUM_PIXELS,
            "supplied pixel index was {pixel}, expected a value below {NUM_PIXELS}"
        );
        self.pixels[pixel].brightness = brightness_code(brightness);
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Renders the buffer: start marker, one 4-byte frame per pixel, end
    /// marker. A failed write aborts the frame; the next render fully
    /// resynchronizes the chain via the start marker.
    pub fn show(&mut self) -> Result<()> {
        self.pulse(SOF_PULSES)?;
        for i in 0..NUM_PIXELS {
            let Pixel {
                red,
                green,
                blue,
                brightness,
            } = self.pixels[i];
            self.write_byte(LED_FRAME_MARKER | brightness)?;
            self.write_byte(blue)?;
            self.write_byte(green)?;
            self.write_byte(red)?;
        }
        self.pulse(EOF_PULSES)
    }

    /// Releases the data and clock lines.
    pub fn cleanup(&mut self) -> Result<()> {
        self.port.cleanup()
    }

    /// Registers a watcher for the interrupt signal. On delivery it clears
    /// the strip, renders the cleared state, releases the GPIO lines and
    /// terminates the process, in that order.
    pub fn set_clear_on_exit(strip: &Arc<Mutex<Self>>, clear_on_exit: bool) -> Result<()>
    where
        P: Send + 'static,
    {
        if !clear_on_exit {
            return Ok(());
        }
        info!("press Control + C to stop");
        let strip = Arc::clone(strip);
        ctrlc::set_handler(move || {
            let mut strip = strip.lock().unwrap_or_else(|e| e.into_inner());
            strip.clear();
            if let Err(e) = strip.show() {
                error!("error clearing strip on exit: {e}");
            }
            if let Err(e) = strip.cleanup() {
                error!("error releasing gpio on exit: {e}");
            }
            process::exit(1);
        })
        .map_err(crate::Error::ExitHandler)
    }

    // Holds data low and clocks `pulses` zero bits through the chain.
    fn pulse(&mut self, pulses: usize) -> Result<()> {
        self.port.write(DAT, false)?;
        for _ in 0..pulses {
            self.port.write(CLK, true)?;
            self.port.write(CLK, false)?;
        }
        Ok(())
    }

    fn write_byte(&mut self, mut byte: u8) -> Result<()> {
        for _ in 0..8 {
            self.port.write(DAT, byte & 0x80 != 0)?;
            self.port.write(CLK, true)?;
            self.port.write(CLK, false)?;
            byte <<= 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::mock::RecordingGpio;

    fn strip() -> Blinkt<RecordingGpio> {
        let mut strip = Blinkt::new(RecordingGpio::setup().unwrap());
        strip.setup().unwrap();
        strip
    }

    // Samples the data line at every rising clock edge, like the LED
    // driver chips do.
    fn clocked_bits(writes: &[(u8, bool)]) -> Vec<bool> {
        let mut bits = Vec::new();
        let mut dat = false;
        let mut clk = false;
        for &(pin, level) in writes {
            match pin {
                DAT => dat = level,
                CLK => {
                    if level && !clk {
                        bits.push(dat);
                    }
                    clk = level;
                }
                other => panic!("write to unexpected pin {other}"),
            }
        }
        bits
    }

    fn byte_from_bits(bits: &[bool]) -> u8 {
        bits.iter().fold(0, |byte, &bit| byte << 1 | u8::from(bit))
    }

    // Splits a render's bit stream into start pulses, 4-byte pixel frames
    // and end pulses.
    fn decode_frame(writes: &[(u8, bool)]) -> (Vec<bool>, Vec<[u8; 4]>, Vec<bool>) {
        let bits = clocked_bits(writes);
        assert_eq!(bits.len(), SOF_PULSES + NUM_PIXELS * 32 + EOF_PULSES);
        let (sof, rest) = bits.split_at(SOF_PULSES);
        let (data, eof) = rest.split_at(NUM_PIXELS * 32);
        let frames = data
            .chunks(8)
            .map(byte_from_bits)
            .collect::<Vec<_>>()
            .chunks(4)
            .map(|frame| [frame[0], frame[1], frame[2], frame[3]])
            .collect();
        (sof.to_vec(), frames, eof.to_vec())
    }

    #[test]
    fn brightness_quantizes_to_five_bits() {
        assert_eq!(brightness_code(0.0), 0);
        assert_eq!(brightness_code(0.5), 15);
        assert_eq!(brightness_code(1.0), 31);
        for f in [0.0, 0.1, 0.25, 0.33, 0.5, 0.75, 0.99, 1.0] {
            let code = brightness_code(f);
            assert_eq!(code, (f * 31.0).floor() as u8);
            assert!(code <= 31);
        }
    }

    #[test]
    #[should_panic(expected = "supplied brightness was 1.1")]
    fn brightness_above_one_panics() {
        brightness_code(1.1);
    }

    #[test]
    #[should_panic(expected = "supplied brightness was -0.1")]
    fn negative_brightness_panics() {
        brightness_code(-0.1);
    }

    #[test]
    fn setup_claims_data_and_clock_lines() {
        let strip = strip();
        assert_eq!(strip.port.configured, vec![DAT, CLK]);
    }

    #[test]
    fn set_pixel_stores_color_and_keeps_brightness() {
        let mut strip = strip();
        strip.set_pixel_brightness(3, 1.0);
        strip.set_pixel(3, 10, 20, 30);
        assert_eq!(strip.pixels()[3].rgb(), (10, 20, 30));
        assert_eq!(strip.pixels()[3].brightness(), 31);
    }

    #[test]
    #[should_panic(expected = "supplied pixel index was 8")]
    fn set_pixel_out_of_range_panics() {
        strip().set_pixel(8, 1, 2, 3);
    }

    #[test]
    #[should_panic(expected = "supplied pixel index was 8")]
    fn set_pixel_brightness_out_of_range_panics() {
        strip().set_pixel_brightness(8, 0.5);
    }

    #[test]
    fn clear_zeroes_color_and_keeps_brightness() {
        let mut strip = Blinkt::with_brightness(RecordingGpio::setup().unwrap(), 1.0);
        strip.set_all(255, 128, 64);
        strip.clear();
        for pixel in strip.pixels() {
            assert_eq!(pixel.rgb(), (0, 0, 0));
            assert_eq!(pixel.brightness(), 31);
        }
    }

    #[test]
    fn show_emits_fixed_pulse_counts() {
        let mut strip = strip();
        strip.set_all(255, 255, 255);
        strip.set_brightness(1.0);
        strip.show().unwrap();

        let (sof, frames, eof) = decode_frame(&strip.port.writes);
        assert_eq!(sof.len(), 32);
        assert!(sof.iter().all(|&bit| !bit));
        assert_eq!(frames.len(), NUM_PIXELS);
        assert_eq!(eof.len(), 36);
        assert!(eof.iter().all(|&bit| !bit));
    }

    #[test]
    fn brightness_byte_carries_marker_bits() {
        for code in 0..=31u8 {
            let mut strip = strip();
            strip.set_brightness(f32::from(code) / 31.0);
            strip.show().unwrap();

            let (_, frames, _) = decode_frame(&strip.port.writes);
            for frame in frames {
                assert_eq!(frame[0], 224 | code);
            }
        }
    }

    #[test]
    fn show_transmits_brightness_blue_green_red() {
        let mut strip = strip();
        strip.set_pixel(0, 255, 0, 0);
        strip.set_pixel_brightness(0, 1.0);
        strip.show().unwrap();

        let (_, frames, _) = decode_frame(&strip.port.writes);
        assert_eq!(frames[0], [0xFF, 0x00, 0x00, 0xFF]);
        for frame in &frames[1..] {
            assert_eq!(*frame, [224 | DEFAULT_BRIGHTNESS, 0, 0, 0]);
        }
    }

    #[test]
    fn render_is_deterministic_in_length() {
        let mut dark = strip();
        dark.show().unwrap();
        let mut lit = strip();
        lit.set_all(201, 87, 3);
        lit.set_brightness(0.7);
        lit.show().unwrap();
        assert_eq!(dark.port.writes.len(), lit.port.writes.len());
    }
}
