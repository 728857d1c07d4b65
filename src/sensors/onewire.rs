//! DS18B20 probe string driver — bit-banged one-wire on a single GPIO.
//!
//! The rig's five probes are wired on one bus. Their ROM codes are fixed at
//! commissioning time and listed here in slot order; bus discovery happens
//! with a bench tool, not in the firmware.
//!
//! Timing follows the DS18B20 datasheet standard-speed slots. The line is
//! driven open-drain: writing 0 pulls the bus low, writing 1 releases it to
//! the external pull-up.

use esp_idf_svc::sys::{
    esp_rom_delay_us, gpio_get_level, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, gpio_set_direction,
    gpio_set_level,
};

use super::{ProbeBus, PROBE_COUNT};

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_MATCH_ROM: u8 = 0x55;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case conversion time at 12-bit resolution (ms).
const CONVERT_TIMEOUT_MS: u32 = 750;

/// ROM codes in slot order: ambient reference first, then bar nodes 1-4.
const ROMS: [[u8; 8]; PROBE_COUNT] = [
    [0x28, 0xFF, 0x64, 0x1E, 0x0F, 0x31, 0x5A, 0x83],
    [0x28, 0xFF, 0x64, 0x1E, 0x11, 0xC2, 0x09, 0x4D],
    [0x28, 0xFF, 0x64, 0x1E, 0x12, 0x5B, 0x77, 0x21],
    [0x28, 0xFF, 0x64, 0x1E, 0x14, 0x07, 0xE3, 0x96],
    [0x28, 0xFF, 0x64, 0x1E, 0x16, 0x99, 0x2C, 0xB5],
];

/// Bit-banged one-wire master for the probe string.
pub struct Ds18b20Bus {
    gpio: i32,
    /// Which slots answered during the last transaction round.
    present: [bool; PROBE_COUNT],
}

impl Ds18b20Bus {
    pub fn new(gpio: i32) -> Self {
        // SAFETY: one-shot pin mode configuration from the single-threaded
        // init path; the pin is owned exclusively by this driver.
        unsafe {
            gpio_set_direction(gpio, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD);
            gpio_set_level(gpio, 1);
        }
        Self {
            gpio,
            present: [false; PROBE_COUNT],
        }
    }

    // ── Line primitives ───────────────────────────────────────

    fn drive_low(&self) {
        // SAFETY: pin configured open-drain in `new`; main-loop thread only.
        unsafe {
            gpio_set_level(self.gpio, 0);
        }
    }

    fn release(&self) {
        // SAFETY: as above.
        unsafe {
            gpio_set_level(self.gpio, 1);
        }
    }

    fn sample(&self) -> bool {
        // SAFETY: as above.
        unsafe { gpio_get_level(self.gpio) != 0 }
    }

    fn delay_us(us: u32) {
        // SAFETY: busy-wait ROM routine, no side effects.
        unsafe {
            esp_rom_delay_us(us);
        }
    }

    // ── Protocol primitives ───────────────────────────────────

    /// Reset pulse; `true` when at least one slave answered presence.
    fn reset(&self) -> bool {
        self.drive_low();
        Self::delay_us(480);
        self.release();
        Self::delay_us(70);
        let presence = !self.sample();
        Self::delay_us(410);
        presence
    }

    fn write_bit(&self, bit: bool) {
        self.drive_low();
        if bit {
            Self::delay_us(6);
            self.release();
            Self::delay_us(64);
        } else {
            Self::delay_us(60);
            self.release();
            Self::delay_us(10);
        }
    }

    fn read_bit(&self) -> bool {
        self.drive_low();
        Self::delay_us(6);
        self.release();
        Self::delay_us(9);
        let bit = self.sample();
        Self::delay_us(55);
        bit
    }

    fn write_byte(&self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0);
        }
    }

    fn read_byte(&self) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit() {
                byte |= 1 << i;
            }
        }
        byte
    }

    fn match_rom(&self, rom: &[u8; 8]) {
        self.write_byte(CMD_MATCH_ROM);
        for b in rom {
            self.write_byte(*b);
        }
    }

    /// Dallas 8-bit CRC (polynomial 0x8C, LSB-first).
    fn crc8(data: &[u8]) -> u8 {
        let mut crc = 0u8;
        for byte in data {
            let mut b = *byte;
            for _ in 0..8 {
                let mix = (crc ^ b) & 0x01;
                crc >>= 1;
                if mix != 0 {
                    crc ^= 0x8C;
                }
                b >>= 1;
            }
        }
        crc
    }
}

impl ProbeBus for Ds18b20Bus {
    fn convert(&mut self) {
        if !self.reset() {
            self.present = [false; PROBE_COUNT];
            return;
        }
        self.write_byte(CMD_SKIP_ROM);
        self.write_byte(CMD_CONVERT_T);

        // Slaves hold the line low until conversion completes; poll rather
        // than waiting the full worst case.
        for _ in 0..CONVERT_TIMEOUT_MS {
            Self::delay_us(1000);
            if self.read_bit() {
                break;
            }
        }
    }

    fn read_celsius(&mut self, slot: usize) -> Option<f32> {
        if !self.reset() {
            self.present[slot] = false;
            return None;
        }
        self.match_rom(&ROMS[slot]);
        self.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratch = [0u8; 9];
        for b in &mut scratch {
            *b = self.read_byte();
        }

        if Self::crc8(&scratch[..8]) != scratch[8] {
            self.present[slot] = false;
            return None;
        }
        self.present[slot] = true;

        let raw = i16::from_le_bytes([scratch[0], scratch[1]]);
        Some(f32::from(raw) / 16.0)
    }

    fn device_count(&self) -> u8 {
        self.present.iter().filter(|p| **p).count() as u8
    }
}
