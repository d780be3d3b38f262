use crate::machine::Dmg;
use crate::trace::TraceConfig;
use crate::{OVERLAY_SIZE, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};
use anyhow::Result;
use dotmatrix_common::{App, Color, Key};
use std::io::Write;

/// Monochrome shades for the four colour indices, light to dark.
const SHADES: [Color; 4] = [
    Color::gray(0xFF),
    Color::gray(0xAA),
    Color::gray(0x55),
    Color::gray(0x00),
];

/// Frontend-facing wrapper around [`Dmg`] implementing the [`App`]
/// contract: one `step_frame` per `update`, keys forwarded to the
/// joypad.
pub struct DmgApp {
    dmg: Dmg,
    title: String,
    /// Mirror serial output to stdout (test ROMs report there).
    serial_to_stdout: bool,
    /// Show the full 256x256 background map instead of the LCD.
    overlay: bool,
    overlay_buffer: Box<[u8; OVERLAY_SIZE * OVERLAY_SIZE]>,
    should_exit: bool,
    frames: u64,
}

impl DmgApp {
    pub fn new(rom: &[u8], title: String) -> Result<Self> {
        Ok(Self {
            dmg: Dmg::new(rom)?,
            title,
            serial_to_stdout: false,
            overlay: false,
            overlay_buffer: Box::new([0; OVERLAY_SIZE * OVERLAY_SIZE]),
            should_exit: false,
            frames: 0,
        })
    }

    pub fn set_trace(&mut self, trace: TraceConfig) {
        self.dmg.set_trace(trace);
    }

    pub fn set_serial_to_stdout(&mut self, enabled: bool) {
        self.serial_to_stdout = enabled;
    }

    pub fn set_overlay(&mut self, enabled: bool) {
        self.overlay = enabled;
    }

    fn flush_serial(&mut self) {
        let bytes = self.dmg.take_serial();
        if bytes.is_empty() {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(&bytes);
        let _ = stdout.flush();
    }
}

impl App for DmgApp {
    fn init(&mut self) {
        log::info!("starting: {}", self.title);
    }

    fn update(&mut self, screen: &mut [u8]) {
        if let Err(err) = self.dmg.step_frame() {
            log::error!("machine halted: {err:#}");
            self.should_exit = true;
            return;
        }

        if self.serial_to_stdout {
            self.flush_serial();
        }

        self.frames += 1;
        if self.frames % 600 == 0 {
            log::debug!(
                "frame {}: pc={:04X} sp={:04X}",
                self.frames,
                self.dmg.cpu.regs.pc,
                self.dmg.cpu.regs.sp,
            );
        }

        let source: &[u8] = if self.overlay {
            if self.dmg.take_vram_dirty() {
                self.dmg.render_overlay(&mut self.overlay_buffer);
            }
            &self.overlay_buffer[..]
        } else {
            &self.dmg.framebuffer()[..]
        };
        for (pixel, out) in source.iter().zip(screen.chunks_exact_mut(3)) {
            let shade = SHADES[usize::from(*pixel & 0x03)];
            out.copy_from_slice(&[shade.r, shade.g, shade.b]);
        }
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        self.dmg.handle_key(key, is_down);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        if !self.serial_to_stdout {
            let output = self.dmg.serial_output();
            if !output.is_empty() {
                log::info!("serial output: {}", String::from_utf8_lossy(output));
            }
        }
    }

    fn width(&self) -> u32 {
        if self.overlay {
            OVERLAY_SIZE as u32
        } else {
            SCREEN_WIDTH as u32
        }
    }

    fn height(&self) -> u32 {
        if self.overlay {
            OVERLAY_SIZE as u32
        } else {
            SCREEN_HEIGHT as u32
        }
    }

    fn scale(&self) -> u32 {
        if self.overlay {
            2
        } else {
            SCREEN_SCALE
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}
