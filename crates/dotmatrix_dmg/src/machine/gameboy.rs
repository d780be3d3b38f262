use super::DmgBus;
use crate::cpu::{Bus, Cpu};
use crate::trace::TraceConfig;
use crate::{CYCLES_PER_FRAME, OVERLAY_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use anyhow::Result;
use dotmatrix_common::Key;

/// The opcode `run_until_breakpoint` stops on: LD B,B, conventionally
/// used as a software breakpoint by test ROMs.
const BREAKPOINT_OPCODE: u8 = 0x40;

/// A whole DMG: CPU core plus everything hanging off its bus.
pub struct Dmg {
    pub cpu: Cpu,
    pub(crate) bus: DmgBus,
}

impl Dmg {
    pub fn new(rom: &[u8]) -> Result<Self> {
        Ok(Self {
            cpu: Cpu::new(),
            bus: DmgBus::new(rom)?,
        })
    }

    pub fn set_trace(&mut self, trace: TraceConfig) {
        self.cpu.trace = trace;
    }

    /// Runs exactly one frame's worth of machine cycles.
    pub fn step_frame(&mut self) -> Result<()> {
        for _ in 0..CYCLES_PER_FRAME {
            self.step_mcycle()?;
        }
        Ok(())
    }

    /// One machine cycle of the whole machine. The timer and PPU tick
    /// first so the CPU observes their updated state within the same
    /// cycle.
    pub(crate) fn step_mcycle(&mut self) -> Result<()> {
        self.bus.timer.tick(&mut self.bus.regs.if_reg);
        self.bus.ppu_tick();
        self.cpu.step_mcycle(&mut self.bus)
    }

    /// Runs until the next software breakpoint (`LD B,B`) is about to
    /// execute, or until `max_mcycles` cycles have elapsed. Returns
    /// true if the breakpoint was reached.
    pub fn run_until_breakpoint(&mut self, max_mcycles: u64) -> Result<bool> {
        for _ in 0..max_mcycles {
            if self.cpu.is_idle()
                && !self.cpu.halted
                && !self.cpu.is_stopped()
                && self.bus.read8(self.cpu.regs.pc) == BREAKPOINT_OPCODE
            {
                return Ok(true);
            }
            self.step_mcycle()?;
        }
        Ok(false)
    }

    /// Maps a frontend key to the button matrix. Any press also wakes
    /// the CPU from STOP.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Right => self.bus.set_dpad(0, pressed),
            Key::Left => self.bus.set_dpad(1, pressed),
            Key::Up => self.bus.set_dpad(2, pressed),
            Key::Down => self.bus.set_dpad(3, pressed),
            Key::Z => self.bus.set_button(0, pressed),
            Key::X => self.bus.set_button(1, pressed),
            Key::A | Key::Space => self.bus.set_button(2, pressed),
            Key::S | Key::Return => self.bus.set_button(3, pressed),
            Key::None => return,
        }
        if pressed {
            self.cpu.wake_from_stop();
        }
    }

    /// The last completed frame as 2-bit colour indices, row-major.
    pub fn framebuffer(&self) -> &[u8; SCREEN_WIDTH * SCREEN_HEIGHT] {
        self.bus.framebuffer()
    }

    /// Renders the full background tile map for the overlay view.
    pub fn render_overlay(&self, buffer: &mut [u8; OVERLAY_SIZE * OVERLAY_SIZE]) {
        self.bus.render_overlay(buffer);
    }

    /// True once after each change to the tile data or map selects, so
    /// the overlay only re-renders when something moved.
    pub fn take_vram_dirty(&mut self) -> bool {
        std::mem::take(&mut self.bus.ppu.vram_dirty)
    }

    /// Bytes written to the serial port since the last call.
    pub fn take_serial(&mut self) -> Vec<u8> {
        self.bus.serial.take_output()
    }

    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial.output()
    }
}
