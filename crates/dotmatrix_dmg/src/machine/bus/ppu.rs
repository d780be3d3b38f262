//! Scanline-based picture generation.
//!
//! The PPU is stepped once per machine cycle. A frame is 154 lines of
//! 114 cycles; mode transitions happen at fixed points inside each
//! line and the visible lines are rendered in one shot when mode 3
//! ends. Pixels are stored as raw 2-bit colour indices.

use super::regs::{Lcdc, Stat};
use super::DmgBus;
use crate::{CYCLES_PER_FRAME, OVERLAY_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

const CYCLES_PER_LINE: u32 = 114;
const VBLANK_LINE: u8 = 144;

const VBLANK_IRQ: u8 = 1 << 0;
const STAT_IRQ: u8 = 1 << 1;

const MODE_HBLANK: u8 = 0;
const MODE_VBLANK: u8 = 1;
const MODE_OAM_SCAN: u8 = 2;
const MODE_DRAW: u8 = 3;

pub(crate) struct Ppu {
    pub(crate) framebuffer: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],
    /// Machine cycle within the current frame, `0..17_556`.
    pub(crate) frame_cycle: u32,
    /// Tile data or register state changed since the overlay was last
    /// rendered.
    pub(crate) vram_dirty: bool,
}

impl Ppu {
    pub(crate) fn new() -> Self {
        Self {
            framebuffer: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
            frame_cycle: 0,
            vram_dirty: true,
        }
    }
}

impl DmgBus {
    pub(crate) fn ppu_tick(&mut self) {
        let line = (self.ppu.frame_cycle / CYCLES_PER_LINE) as u8;
        let x = self.ppu.frame_cycle % CYCLES_PER_LINE;

        match x {
            0 => self.start_line(line),
            20 if line < VBLANK_LINE => self.regs.set_mode(MODE_DRAW),
            63 if line < VBLANK_LINE => {
                self.regs.set_mode(MODE_HBLANK);
                if self.regs.stat.contains(Stat::HBLANK_IRQ) {
                    self.regs.if_reg |= STAT_IRQ;
                }
                self.render_scanline(line);
            }
            _ => {}
        }

        self.ppu.frame_cycle = (self.ppu.frame_cycle + 1) % CYCLES_PER_FRAME;
    }

    fn start_line(&mut self, line: u8) {
        self.regs.ly = line;

        let was_coincident = self.regs.stat.contains(Stat::COINCIDENCE);
        let coincident = line == self.regs.lyc;
        self.regs.stat.set(Stat::COINCIDENCE, coincident);
        if coincident && !was_coincident && self.regs.stat.contains(Stat::COINCIDENCE_IRQ) {
            self.regs.if_reg |= STAT_IRQ;
        }

        if line == VBLANK_LINE {
            self.regs.set_mode(MODE_VBLANK);
            self.regs.if_reg |= VBLANK_IRQ;
            if self.regs.stat.contains(Stat::VBLANK_IRQ) {
                self.regs.if_reg |= STAT_IRQ;
            }
        } else if line < VBLANK_LINE {
            self.regs.set_mode(MODE_OAM_SCAN);
            if self.regs.stat.contains(Stat::OAM_IRQ) {
                self.regs.if_reg |= STAT_IRQ;
            }
        }
    }

    /// Renders one visible line: sprites in front of the window in
    /// front of the background.
    fn render_scanline(&mut self, line: u8) {
        let row = usize::from(line) * SCREEN_WIDTH;
        for px in 0..SCREEN_WIDTH as u8 {
            self.ppu.framebuffer[row + usize::from(px)] = self.pixel_at(px, line);
        }
    }

    fn pixel_at(&self, px: u8, line: u8) -> u8 {
        if self.regs.lcdc.contains(Lcdc::OBJ_ENABLE) {
            if let Some(value) = self.sprite_pixel(px, line) {
                return value;
            }
        }

        if self.regs.lcdc.contains(Lcdc::WINDOW_ENABLE)
            && self.regs.wy <= line
            && self.regs.wx <= px + 7
        {
            let wx = px + 7 - self.regs.wx;
            let wy = line - self.regs.wy;
            let map = self.regs.lcdc.contains(Lcdc::WINDOW_MAP);
            return self.tile_pixel(map, wx, wy);
        }

        if self.regs.lcdc.contains(Lcdc::BG_ENABLE) {
            let bx = px.wrapping_add(self.regs.scx);
            let by = line.wrapping_add(self.regs.scy);
            let map = self.regs.lcdc.contains(Lcdc::BG_MAP);
            return self.tile_pixel(map, bx, by);
        }

        0
    }

    /// The first OAM entry with an opaque pixel at this position wins.
    fn sprite_pixel(&self, px: u8, line: u8) -> Option<u8> {
        for entry in self.oam.chunks_exact(4) {
            let (y, x, tile, attrs) = (entry[0], entry[1], entry[2], entry[3]);
            let v = line + 16;
            let h = px + 8;
            if v < y || v >= y.wrapping_add(8) || h < x || h >= x.wrapping_add(8) {
                continue;
            }
            let mut sy = v - y;
            let mut sx = h - x;
            if attrs & 0x40 != 0 {
                sy = 7 - sy;
            }
            if attrs & 0x20 != 0 {
                sx = 7 - sx;
            }
            let base = usize::from(tile) * 16 + usize::from(sy) * 2;
            let value = Self::row_pixel(self.vram[base], self.vram[base + 1], sx);
            if value != 0 {
                return Some(value);
            }
        }
        None
    }

    /// Looks up one background or window pixel. `map_high` selects the
    /// tile map at `0x9C00` over `0x9800`; the tile data region comes
    /// from LCDC bit 4.
    fn tile_pixel(&self, map_high: bool, x: u8, y: u8) -> u8 {
        let map_base = if map_high { 0x1C00 } else { 0x1800 };
        let index = self.vram[map_base + usize::from(y / 8) * 32 + usize::from(x / 8)];
        let base = if self.regs.lcdc.contains(Lcdc::TILE_DATA) {
            usize::from(index) * 16
        } else {
            (0x1000_i32 + i32::from(index as i8) * 16) as usize
        };
        let row = base + usize::from(y & 7) * 2;
        Self::row_pixel(self.vram[row], self.vram[row + 1], x & 7)
    }

    fn row_pixel(lo: u8, hi: u8, x: u8) -> u8 {
        let bit = 7 - x;
        ((hi >> bit) & 1) << 1 | ((lo >> bit) & 1)
    }

    /// Renders the full 256x256 background map into `buffer`, for the
    /// tile map overlay view.
    pub(crate) fn render_overlay(&self, buffer: &mut [u8; OVERLAY_SIZE * OVERLAY_SIZE]) {
        let map = self.regs.lcdc.contains(Lcdc::BG_MAP);
        for y in 0..OVERLAY_SIZE {
            for x in 0..OVERLAY_SIZE {
                buffer[y * OVERLAY_SIZE + x] = self.tile_pixel(map, x as u8, y as u8);
            }
        }
    }
}
