//! Register-level access to the timer, `0xFF04..=0xFF07`.

use super::Timer;

impl Timer {
    pub(crate) fn div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    /// Any write to DIV zeroes the whole internal counter. If the
    /// selected bit was latched high, the next tick sees a falling
    /// edge and bumps TIMA.
    pub(crate) fn div_write(&mut self) {
        self.counter = 0;
    }

    /// A TIMA write lands normally and cancels a pending reload,
    /// except during the reload cycle itself, where it is lost.
    pub(crate) fn tima_write(&mut self, value: u8) {
        if self.reloading {
            return;
        }
        self.tima = value;
        self.tima_written = true;
    }

    /// A TMA write during the reload cycle is forwarded to TIMA too.
    pub(crate) fn tma_write(&mut self, value: u8) {
        self.tma = value;
        if self.reloading {
            self.tima = value;
        }
    }

    pub(crate) fn tac_write(&mut self, value: u8) {
        self.tac = value & 0x07;
    }
}
