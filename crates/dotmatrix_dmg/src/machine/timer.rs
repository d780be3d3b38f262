mod io;

pub(crate) const TIMER_IRQ: u8 = 1 << 2;

/// Input clock selects for `TAC` bits 0-1, as bits of the internal
/// counter whose falling edge increments TIMA.
const EDGE_MASKS: [u16; 4] = [1 << 9, 1 << 3, 1 << 5, 1 << 7];

/// The DIV/TIMA timer unit.
///
/// Everything derives from a free-running 16-bit counter that gains 4
/// every machine cycle. DIV is its high byte; TIMA increments on a
/// falling edge of the TAC-selected counter bit. An overflowing TIMA
/// reads 0 for one cycle before the TMA value is loaded.
pub(crate) struct Timer {
    /// Internal divider. The boot ROM leaves it at this value.
    counter: u16,
    pub(crate) tima: u8,
    pub(crate) tma: u8,
    pub(crate) tac: u8,
    /// TAC enable ANDed with the selected counter bit, as latched by
    /// the previous tick. TIMA clocks whenever this goes 1 -> 0, no
    /// matter what moved it: the counter, a DIV reset, or a TAC write
    /// disabling the timer or switching the select.
    last_edge: bool,
    /// Counter value at which the delayed TMA reload fires.
    overflow_at: u16,
    overflow_pending: bool,
    /// True during the machine cycle in which the reload happened.
    reloading: bool,
    /// TIMA was written since the last tick, cancelling any reload.
    tima_written: bool,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            counter: 0xABCC,
            tima: 0,
            tma: 0,
            tac: 0,
            last_edge: false,
            overflow_at: 0,
            overflow_pending: false,
            reloading: false,
            tima_written: false,
        }
    }

    /// Advances the timer by one machine cycle.
    pub(crate) fn tick(&mut self, if_reg: &mut u8) {
        self.reloading = false;
        self.counter = self.counter.wrapping_add(4);

        if self.overflow_pending && self.counter == self.overflow_at {
            self.overflow_pending = false;
            if !self.tima_written {
                self.tima = self.tma;
            }
            self.reloading = true;
        }
        self.tima_written = false;

        let edge = self.edge();
        if self.last_edge && !edge {
            self.tima = self.tima.wrapping_add(1);
            if self.tima == 0 {
                *if_reg |= TIMER_IRQ;
                self.overflow_pending = true;
                self.overflow_at = self.counter.wrapping_add(4);
            }
        }
        self.last_edge = edge;
    }

    fn edge(&self) -> bool {
        self.tac & 0x04 != 0 && self.counter & EDGE_MASKS[usize::from(self.tac & 0x03)] != 0
    }
}
