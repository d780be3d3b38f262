/// Serial port stub. There is no link cable on the other end, so a
/// byte written to SB is simply recorded; test ROMs report through
/// this channel.
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    output: Vec<u8>,
}

/// Most recent output kept when nobody drains the buffer. A chatty ROM
/// must not grow it without bound.
pub(crate) const OUTPUT_CAP: usize = 0x4000;

impl Serial {
    pub(crate) fn new() -> Self {
        Self {
            sb: 0,
            sc: 0,
            output: Vec::new(),
        }
    }

    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
        if self.output.len() == OUTPUT_CAP {
            self.output.drain(..OUTPUT_CAP / 2);
        }
        self.output.push(value);
    }

    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }

    pub(crate) fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}
