/// Runtime trace switches, wired from the CLI into the CPU core.
///
/// Each flag gates a family of `log::trace!` lines. Keeping them as plain
/// booleans on the CPU means the hot path pays a single branch per family
/// when tracing is disabled.
#[derive(Copy, Clone, Debug, Default)]
pub struct TraceConfig {
    /// One line per executed instruction: PC, mnemonic, register file.
    pub cpu: bool,
    /// Taken / not-taken decisions for conditional control flow.
    pub flow: bool,
    /// Resolved targets of jumps, calls, returns, and interrupt entries.
    pub jumps: bool,
}
