pub mod app;
pub mod cpu;
pub mod machine;
pub mod trace;

pub use app::DmgApp;
pub use machine::Dmg;
pub use trace::TraceConfig;

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Side length of the full background tilemap shown by the debug overlay.
pub const OVERLAY_SIZE: usize = 256;
/// Default integer scaling factor for the SDL frontend.
pub const SCREEN_SCALE: u32 = 4;

/// Machine cycles per LCD frame (154 lines of 114 M-cycles each).
pub const CYCLES_PER_FRAME: u32 = 17_556;
