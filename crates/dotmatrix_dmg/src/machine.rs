mod bus;
mod cartridge;
mod gameboy;
mod serial;
mod timer;

pub(crate) use bus::DmgBus;
pub use gameboy::Dmg;
