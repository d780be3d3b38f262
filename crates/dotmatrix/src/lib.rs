use anyhow::{Context, Result};
use clap::Parser;
use dotmatrix_common::App;
use dotmatrix_dmg::{DmgApp, TraceConfig};
use dotmatrix_sdl2::{SdlContext, SdlInitInfo};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a Game Boy ROM image (.gb).
    pub rom: PathBuf,

    /// Mirror serial port output to stdout.
    #[arg(long)]
    pub serial: bool,

    /// Log every executed instruction (needs RUST_LOG=trace).
    #[arg(long)]
    pub trace_cpu: bool,

    /// Log conditional branch outcomes.
    #[arg(long)]
    pub trace_flow: bool,

    /// Log jumps, calls and returns.
    #[arg(long)]
    pub trace_jumps: bool,

    /// Show the full 256x256 background tile map instead of the LCD.
    #[arg(long)]
    pub debug_overlay: bool,
}

pub fn run(args: Args) -> Result<()> {
    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM {}", args.rom.display()))?;

    let title = args
        .rom
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dotmatrix".to_owned());

    let mut app = DmgApp::new(&rom, title.clone())?;
    app.set_trace(TraceConfig {
        cpu: args.trace_cpu,
        flow: args.trace_flow,
        jumps: args.trace_jumps,
    });
    app.set_serial_to_stdout(args.serial);
    app.set_overlay(args.debug_overlay);

    let init = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(format!("dotmatrix - {title}"))
        .build();

    SdlContext::run(init, app)
}
