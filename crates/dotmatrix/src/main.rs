use clap::Parser;
use dotmatrix::Args;

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = dotmatrix::run(args) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
