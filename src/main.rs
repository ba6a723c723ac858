use std::panic;

use clap::Parser;
use renko_lens::{Cli, run_cli};

fn init_log(verbose: u8) {
    let (global_level, my_code_level) = match verbose {
        0 if cfg!(debug_assertions) => (log::LevelFilter::Warn, log::LevelFilter::Info),
        0 => (log::LevelFilter::Error, log::LevelFilter::Warn),
        1 => (log::LevelFilter::Info, log::LevelFilter::Info),
        _ => (log::LevelFilter::Info, log::LevelFilter::Debug),
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("renko_lens"), my_code_level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let args = Cli::parse();
    init_log(args.verbose);

    run_cli(args)
}
