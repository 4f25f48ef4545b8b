mod args;
mod shadow;

use clap::Parser;
use log::{info, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::shadow::DisplayOverrides;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    let overrides = DisplayOverrides {
        page: args.page,
        on_each_side: args.on_each_side,
        bar_slots: args.bar_slots,
    };

    let res = shadow::run_report(args.config, args.reference, args.out, &overrides);
    if let Err(e) = res {
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
