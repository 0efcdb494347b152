//! Command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let result = match args.next() {
        Some(script) => folio_app::load_config(args.next().as_deref())
            .and_then(|config| pollster::block_on(folio_app::run(&script, config))),
        None => Err(folio_app::AppError::Usage),
    };

    match result {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
