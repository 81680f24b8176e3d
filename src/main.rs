use std::process::ExitCode;

use anyhow::Result;
use log::debug;

use iconforge::{Config, IconError, IconGenerator};

fn main() -> ExitCode {
    // .env 需要在 logger 之前加载, 这样 RUST_LOG 才能生效
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("[!] Error: {err}");
            match err.downcast_ref::<IconError>() {
                Some(icon_err) => {
                    if let Some(hint) = icon_err.hint() {
                        println!("   {hint}");
                    } else {
                        eprintln!("{err:?}");
                    }
                    ExitCode::from(icon_err.exit_code())
                }
                None => {
                    eprintln!("{err:?}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run() -> Result<()> {
    let config = Config::from_env();
    let mut generator = IconGenerator::new(config);
    let written = generator.run()?;
    debug!("Wrote {} icons", written.len());
    Ok(())
}
