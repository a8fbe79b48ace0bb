//! Pretty-print a raw state image.
//!
//! ```text
//! vmstate-dump <image> [--registers | --memory]
//! ```
//!
//! Set `VMSTATE_LOG` (e.g. `debug`) to see decoding details on stderr.

mod logger;

use log::{error, info};
use std::process::ExitCode;
use std::{env, fs, io};
use vmstate::VmState;

use crate::logger::StderrLogger;

fn main() -> ExitCode {
    if let Err(e) = StderrLogger::from_env().init() {
        eprintln!("failed to install logger: {e}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("vmstate-dump: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // args: <image> [--registers | --memory]
    let mut args = env::args().skip(1);
    let path = args.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: vmstate-dump <image> [--registers | --memory]",
        )
    })?;
    let (show_registers, show_memory) = match args.next().as_deref() {
        None => (true, true),
        Some("--registers") => (true, false),
        Some("--memory") => (false, true),
        Some(other) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown option {other}"),
            )
            .into());
        }
    };

    let image = fs::read(&path)?;
    info!("read {} bytes from {path}", image.len());
    let state = VmState::from_raw(&image)?;
    print!("{}", state.dump(show_registers, show_memory));
    Ok(())
}
