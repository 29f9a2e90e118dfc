//! Logger setup for applications embedding the library.

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialize env_logger with sane defaults.
///
/// Consumers that configure their own logger should skip this and set
/// `RUST_LOG` themselves; calling it twice is harmless (the second init
/// fails quietly).
pub fn init() {
    let env = Env::default().filter_or("RUST_LOG", "warn,voxbook=info");

    let mut builder = Builder::from_env(env);
    let _ = builder
        .filter_module("symphonia", LevelFilter::Error)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}
