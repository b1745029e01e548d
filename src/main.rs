//! Desktop viewer for the ink sketch.
//!
//! `inkflow [preset.toml]` opens a window; `inkflow --schema` prints the
//! options JSON schema and exits.

#![warn(clippy::cargo)]

use inkflow::{Options, Viewer};

#[allow(clippy::print_stdout)]
fn print_schema() -> Result<(), serde_json::Error> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())?;
    println!("{schema}");
    Ok(())
}

fn main() {
    env_logger::init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--schema") {
        if let Err(e) = print_schema() {
            log::error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let mut builder = Viewer::builder();
    if let Some(path) = arg {
        builder = builder.with_preset(path);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
