//! Binary entry point for `relkit`.

use std::process;

fn main() {
    if let Err(e) = relkit::run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
