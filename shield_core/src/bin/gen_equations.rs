//! Writes the shielding equations reference.
//!
//! Renders every NCRP 147 relation in the registry (kerma, transmission,
//! Archer model, table lookup) to markdown. Run from the workspace root:
//!
//! ```bash
//! cargo run --bin gen-equations [output.md]
//! ```
//!
//! Without an argument the file goes to `shield_core/src/equations/EQUATIONS.md`.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use shield_core::equations::{generate_equations_markdown, ALL_EQUATIONS};

const DEFAULT_OUTPUT: &str = "shield_core/src/equations/EQUATIONS.md";

fn main() {
    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let markdown = generate_equations_markdown();
    if let Err(e) = fs::write(&output, &markdown) {
        eprintln!("cannot write {}: {}", output.display(), e);
        process::exit(1);
    }
    println!("{} equations -> {}", ALL_EQUATIONS.len(), output.display());
}
