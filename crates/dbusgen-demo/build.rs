use std::path::PathBuf;

use dbusgen::{Generator, GeneratorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let input = manifest_dir.join("model").join("demo.json");

    println!("cargo:rerun-if-changed={}", input.display());

    let config = GeneratorConfig {
        input,
        output: out_dir.join("demo.rs"),
        ..GeneratorConfig::default()
    };
    Generator::new(config).run()?;
    Ok(())
}
