//! Writes the JSON Schema of every example type to a directory.
//!
//! Usage: `dump-schemas [OUT_DIR]` (default: `schemas`). Set `RUST_LOG=debug`
//! to trace the builder.

use anyhow::Context;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use typeschema::{Describe, SchemaGenerator};
use typeschema_example::{GameState, Mood, Person, Point};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("schemas"));

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut generator = SchemaGenerator::new();
    write_schema::<Point>(&mut generator, &out_dir, "point")?;
    write_schema::<Person>(&mut generator, &out_dir, "person")?;
    write_schema::<Mood>(&mut generator, &out_dir, "mood")?;
    write_schema::<GameState>(&mut generator, &out_dir, "game_state")?;
    write_schema::<Vec<Person>>(&mut generator, &out_dir, "person_list")?;

    println!("Schemas written to {}", out_dir.display());
    Ok(())
}

fn write_schema<T: Describe>(
    generator: &mut SchemaGenerator,
    out_dir: &Path,
    name: &str,
) -> anyhow::Result<()> {
    let node = generator
        .schema_for::<T>()
        .with_context(|| format!("failed to build schema for {name}"))?;
    let json = generator.to_json_string(&node)?;

    let path = out_dir.join(format!("{name}.schema.json"));
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote schema");
    Ok(())
}
