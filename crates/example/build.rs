use std::env;
use std::fs;
use std::path::PathBuf;
use typeschema::{SchemaGenerator, TypeDef};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut generator = SchemaGenerator::new();

    // Automatically extract all types annotated with #[derive(JsonSchema)]
    generator
        .add_source_file(manifest_dir.join("src/lib.rs"))
        .expect("Failed to parse source file");

    let targets = [
        ("Point", TypeDef::named("Point")),
        ("Person", TypeDef::named("Person")),
        ("Mood", TypeDef::named("Mood")),
        ("GameState", TypeDef::named("GameState")),
        ("PersonList", TypeDef::vec(TypeDef::named("Person"))),
    ];

    for (file_stem, ty) in targets {
        let json = generator
            .generate(&ty)
            .expect("Failed to generate schema");
        fs::write(out_dir.join(format!("{file_stem}.schema.json")), json)
            .expect("Failed to write schema");
    }

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
