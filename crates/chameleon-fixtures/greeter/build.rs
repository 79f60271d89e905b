//! Build script: generate the entry point and descriptor for every platform
//! listed in `Chameleon.toml`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    chameleon_codegen::build()?;
    Ok(())
}
