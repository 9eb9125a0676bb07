//! Build script for spotcli.
//!
//! Copies the `.env.example` configuration template into the user's config
//! directory so that a ready-to-edit template sits next to the place where the
//! application looks for its `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the spotcli config directory.
///
/// # Destination Location
///
/// - Linux: `~/.config/spotcli/.env.example`
/// - macOS: `~/Library/Application Support/spotcli/.env.example`
/// - Windows: `%APPDATA%/spotcli/.env.example`
///
/// A missing template only produces a cargo warning. Directory creation and
/// copy failures abort the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotcli");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
