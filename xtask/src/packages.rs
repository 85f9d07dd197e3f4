use std::process::Command;

use anyhow::{Context, Result};

/// Workspace crates, lowest layer first
const PACKAGES: &[&str] =
    &["timebook-common", "timebook-domain", "timebook-core", "timebook-infra", "timebook-server"];

/// Check that every crate compiles on its own, without features unified by
/// its dependents.
pub fn check_packages() -> Result<()> {
    println!("Checking {} timebook crates in isolation...", PACKAGES.len());

    for (index, package) in PACKAGES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {package} --all-targets", index + 1, PACKAGES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", package, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{package}'"))?;

        if !status.success() {
            anyhow::bail!("Package '{package}' failed to compile on its own");
        }

        println!("✅ {package} compiled successfully");
    }

    println!("\n✅ All {} crates compile in isolation!", PACKAGES.len());
    Ok(())
}
