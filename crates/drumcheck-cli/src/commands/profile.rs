//! Show or persist the effective analysis profile.

use anyhow::Context;
use clap::Args;
use drumcheck_config::{default_profile_path, ensure_user_config_dir};
use std::path::PathBuf;

use super::common::load_settings;

#[derive(Args)]
pub struct ProfileArgs {
    /// Profile to start from instead of the user/built-in one
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the profile to this file instead of printing it
    #[arg(long, value_name = "PATH", conflicts_with = "save_default")]
    write: Option<PathBuf>,

    /// Write the profile as the user default
    #[arg(long)]
    save_default: bool,
}

pub fn run(args: ProfileArgs) -> anyhow::Result<()> {
    // Validates as well as loads, so only usable profiles are printed or saved
    let (profile, _) = load_settings(args.config.as_deref())?;

    let target = if args.save_default {
        ensure_user_config_dir()?;
        Some(default_profile_path())
    } else {
        args.write
    };

    match target {
        Some(path) => {
            profile
                .save(&path)
                .with_context(|| format!("failed to save profile to {}", path.display()))?;
            println!("Saved profile '{}' to {}", profile.name, path.display());
        }
        None => print!("{}", profile.to_toml()?),
    }

    Ok(())
}
