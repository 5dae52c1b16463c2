//! Environment management: remove the project's virtual environment.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use stlaunch_env::env::EnvLayout;
use stlaunch_env::LaunchConfig;

use super::bootstrap::build_settings;
use crate::cli::BootstrapArgs;

/// A directory we created with `python -m venv`.
fn looks_like_venv(layout: &EnvLayout) -> bool {
    layout.root().join("pyvenv.cfg").exists() || layout.is_provisioned()
}

/// `stlaunch env clean`
pub fn cmd_clean(args: &BootstrapArgs, dry_run: bool, force: bool) -> Result<i32> {
    let settings = build_settings(args, LaunchConfig::local())?;
    let layout = EnvLayout::new(settings.env_dir());
    let root = layout.root();

    if !root.exists() {
        eprintln!("No virtual environment found at {}", root.display());
        return Ok(0);
    }
    if !root.is_dir() || !looks_like_venv(&layout) {
        anyhow::bail!(
            "{} does not look like a virtual environment (no pyvenv.cfg); refusing to remove it",
            root.display()
        );
    }

    let size = venv_footprint(root);
    eprintln!("🗂  Virtual environment: {} ({})", root.display(), human_size(size));

    if dry_run {
        eprintln!();
        eprintln!("(Dry run — no files removed. Remove --dry-run to delete.)");
        return Ok(0);
    }

    if !force {
        eprint!("\nRemove this virtual environment? [y/N] ");
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            eprintln!("Cancelled.");
            return Ok(0);
        }
    }

    fs::remove_dir_all(root).with_context(|| format!("remove {}", root.display()))?;
    tracing::info!(env = %root.display(), "virtual environment removed");
    eprintln!("✓ Removed {}, freed {}", root.display(), human_size(size));
    Ok(0)
}

/// Bytes held by regular files under the venv. Symlinks such as
/// `bin/python` point at the base interpreter and are not counted.
fn venv_footprint(root: &Path) -> u64 {
    let mut total = 0;
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            match entry.file_type() {
                Ok(t) if t.is_dir() => pending.push(entry.path()),
                Ok(t) if t.is_file() => total += entry.metadata().map(|m| m.len()).unwrap_or(0),
                _ => {}
            }
        }
    }
    total
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_for(dir: &Path) -> BootstrapArgs {
        BootstrapArgs {
            workdir: Some(dir.to_path_buf()),
            env_dir: Some(PathBuf::from("venv")),
            ..Default::default()
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(human_size(2048 * 1024 * 1024 * 1024), "2048.0 GB");
    }

    #[test]
    fn test_venv_footprint_walks_site_packages() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib").join("site-packages")).unwrap();
        fs::write(tmp.path().join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        fs::write(tmp.path().join("lib").join("site-packages").join("x.py"), "12345").unwrap();
        assert_eq!(venv_footprint(tmp.path()), 16 + 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_venv_footprint_skips_interpreter_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("python3.11");
        fs::write(&base, vec![0u8; 4096]).unwrap();
        let venv = tmp.path().join("venv");
        fs::create_dir_all(venv.join("bin")).unwrap();
        fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        std::os::unix::fs::symlink(&base, venv.join("bin").join("python")).unwrap();
        assert_eq!(venv_footprint(&venv), 16);
    }

    #[test]
    fn test_clean_force_removes_venv() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        assert_eq!(cmd_clean(&args_for(tmp.path()), false, true).unwrap(), 0);
        assert!(!venv.exists());
    }

    #[test]
    fn test_clean_dry_run_keeps_venv() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        cmd_clean(&args_for(tmp.path()), true, true).unwrap();
        assert!(venv.exists());
    }

    #[test]
    fn test_clean_refuses_unrelated_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join("venv");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("notes.txt"), "keep me").unwrap();
        assert!(cmd_clean(&args_for(tmp.path()), false, true).is_err());
        assert!(venv.join("notes.txt").exists());
    }
}
