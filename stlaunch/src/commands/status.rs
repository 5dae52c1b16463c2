//! `stlaunch status`: report bootstrap state without mutating anything.

use anyhow::Result;

use stlaunch_env::process::SystemRunner;
use stlaunch_env::{Bootstrapper, LaunchConfig, StatusReport};

use super::bootstrap::{build_settings, cloud_launch_config};
use crate::cli::BootstrapArgs;

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn render(report: &StatusReport) -> String {
    let mut lines = Vec::new();
    match (&report.interpreter, &report.interpreter_error) {
        (Some(i), _) => lines.push(format!(
            "{} Interpreter:  {} ({}) at {}",
            mark(true),
            i.name,
            i.version,
            i.path.display()
        )),
        (None, err) => lines.push(format!(
            "{} Interpreter:  {}",
            mark(false),
            err.as_deref().unwrap_or("not found")
        )),
    }
    lines.push(format!(
        "{} Environment:  {}",
        mark(report.env_ready),
        report.env_dir.display()
    ));
    if report.manifest_found {
        lines.push(format!(
            "{} Dependencies: {} package(s) from {}{}",
            mark(report.deps_satisfied),
            report.packages.len(),
            report.manifest.display(),
            if report.deps_satisfied { "" } else { " (not installed)" }
        ));
    } else {
        lines.push(format!(
            "{} Dependencies: manifest {} not found",
            mark(false),
            report.manifest.display()
        ));
    }
    lines.push(format!(
        "{} Data dir:     {}",
        mark(report.data_dir_ready),
        report.data_dir.display()
    ));
    let launch = if report.launch_args.is_empty() {
        "(streamlit defaults)".to_string()
    } else {
        report.launch_args.join(" ")
    };
    lines.push(format!("  Launch flags: {}", launch));
    lines.join("\n")
}

pub fn cmd_status(args: &BootstrapArgs, cloud: bool, json: bool) -> Result<i32> {
    let launch = if cloud {
        cloud_launch_config(args, None)?
    } else {
        LaunchConfig::local()
    };
    let settings = build_settings(args, launch)?;
    let runner = SystemRunner;
    let report = Bootstrapper::new(&runner, settings).status();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&report));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report() -> StatusReport {
        StatusReport {
            interpreter: None,
            interpreter_error: Some("no usable Python interpreter found".to_string()),
            env_dir: PathBuf::from("venv"),
            env_ready: false,
            manifest: PathBuf::from("requirements.txt"),
            manifest_found: true,
            packages: vec!["streamlit".to_string(), "pandas".to_string()],
            deps_satisfied: false,
            data_dir: PathBuf::from("data"),
            data_dir_ready: true,
            launch_args: vec![],
        }
    }

    #[test]
    fn test_render_human_report() {
        let out = render(&report());
        assert!(out.contains("✗ Interpreter:  no usable Python interpreter found"));
        assert!(out.contains("✗ Environment:  venv"));
        assert!(out.contains("2 package(s) from requirements.txt (not installed)"));
        assert!(out.contains("✓ Data dir:     data"));
        assert!(out.contains("(streamlit defaults)"));
    }

    #[test]
    fn test_report_serializes() {
        let v = serde_json::to_value(report()).unwrap();
        assert_eq!(v["env_ready"], false);
        assert_eq!(v["packages"][0], "streamlit");
        assert!(v["interpreter"].is_null());
    }
}
