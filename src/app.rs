//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler
//! and runs the migration pipeline, mapping the outcome to an exit code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;

use pkg_migrate::cli::Args;
use pkg_migrate::output as out;
use pkg_migrate::{
    Config, MigrateError, create_template_config, exit, find_config_path, load_config_from_xml_path,
    migrate,
};

use crate::logging::init_tracing;

/// Defaults < XML file < CLI flags. Returns the config and the file it came from.
fn build_config(args: &Args) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let mut cfg = Config::default();
    let root = args
        .project_root
        .clone()
        .unwrap_or_else(|| cfg.project_root.clone());
    let source = find_config_path(args.config.as_deref(), &root);
    if let Some(path) = &source {
        cfg = load_config_from_xml_path(path, cfg)?;
    }
    args.apply_overrides(&mut cfg);
    Ok((cfg, source))
}

fn init_config(args: &Args, path: &Path) -> ExitCode {
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    match create_template_config(path, &cfg) {
        Ok(()) => {
            out::print_success(&format!("A template config was written to: {}", path.display()));
            out::print_info("Edit it, then run again with --config or place it in the project root.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::from(exit::SETUP)
        }
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> ExitCode {
    // Before logging init: these only print and exit.
    if let Some(path) = args.init_config.as_deref() {
        return init_config(&args, path);
    }

    let (cfg, source) = match build_config(&args) {
        Ok(v) => v,
        Err(e) => {
            out::print_error(&format!("Invalid configuration: {e:#}"));
            return ExitCode::from(exit::SETUP);
        }
    };

    if args.print_config {
        out::print_config(&cfg, source.as_deref());
        return ExitCode::SUCCESS;
    }

    let guard_opt: Option<WorkerGuard> =
        match init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json) {
            Ok(g) => g,
            Err(e) => {
                out::print_error(&format!("Failed to initialize logging: {e}"));
                return ExitCode::from(exit::SETUP);
            }
        };

    // The run is not cancellable mid-stage; an interrupt flushes logs and leaves.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            out::print_warn("Interrupted; the project tree may be partially migrated.");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
            std::process::exit(exit::INTERRUPTED);
        }) {
            debug!(error = %e, "Interrupt handler not installed");
        }
    }

    debug!(?args, "Starting pkg_migrate");

    let code = match migrate::run(&cfg) {
        Ok(report) => {
            out::print_report(&report);
            ExitCode::from(report.exit_code())
        }
        Err(MigrateError::AlreadyMigrated(path)) => {
            debug!(path = %path.display(), "Descriptor already references the new package");
            out::print_info("Package name already updated.");
            ExitCode::from(exit::ALREADY_MIGRATED)
        }
        Err(e) => {
            error!(code = e.exit_code(), kind = e.kind(), error = %e, "Migration aborted");
            out::print_error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    };

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    code
}
