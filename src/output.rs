use owo_colors::OwoColorize;

use crate::config::Config;
use crate::migrate::MigrationReport;

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// such as the final summary which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Effective configuration, one `key = value` line each, for `--print-config`.
pub fn print_config(cfg: &Config, source: Option<&std::path::Path>) {
    let list = |v: &[std::path::PathBuf]| {
        v.iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    match source {
        Some(p) => print_info(&format!("Config file: {}", p.display())),
        None => print_info("Config file: none (built-in defaults)"),
    }
    print_user(&format!("old_package = {}", cfg.old_package));
    print_user(&format!("new_package = {}", cfg.new_package));
    print_user(&format!("project_root = {}", cfg.project_root.display()));
    print_user(&format!("package_root = {}", cfg.package_root.display()));
    print_user(&format!("code_roots = {}", list(&cfg.code_roots)));
    print_user(&format!("keep_paths = {}", list(&cfg.keep_paths)));
    print_user(&format!("descriptor = {}", cfg.descriptor.display()));
    print_user(&format!("rules_file = {}", cfg.rules_file.display()));
    print_user(&format!("performance_file = {}", cfg.performance_file.display()));
    print_user(&format!("text_extensions = {}", cfg.text_extensions.join(", ")));
    print_user(&format!("binary_extensions = {}", cfg.binary_extensions.join(", ")));
    print_user(&format!("enable_hardening = {}", cfg.enable_hardening));
    print_user(&format!("strict = {}", cfg.strict));
    print_user(&format!("log_level = {}", cfg.log_level));
    if let Some(lf) = &cfg.log_file {
        print_user(&format!("log_file = {}", lf.display()));
    }
}

/// Operator summary of a finished run.
pub fn print_report(report: &MigrationReport) {
    print_user(&format!("Migrated {}", report.identifier));

    for tree in &report.trees {
        if tree.source_missing {
            print_warn(&format!(
                "Old package directory not found, nothing moved: {}",
                tree.source.display()
            ));
        }
    }

    for v in &report.verifications {
        if v.matched() {
            print_success(&format!(
                "{} files migrated successfully to {}",
                v.old_count(),
                v.dest.display()
            ));
            continue;
        }
        print_warn(&format!(
            "File count mismatch: {} in {} vs {} in {}",
            v.old_count(),
            v.source.display(),
            v.new_count(),
            v.dest.display()
        ));
        print_user("Old package files:");
        for f in &v.old_files {
            print_user(&format!("  {}", f.display()));
        }
        print_user("New package files:");
        for f in &v.new_files {
            print_user(&format!("  {}", f.display()));
        }
    }

    for kept in &report.retained {
        print_warn(&format!("Old package directory kept: {}", kept.display()));
    }
    for c in &report.cleanups {
        if c.removed {
            print_info(&format!("Deleted old package directory: {}", c.source.display()));
        }
        for dir in &c.pruned {
            print_info(&format!("Removed empty directory: {}", dir.display()));
        }
        for e in &c.errors {
            print_warn(e);
        }
    }

    for p in report.files_unmatched() {
        print_warn(&format!("Unmatched file copied as-is, review manually: {}", p.display()));
    }
    for f in report.failures() {
        print_error(&f.to_string());
    }

    if report.residual_hits.is_empty() {
        print_success("No references to the old package remain");
    } else {
        for hit in &report.residual_hits {
            print_warn(&format!("Old package reference in {}", hit.path.display()));
        }
    }

    if report.descriptor_patched {
        print_info("Build descriptor updated");
    }
    for p in &report.policy_files {
        print_info(&format!("Wrote {}", p.display()));
    }
    for e in &report.post_errors {
        print_error(e);
    }

    print_user(&format!(
        "Rewritten: {}  Copied: {}  Resources updated: {}  Failures: {}",
        report.files_rewritten(),
        report.files_copied(),
        report.residual.rewritten.len(),
        report.failures().count()
    ));
}
