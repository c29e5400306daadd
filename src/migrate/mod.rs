//! Migration engine.
//!
//! Fixed sequence, single-threaded, blocking:
//! validate → guard → migrate trees → rewrite retained paths → verify →
//! cleanup → residual scan → project files.
//!
//! File-level problems are logged and collected in the report; only
//! validation and the guard can end the run early.

pub mod classify;
pub mod cleanup;
pub mod decode;
pub mod fsio;
pub mod guard;
pub mod identifier;
pub mod report;
pub mod residual;
pub mod tree;
pub mod verify;

pub use classify::{ExtensionPolicy, Treatment};
pub use cleanup::{CleanupOutcome, ResidualHit, prune_empty_parents, remove_source, scan_residual};
pub use decode::{Decoded, read_text};
pub use guard::check_and_apply;
pub use identifier::{Identifier, Rewriter};
pub use report::MigrationReport;
pub use residual::{ResidualReport, rewrite_in_place};
pub use tree::{TreeReport, migrate_tree};
pub use verify::{VerifyOutcome, verify};

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::MigrateError;
use crate::project;

/// A package directory relocated from `source` to `dest`. Empty ancestors of
/// `source` are pruned up to, but not including, `boundary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPair {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub boundary: PathBuf,
}

/// Execute one full migration run against `cfg`.
pub fn run(cfg: &Config) -> Result<MigrationReport, MigrateError> {
    cfg.validate()?;
    let identifier = cfg.identifier()?;
    let rewriter = Rewriter::new(&identifier)?;
    let policy = cfg.extension_policy()?;
    let pairs = cfg.migration_pairs(&identifier);

    info!(old = identifier.old(), new = identifier.new_name(), "Starting package migration");
    for pair in &pairs {
        info!(old = %pair.source.display(), new = %pair.dest.display(), "Package path pair");
    }

    check_and_apply(&cfg.descriptor_path(), &rewriter)?;

    let mut report = MigrationReport::new(identifier.clone(), cfg.strict);

    for pair in &pairs {
        report
            .trees
            .push(migrate_tree(&pair.source, &pair.dest, &rewriter, &policy));
    }

    let excluded: Vec<PathBuf> = pairs
        .iter()
        .flat_map(|p| [p.source.clone(), p.dest.clone()])
        .collect();
    report.residual = rewrite_in_place(&cfg.keep_roots(), &rewriter, &policy, &excluded);

    for (pair, tree) in pairs.iter().zip(&report.trees) {
        if tree.source_missing {
            continue;
        }
        let outcome = verify(&pair.source, &pair.dest);
        if outcome.matched() {
            info!(count = outcome.old_count(), "Files migrated successfully");
        } else {
            warn!(
                old = outcome.old_count(),
                new = outcome.new_count(),
                source = %pair.source.display(),
                "File count mismatch between old and new package"
            );
        }
        let keep_old = cfg.strict && !outcome.matched();
        report.verifications.push(outcome);
        if keep_old {
            warn!(path = %pair.source.display(), "Strict mode: old package directory kept");
            report.retained.push(pair.source.clone());
            continue;
        }
        report.cleanups.push(remove_source(&pair.source, &pair.boundary));
    }

    report.residual_hits = scan_residual(&cfg.scan_root(), &identifier);

    apply_project_files(cfg, &identifier, &mut report);

    info!(
        rewritten = report.files_rewritten(),
        copied = report.files_copied(),
        residual_hits = report.residual_hits.len(),
        "Refactoring completed"
    );
    Ok(report)
}

/// Descriptor hardening and policy files. Failures are recorded, not fatal:
/// by now the tree has already been relocated.
fn apply_project_files(cfg: &Config, identifier: &Identifier, report: &mut MigrationReport) {
    if cfg.enable_hardening {
        let rules = cfg.resolve(&cfg.rules_file);
        match project::write_rules(&rules, identifier.new_name()) {
            Ok(()) => report.policy_files.push(rules),
            Err(e) => {
                error!(error = %e, "Cannot write retention rules");
                report.post_errors.push(e.to_string());
            }
        }
    }

    match project::patch_file(&cfg.descriptor_path(), cfg.enable_hardening) {
        Ok(changed) => report.descriptor_patched = changed,
        Err(e) => {
            error!(error = %e, "Cannot patch descriptor");
            report.post_errors.push(e.to_string());
        }
    }

    let perf = cfg.resolve(&cfg.performance_file);
    match project::write_performance(&perf) {
        Ok(()) => report.policy_files.push(perf),
        Err(e) => {
            error!(error = %e, "Cannot write performance properties");
            report.post_errors.push(e.to_string());
        }
    }
}
