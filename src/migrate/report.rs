//! Aggregated, operator-facing outcome of one run. Never persisted.

use std::path::PathBuf;

use super::cleanup::{CleanupOutcome, ResidualHit};
use super::identifier::Identifier;
use super::residual::ResidualReport;
use super::tree::TreeReport;
use super::verify::VerifyOutcome;
use crate::errors::{FileError, exit};

#[derive(Debug)]
pub struct MigrationReport {
    pub identifier: Identifier,
    pub trees: Vec<TreeReport>,
    pub residual: ResidualReport,
    pub verifications: Vec<VerifyOutcome>,
    pub cleanups: Vec<CleanupOutcome>,
    /// Old subtrees left in place because strict verification failed.
    pub retained: Vec<PathBuf>,
    pub residual_hits: Vec<ResidualHit>,
    pub descriptor_patched: bool,
    pub policy_files: Vec<PathBuf>,
    /// Failures of the post-migration project-file writers.
    pub post_errors: Vec<String>,
    pub strict: bool,
}

impl MigrationReport {
    pub fn new(identifier: Identifier, strict: bool) -> Self {
        Self {
            identifier,
            trees: Vec::new(),
            residual: ResidualReport::default(),
            verifications: Vec::new(),
            cleanups: Vec::new(),
            retained: Vec::new(),
            residual_hits: Vec::new(),
            descriptor_patched: false,
            policy_files: Vec::new(),
            post_errors: Vec::new(),
            strict,
        }
    }

    pub fn files_rewritten(&self) -> usize {
        self.trees.iter().map(|t| t.rewritten.len()).sum()
    }

    pub fn files_copied(&self) -> usize {
        self.trees
            .iter()
            .map(|t| t.copied_binary.len() + t.unmatched.len())
            .sum()
    }

    pub fn files_unmatched(&self) -> impl Iterator<Item = &PathBuf> {
        self.trees.iter().flat_map(|t| t.unmatched.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileError> {
        self.trees
            .iter()
            .flat_map(|t| t.failures.iter())
            .chain(self.residual.failures.iter())
    }

    pub fn old_count(&self) -> usize {
        self.verifications.iter().map(VerifyOutcome::old_count).sum()
    }

    pub fn new_count(&self) -> usize {
        self.verifications.iter().map(VerifyOutcome::new_count).sum()
    }

    pub fn has_mismatch(&self) -> bool {
        self.verifications.iter().any(|v| !v.matched())
    }

    /// 0 when the run completed (warnings included); 3 when strict
    /// verification kept an old subtree.
    pub fn exit_code(&self) -> u8 {
        if self.strict && self.has_mismatch() {
            exit::VERIFY_FAILED
        } else {
            exit::COMPLETED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(old: usize, new: usize) -> VerifyOutcome {
        VerifyOutcome {
            source: PathBuf::from("old"),
            dest: PathBuf::from("new"),
            old_files: (0..old).map(|i| PathBuf::from(format!("o{i}"))).collect(),
            new_files: (0..new).map(|i| PathBuf::from(format!("n{i}"))).collect(),
        }
    }

    #[test]
    fn mismatch_is_only_fatal_in_strict_mode() {
        let id = Identifier::new("a.b", "c.d").unwrap();
        let mut lenient = MigrationReport::new(id.clone(), false);
        lenient.verifications.push(outcome(2, 1));
        assert!(lenient.has_mismatch());
        assert_eq!(lenient.exit_code(), exit::COMPLETED);

        let mut strict = MigrationReport::new(id, true);
        strict.verifications.push(outcome(2, 1));
        assert_eq!(strict.exit_code(), exit::VERIFY_FAILED);
        assert_eq!((strict.old_count(), strict.new_count()), (2, 1));
    }
}
