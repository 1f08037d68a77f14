//! Drives the rule engine and combinator pipeline in the order the CLI
//! needs (§4.5): load the target, optionally short-circuit into keyspace
//! reporting, run a baseline pipeline pass, then one additional pass per
//! non-noop target rule.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::combinator::pipeline::{dedupe_augmented, prepare_augmented, run_pipeline, PipelineArgs};
use crate::error::{CombError, Result};
use crate::keyspace::{calculate_keyspace, KeyspaceArgs};
use crate::rules::file::load_rule_file;
use crate::rules::parse::format_rule_line;
use crate::rules::{apply_many, RuleLine};
use crate::wordlist::{expand_wordlist_paths, load_target_file, load_wordlist};

/// Resolved arguments driving one orchestrator run (CLI flags, already
/// merged with any config-file defaults by `main.rs`).
pub struct OrchestratorArgs {
    pub target: PathBuf,
    pub wordlists: Vec<PathBuf>,
    pub min_target: usize,
    pub max_target: usize,
    pub target_rules: Option<PathBuf>,
    pub wordlist_rules: Option<PathBuf>,
    pub separator: Vec<u8>,
    pub output_file: Option<PathBuf>,
    pub keyspace: bool,
    pub skip: u64,
    pub limit: Option<u64>,
    pub self_combination: bool,
    pub partial_deduplicate: bool,
    pub workers: usize,
}

/// Orchestrator handler: owns the resolved args and drives one run.
pub struct Orchestrator {
    args: OrchestratorArgs,
}

impl Orchestrator {
    pub fn new(args: OrchestratorArgs) -> Self {
        Self { args }
    }

    /// Execute the full run: validate flags, load inputs, emit (or, in
    /// keyspace mode, report the count of) candidates.
    pub fn run(&self) -> Result<()> {
        self.validate_flags()?;

        let target = load_target_file(&self.args.target)?;
        info!(
            words = target.len(),
            path = %self.args.target.display(),
            "loaded target file"
        );

        let wordlists = self.load_effective_wordlists()?;
        let wordlist_total: u64 = wordlists.iter().map(|w| w.len() as u64).sum();

        if self.args.keyspace {
            return self.report_keyspace(&target, wordlist_total);
        }

        let mut writer = self.open_writer()?;

        self.run_baseline_pass(&target, &wordlists, &mut writer)?;

        if let Some(rules_path) = self.args.target_rules.clone() {
            self.run_target_rule_passes(&rules_path, &target, &wordlists, &mut writer)?;
        }

        info!("done");
        Ok(())
    }

    fn validate_flags(&self) -> Result<()> {
        if self.args.min_target == 0 {
            return Err(CombError::InvalidFlags(
                "min-target must be at least 1".to_string(),
            ));
        }
        if self.args.min_target > self.args.max_target {
            return Err(CombError::InvalidFlags(
                "min-target must not exceed max-target".to_string(),
            ));
        }
        if self.args.partial_deduplicate && self.args.keyspace {
            return Err(CombError::InvalidFlags(
                "--partial-deduplicate and --keyspace are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    fn open_writer(&self) -> Result<Box<dyn Write + Send>> {
        match &self.args.output_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .write(true)
                    .open(path)?;
                Ok(Box::new(file))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }

    /// Load every wordlist path (expanding directories), applying
    /// `--wordlist-rules` in file order when set (§4.3.2): the effective
    /// word set for a wordlist is the concatenation, rule by rule, of
    /// `applyRuleCPU(rule, W)`, not a single composed rule application.
    fn load_effective_wordlists(&self) -> Result<Vec<Vec<Vec<u8>>>> {
        let paths = expand_wordlist_paths(&self.args.wordlists);
        let wordlist_rules = match &self.args.wordlist_rules {
            Some(path) => load_rule_file(path)?,
            None => Vec::new(),
        };

        let mut out = Vec::with_capacity(paths.len());
        for path in &paths {
            let words = load_wordlist(path);
            debug!(path = %path.display(), words = words.len(), "loaded wordlist");
            if wordlist_rules.is_empty() {
                out.push(words);
            } else {
                out.push(apply_rules_concat(&wordlist_rules, &words));
            }
        }
        Ok(out)
    }

    fn run_baseline_pass<W: Write + Send>(
        &self,
        target: &[Vec<u8>],
        wordlists: &[Vec<Vec<u8>>],
        writer: &mut W,
    ) -> Result<()> {
        debug!("running baseline pass");
        run_pipeline(self.pipeline_args(target, &[], wordlists), writer)
    }

    fn run_target_rule_passes<W: Write + Send>(
        &self,
        rules_path: &Path,
        target: &[Vec<u8>],
        wordlists: &[Vec<Vec<u8>>],
        writer: &mut W,
    ) -> Result<()> {
        let rules = load_rule_file(rules_path)?;
        for rule in &rules {
            if rule.is_pure_noop() {
                continue;
            }
            debug!(rule = %format_rule_line(rule), "applying target rule");
            let augmented = self.build_augmented(target, rule);
            if augmented.is_empty() {
                continue;
            }
            run_pipeline(self.pipeline_args(target, &augmented, wordlists), writer)?;
        }
        Ok(())
    }

    /// Build the augmented target list for one target rule, honoring
    /// `--partial-deduplicate` (§4.3.4).
    fn build_augmented(&self, target: &[Vec<u8>], rule: &RuleLine) -> Vec<Vec<u8>> {
        let raw = apply_many(rule, target);
        if self.args.partial_deduplicate {
            prepare_augmented(target, &raw)
        } else {
            dedupe_augmented(&raw)
        }
    }

    fn pipeline_args<'a>(
        &'a self,
        base: &'a [Vec<u8>],
        augmented: &'a [Vec<u8>],
        wordlists: &'a [Vec<Vec<u8>>],
    ) -> PipelineArgs<'a> {
        PipelineArgs {
            base,
            augmented,
            min_target: self.args.min_target,
            max_target: self.args.max_target,
            self_combination: self.args.self_combination,
            separator: &self.args.separator,
            wordlists,
            skip: self.args.skip,
            limit: self.args.limit,
            workers: self.args.workers,
        }
    }

    fn report_keyspace(&self, target: &[Vec<u8>], wordlist_total: u64) -> Result<()> {
        let target_rule_augment_lens = match &self.args.target_rules {
            Some(rules_path) => {
                let rules = load_rule_file(rules_path)?;
                rules
                    .iter()
                    .filter(|r| !r.is_pure_noop())
                    .map(|rule| self.build_augmented(target, rule).len() as u64)
                    .collect()
            }
            None => Vec::new(),
        };

        let keyspace_args = KeyspaceArgs {
            target_len: target.len() as u64,
            min_target: self.args.min_target as u64,
            max_target: self.args.max_target as u64,
            self_combination: self.args.self_combination,
            wordlist_total,
            target_rule_augment_lens,
        };

        println!("{}", calculate_keyspace(&keyspace_args));
        Ok(())
    }
}

/// The concatenation, rule by rule in file order, of `applyRuleCPU(rule,
/// words)` for every rule in `rules` — not a single composed transform.
fn apply_rules_concat(rules: &[RuleLine], words: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let mut out = Vec::with_capacity(rules.len() * words.len());
    for rule in rules {
        out.extend(apply_many(rule, words));
    }
    out
}

/// Run the orchestrator end to end; the convenience entry point `main.rs`
/// calls after parsing flags and loading config.
pub fn run(args: OrchestratorArgs) -> Result<()> {
    Orchestrator::new(args).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Op;
    use tempfile::{NamedTempFile, TempDir};

    fn write_lines(path: &Path, lines: &[&str]) {
        std::fs::write(path, lines.join("\n") + "\n").unwrap();
    }

    fn base_args(target: PathBuf) -> OrchestratorArgs {
        OrchestratorArgs {
            target,
            wordlists: vec![],
            min_target: 1,
            max_target: 2,
            target_rules: None,
            wordlist_rules: None,
            separator: Vec::new(),
            output_file: None,
            keyspace: false,
            skip: 0,
            limit: None,
            self_combination: true,
            partial_deduplicate: false,
            workers: 1,
        }
    }

    #[test]
    fn rejects_zero_min_target() {
        let file = NamedTempFile::new().unwrap();
        let mut args = base_args(file.path().to_path_buf());
        args.min_target = 0;
        let result = Orchestrator::new(args).run();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        let file = NamedTempFile::new().unwrap();
        let mut args = base_args(file.path().to_path_buf());
        args.min_target = 3;
        args.max_target = 1;
        let result = Orchestrator::new(args).run();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_partial_dedup_with_keyspace() {
        let file = NamedTempFile::new().unwrap();
        let mut args = base_args(file.path().to_path_buf());
        args.partial_deduplicate = true;
        args.keyspace = true;
        let result = Orchestrator::new(args).run();
        assert!(matches!(result, Err(CombError::InvalidFlags(_))));
    }

    #[test]
    fn rejects_directory_target() {
        let dir = TempDir::new().unwrap();
        let args = base_args(dir.path().to_path_buf());
        let result = Orchestrator::new(args).run();
        assert!(result.is_err());
    }

    #[test]
    fn baseline_pass_writes_to_output_file() {
        let target = NamedTempFile::new().unwrap();
        write_lines(target.path(), &["a", "b"]);

        let out_dir = TempDir::new().unwrap();
        let out_path = out_dir.path().join("out.txt");

        let mut args = base_args(target.path().to_path_buf());
        args.output_file = Some(out_path.clone());
        args.max_target = 2;

        Orchestrator::new(args).run().unwrap();

        let content = std::fs::read_to_string(&out_path).unwrap();
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort();
        let mut expected = vec!["a", "b", "ab", "ba"];
        expected.sort();
        assert_eq!(lines, expected);
    }

    #[test]
    fn target_rule_pass_augments_baseline() {
        let target = NamedTempFile::new().unwrap();
        write_lines(target.path(), &["ab"]);

        let rules = NamedTempFile::new().unwrap();
        write_lines(rules.path(), &["u"]);

        let out_dir = TempDir::new().unwrap();
        let out_path = out_dir.path().join("out.txt");

        let mut args = base_args(target.path().to_path_buf());
        args.output_file = Some(out_path.clone());
        args.min_target = 1;
        args.max_target = 1;
        args.target_rules = Some(rules.path().to_path_buf());

        Orchestrator::new(args).run().unwrap();

        let content = std::fs::read_to_string(&out_path).unwrap();
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["AB", "ab"]);
    }

    #[test]
    fn pure_noop_rule_line_is_skipped() {
        let target = NamedTempFile::new().unwrap();
        write_lines(target.path(), &["ab"]);

        let rules = NamedTempFile::new().unwrap();
        write_lines(rules.path(), &[":"]);

        let out_dir = TempDir::new().unwrap();
        let out_path = out_dir.path().join("out.txt");

        let mut args = base_args(target.path().to_path_buf());
        args.output_file = Some(out_path.clone());
        args.min_target = 1;
        args.max_target = 1;
        args.target_rules = Some(rules.path().to_path_buf());

        Orchestrator::new(args).run().unwrap();

        let content = std::fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["ab"]);
    }

    #[test]
    fn keyspace_mode_prints_count_without_emitting() {
        let target = NamedTempFile::new().unwrap();
        write_lines(target.path(), &["a", "b", "c"]);

        let mut args = base_args(target.path().to_path_buf());
        args.min_target = 2;
        args.max_target = 2;
        args.keyspace = true;

        let result = Orchestrator::new(args).run();
        assert!(result.is_ok());
    }

    #[test]
    fn build_augmented_respects_partial_dedup_flag() {
        let target = vec![b"ab".to_vec(), b"AB".to_vec()];
        let rule = RuleLine {
            ops: vec![Op::Uppercase],
        };

        let mut without_dedup_args = base_args(PathBuf::from("/unused"));
        without_dedup_args.partial_deduplicate = false;
        let without_dedup = Orchestrator::new(without_dedup_args).build_augmented(&target, &rule);
        assert_eq!(without_dedup, vec![b"AB".to_vec()]);

        let mut with_dedup_args = base_args(PathBuf::from("/unused"));
        with_dedup_args.partial_deduplicate = true;
        let with_dedup = Orchestrator::new(with_dedup_args).build_augmented(&target, &rule);
        assert!(with_dedup.is_empty());
    }
}
