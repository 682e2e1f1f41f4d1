//! One synchronization pass over every configured location.
//!
//! A pass runs three stages in order: the automatically resolved root files,
//! the section-mergeable root file, then every configured subfolder with the
//! operator choosing between diverging copies. Each logical file is handled
//! independently; a failure on one is logged and the pass moves on.

use crate::config::{Config, Location};
use crate::conflicts::{ResolveMode, SyncDecision, classify, differing_from};
use crate::diff::section_diff;
use crate::document::ConfigDocument;
use crate::error::{Result, SyncError};
use crate::output::audit::{AUTO_TAG, DRY_RUN_TAG, Logger};
use crate::prompt::{Answer, Prompt, Prompter};
use crate::scanner::{self, FileCopy, Inventory};
use crate::utils::{copy_preserving_times, format_size, format_system_time};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Execution flags fixed at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Log every mutating action instead of performing it
    pub dry_run: bool,
    /// Report skipped folders and other routine detail in the audit log
    pub verbose: bool,
}

/// Counters collected over one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Logical files that were (or in a dry run would have been) changed
    pub changed_files: usize,
    /// Logical files whose action failed
    pub errors: usize,
    /// Absent folders and copies that vanished during the scan
    pub skipped: usize,
}

impl PassSummary {
    /// Whether the pass changed anything, or would have in a dry run
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.changed_files > 0
    }
}

/// The classification of one logical file, without acting on it
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Folder the file was found in; empty for root files
    pub folder: String,
    /// Path relative to the folder, the same in every location
    pub relative_path: PathBuf,
    /// What a pass would do with the file
    pub decision: SyncDecision,
}

/// One inventory-and-classify step of a pass
#[derive(Debug, Clone)]
struct Stage {
    folder: String,
    restrict_to: Option<Vec<String>>,
    mode: ResolveMode,
}

/// Drives passes over the locations of a [`Config`]
pub struct Synchronizer<'a, L, P> {
    config: &'a Config,
    options: RunOptions,
    logger: L,
    prompter: P,
}

impl<'a, L: Logger, P: Prompter> Synchronizer<'a, L, P> {
    /// Synchronizer over `config`, logging to `logger` and asking `prompter`
    #[must_use]
    pub const fn new(config: &'a Config, options: RunOptions, logger: L, prompter: P) -> Self {
        Self {
            config,
            options,
            logger,
            prompter,
        }
    }

    /// The audit sink, for inspecting what a pass logged
    #[must_use]
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// The prompter, for inspecting what was asked
    #[must_use]
    pub const fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Run one full pass.
    ///
    /// Never fails as a whole: per-file errors are logged and counted in the
    /// returned summary.
    pub fn run_pass(&mut self) -> PassSummary {
        let span = span!(Level::INFO, "sync_pass", dry_run = self.options.dry_run);
        let _guard = span.enter();

        let mut summary = PassSummary::default();
        if self.options.dry_run {
            self.logger
                .log(&format!("{DRY_RUN_TAG} No files will be modified during this pass"));
        }

        for stage in self.stages() {
            let inventory = self.inventory(&stage);
            self.note_skipped(&inventory, &mut summary);

            for (relative, copies) in &inventory.files {
                let decision = classify(copies, &self.config.locations, stage.mode);
                if !decision.is_action() {
                    continue;
                }

                match self.execute(&stage, relative, decision) {
                    Ok(true) => summary.changed_files += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!(file = %relative.display(), error = %e, "File action failed");
                        self.logger.log(&format!("Error: {e}"));
                        summary.errors += 1;
                    }
                }
            }
        }

        if !summary.changed() {
            self.logger.log("No changes detected.");
        }
        info!(
            changed = summary.changed_files,
            errors = summary.errors,
            skipped = summary.skipped,
            "Pass complete"
        );
        summary
    }

    /// Classify every logical file of every stage without prompting or
    /// touching the filesystem
    #[must_use]
    pub fn survey(&self) -> Vec<FileReport> {
        let mut reports = Vec::new();
        for stage in self.stages() {
            let inventory = self.inventory(&stage);
            for (relative, copies) in inventory.files {
                reports.push(FileReport {
                    folder: stage.folder.clone(),
                    decision: classify(&copies, &self.config.locations, stage.mode),
                    relative_path: relative,
                });
            }
        }
        reports
    }

    fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();

        let auto_files = self.config.auto_root_files();
        if !auto_files.is_empty() {
            stages.push(Stage {
                folder: String::new(),
                restrict_to: Some(auto_files),
                mode: ResolveMode::Automatic,
            });
        }

        if self.config.merge.is_enabled() {
            stages.push(Stage {
                folder: String::new(),
                restrict_to: Some(vec![self.config.merge.file.clone()]),
                mode: ResolveMode::SectionMerge,
            });
        }

        stages.extend(self.config.folders().map(|folder| Stage {
            folder: folder.to_string(),
            restrict_to: None,
            mode: ResolveMode::Interactive,
        }));
        stages
    }

    fn inventory(&self, stage: &Stage) -> Inventory {
        scanner::collect(
            &stage.folder,
            &self.config.locations,
            stage.restrict_to.as_deref(),
            &self.config.targets.ignore_patterns,
        )
    }

    fn note_skipped(&mut self, inventory: &Inventory, summary: &mut PassSummary) {
        for skipped in &inventory.skipped {
            if !skipped.is_skip() {
                summary.errors += 1;
                self.logger.log(&format!("Error: {skipped}"));
                continue;
            }

            summary.skipped += 1;
            // Absent folders are reported only in verbose mode
            if self.options.verbose || !matches!(skipped, SyncError::NotFound { .. }) {
                self.logger.log(&format!("Skipped: {skipped}"));
            }
        }
    }

    fn execute(&mut self, stage: &Stage, relative: &Path, decision: SyncDecision) -> Result<bool> {
        debug!(file = %relative.display(), decision = decision.label(), "Executing decision");
        let auto = stage.mode == ResolveMode::Automatic;

        match decision {
            SyncDecision::NoAction => Ok(false),
            SyncDecision::Propagate { source, missing } => {
                self.propagate(&stage.folder, relative, &source, &missing, auto)
            }
            SyncDecision::AutoReplace {
                source,
                targets,
                missing,
            } => self.replace(&stage.folder, relative, &source, &targets, &missing),
            SyncDecision::NeedsChoice { copies, missing } => {
                self.choose(&stage.folder, relative, &copies, &missing)
            }
            SyncDecision::MergeSections {
                source,
                targets,
                missing,
            } => self.merge(&stage.folder, relative, &source, &targets, &missing),
        }
    }

    /// Copy the only (or every identical) copy into locations lacking the file
    fn propagate(
        &mut self,
        folder: &str,
        relative: &Path,
        source: &FileCopy,
        missing: &[Location],
        auto: bool,
    ) -> Result<bool> {
        let tag = if auto { AUTO_TAG } else { "" };
        self.logger.log(
            format!("{tag} New file detected: {}", relative.display()).trim_start(),
        );
        self.describe(source);

        self.fill_missing(folder, relative, source, missing, auto)?;
        Ok(!missing.is_empty())
    }

    /// Overwrite differing copies with the newest one, no questions asked
    fn replace(
        &mut self,
        folder: &str,
        relative: &Path,
        source: &FileCopy,
        targets: &[FileCopy],
        missing: &[Location],
    ) -> Result<bool> {
        self.logger.log(&format!(
            "{AUTO_TAG} Newer version of {} found in '{}'",
            relative.display(),
            source.location.name
        ));

        for target in targets {
            self.copy_into(source, &target.path, true)?;
        }
        self.fill_missing(folder, relative, source, missing, true)?;
        Ok(!targets.is_empty() || !missing.is_empty())
    }

    /// Ask the operator which copy wins, then overwrite the others with it
    fn choose(
        &mut self,
        folder: &str,
        relative: &Path,
        copies: &[FileCopy],
        missing: &[Location],
    ) -> Result<bool> {
        let header = format!("Multiple versions of '{}':", relative.display());
        self.prompter.show(&header);
        self.logger.log(&header);
        for (index, copy) in copies.iter().enumerate() {
            let line = format!(
                "  {}. {}: {} ({}, modified {})",
                index + 1,
                copy.location.name,
                copy.path.display(),
                format_size(copy.properties.size),
                format_system_time(copy.properties.modified)
            );
            self.prompter.show(&line);
            self.logger.log(&line);
        }

        let prompt = Prompt::choice("Which copy should be kept?", copies.len());

        let chosen = match self.prompter.ask(&prompt) {
            Answer::YesNo(true) => copies.first(),
            Answer::Index(n) => copies.get(n.saturating_sub(1)),
            Answer::YesNo(false) => {
                self.logger
                    .log(&format!("Skipped {} (no change)", relative.display()));
                return Ok(false);
            }
            Answer::Invalid(input) => {
                return Err(SyncError::InvalidChoice {
                    input,
                    expected: prompt.expected(),
                });
            }
        };
        let Some(chosen) = chosen else {
            return Err(SyncError::InvalidChoice {
                input: String::new(),
                expected: prompt.expected(),
            });
        };

        self.logger.log(&format!(
            "Keeping the copy from '{}' for {}",
            chosen.location.name,
            relative.display()
        ));
        let targets = differing_from(chosen, copies);
        for target in &targets {
            self.copy_into(chosen, &target.path, false)?;
        }
        self.fill_missing(folder, relative, chosen, missing, false)?;
        Ok(!targets.is_empty() || !missing.is_empty())
    }

    /// Merge the configured sections of the newest copy into every older one
    fn merge(
        &mut self,
        folder: &str,
        relative: &Path,
        source: &FileCopy,
        targets: &[FileCopy],
        missing: &[Location],
    ) -> Result<bool> {
        let source_doc = ConfigDocument::load(&source.path)?;
        let mut changed = false;

        for target in targets {
            changed |= self.merge_into(&source_doc, source, target)?;
        }

        self.fill_missing(folder, relative, source, missing, false)?;
        Ok(changed || !missing.is_empty())
    }

    fn merge_into(
        &mut self,
        source_doc: &ConfigDocument,
        source: &FileCopy,
        target: &FileCopy,
    ) -> Result<bool> {
        let mut doc = ConfigDocument::load(&target.path)?;
        let mut changed = false;

        for name in &self.config.merge.sections {
            for checked in [source_doc, &doc] {
                if checked.count_sections(name) > 1 {
                    self.logger.log(&format!(
                        "Warning: duplicate [{name}] sections in {}, only the first is used",
                        checked.path().display()
                    ));
                }
            }

            let Some(section) = source_doc.get_section(name) else {
                self.logger.log(&format!(
                    "No [{name}] section found in {}",
                    source.path.display()
                ));
                continue;
            };

            if !doc.would_change(name, &section) {
                debug!(section = %name, target = %target.path.display(), "Section already equal");
                continue;
            }

            if self.options.dry_run {
                self.logger.log(&format!(
                    "{DRY_RUN_TAG} Would replace [{name}] in {} with the section from '{}'",
                    target.path.display(),
                    source.location.name
                ));
                let old = doc.get_section(name).map(|s| s.to_string()).unwrap_or_default();
                let new = doc.incoming(name, &section).to_string();
                let diff = section_diff(&old, &new, &format!("[{name}]"));
                for line in diff.lines {
                    self.logger.log(&format!("{DRY_RUN_TAG}   {line}"));
                }
                changed = true;
            } else if doc.overwrite_section(name, &section)? {
                self.logger.log(&format!(
                    "Replaced [{name}] in {} with the section from '{}'",
                    target.path.display(),
                    source.location.name
                ));
                changed = true;
            }
        }

        Ok(changed)
    }

    fn fill_missing(
        &mut self,
        folder: &str,
        relative: &Path,
        source: &FileCopy,
        missing: &[Location],
        auto: bool,
    ) -> Result<()> {
        for location in missing {
            let destination = location.folder_path(folder).join(relative);
            self.copy_into(source, &destination, auto)?;
        }
        Ok(())
    }

    fn copy_into(&mut self, source: &FileCopy, destination: &Path, auto: bool) -> Result<()> {
        let tag = if auto { format!("{AUTO_TAG} ") } else { String::new() };

        if self.options.dry_run {
            self.logger.log(&format!(
                "{DRY_RUN_TAG} {tag}Would copy {} to {}",
                source.path.display(),
                destination.display()
            ));
            return Ok(());
        }

        let bytes = copy_preserving_times(&source.path, destination)?;
        debug!(bytes, to = %destination.display(), "Copied");
        self.logger.log(&format!(
            "{tag}Copied {} to {}",
            source.path.display(),
            destination.display()
        ));
        Ok(())
    }

    fn describe(&mut self, copy: &FileCopy) {
        self.logger.log(&format!("  Config: {}", copy.location.name));
        self.logger.log(&format!("  Path: {}", copy.path.display()));
        self.logger
            .log(&format!("  Size: {}", format_size(copy.properties.size)));
        self.logger.log(&format!(
            "  Modified: {}",
            format_system_time(copy.properties.modified)
        ));
    }
}
