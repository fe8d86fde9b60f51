//! Packing flow - Concatenate admitted files into one fenced artifact
//!
//! Each written file becomes a block of the form
//!
//! ````text
//! ```
//! // <path relative to root>
//! <contents>
//! ```
//!
//! ````
//!
//! Blocks follow traversal order; force-included files come last, in their
//! configured order, unless the traversal already wrote them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backends::walk::{DirListing, TreeWalker};
use crate::core::error::PackError;
use crate::core::file_reader::read_lossy;
use crate::core::paths::{join_rel, to_native};
use crate::core::rules::RuleSet;
use crate::engine::classifier::Classifier;
use crate::engine::pruner::Pruner;

/// Default artifact name, resolved against the working directory
pub const DEFAULT_OUTPUT: &str = "output.md";

/// Statistics for a pack run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackReport {
    /// Blocks written, force-included ones included
    pub files_written: usize,
    /// Bytes of source content written
    pub bytes_written: u64,
    /// Blocks written by the force-include pass
    pub forced_written: usize,
    /// Force-include entries that were missing or unreadable
    pub forced_skipped: usize,
    /// Directories cut from traversal
    pub dirs_pruned: usize,
}

/// Write one fenced block
pub fn write_block<W: Write>(out: &mut W, header: &str, contents: &str) -> io::Result<()> {
    out.write_all(b"```\n")?;
    writeln!(out, "// {}", header)?;
    out.write_all(contents.as_bytes())?;
    out.write_all(b"\n```\n\n")
}

/// Run state shared by the traversal and force-include passes
struct Packer<'a, W: Write, D: Write> {
    rules: &'a RuleSet,
    root: &'a Path,
    skip: Option<&'a Path>,
    start: Option<&'a Path>,
    out: &'a mut W,
    diag: &'a mut D,
    seen: HashSet<PathBuf>,
    report: PackReport,
}

impl<'a, W: Write, D: Write> Packer<'a, W, D> {
    /// Write a file's block. Returns false when the file could not be read.
    fn emit(&mut self, rel: &str, abs: &Path) -> Result<bool, PackError> {
        let content = match read_lossy(abs) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %abs.display(), error = %err, "skipping unreadable file");
                return Ok(false);
            }
        };

        let header = to_native(rel).display().to_string();
        let label = self.diag_label(abs, &header);
        if let Err(err) = writeln!(self.diag, "{:>10} {}", content.size, label) {
            warn!(path = %header, error = %err, "cannot write diagnostics line");
        }
        if content.lossy {
            debug!(path = %header, "invalid UTF-8 replaced");
        }

        write_block(&mut *self.out, &header, &content.text)?;

        self.seen.insert(abs.to_path_buf());
        self.report.files_written += 1;
        self.report.bytes_written += content.size;
        Ok(true)
    }

    /// Path shown on the diagnostics line: relative to the starting
    /// directory when one is known, absolute when the file lies outside it
    fn diag_label(&self, abs: &Path, header: &str) -> String {
        match self.start {
            Some(start) => abs.strip_prefix(start).unwrap_or(abs).display().to_string(),
            None => header.to_string(),
        }
    }

    fn is_artifact(&self, abs: &Path) -> bool {
        self.skip.map(|skip| skip == abs).unwrap_or(false)
    }

    fn visit(
        &mut self,
        pruner: &Pruner<'_>,
        classifier: &Classifier<'_>,
        listing: &DirListing,
    ) -> Result<Vec<String>, PackError> {
        let outcome = pruner.prune(&listing.rel, &listing.subdirs);
        if !outcome.process_current {
            self.report.dirs_pruned += 1;
            return Ok(outcome.subdirs);
        }
        self.report.dirs_pruned += listing.subdirs.len() - outcome.subdirs.len();

        for name in &listing.files {
            let rel = join_rel(&listing.rel, name);
            let abs = self.root.join(to_native(&rel));
            if self.is_artifact(&abs) {
                continue;
            }
            if classifier.classify(name, &listing.abs) {
                self.emit(&rel, &abs)?;
            }
        }

        Ok(outcome.subdirs)
    }

    fn force_include(&mut self) -> Result<(), PackError> {
        for rel in self.rules.always_include_files() {
            let abs = self.root.join(to_native(rel));

            if self.seen.contains(&abs) {
                debug!(path = %rel, "already written");
                continue;
            }
            if self.is_artifact(&abs) {
                continue;
            }

            let is_file = fs::metadata(&abs).map(|m| m.is_file()).unwrap_or(false);
            if !is_file {
                debug!(path = %rel, "force-include entry missing");
                self.report.forced_skipped += 1;
                continue;
            }

            if self.emit(rel, &abs)? {
                self.report.forced_written += 1;
            } else {
                self.report.forced_skipped += 1;
            }
        }
        Ok(())
    }
}

/// Traverse `root` and write every admitted file to `out`.
///
/// `skip` names the artifact itself so a tree containing it never packs it.
/// One size/path line per written file goes to `diag`, with the path relative
/// to `start` (the run's starting directory), or to `root` when `start` is
/// `None`.
pub fn pack_tree<W: Write, D: Write>(
    rules: &RuleSet,
    root: &Path,
    skip: Option<&Path>,
    start: Option<&Path>,
    out: &mut W,
    diag: &mut D,
) -> Result<PackReport, PackError> {
    let pruner = Pruner::new(rules);
    let classifier = Classifier::new(rules);

    let mut packer = Packer {
        rules,
        root,
        skip,
        start,
        out,
        diag,
        seen: HashSet::new(),
        report: PackReport::default(),
    };

    TreeWalker::new(root).walk(|listing| packer.visit(&pruner, &classifier, listing))?;
    packer.force_include()?;

    Ok(packer.report)
}

/// Open the artifact, pack the tree into it and close it
pub fn pack_to_file(
    rules: &RuleSet,
    root: &Path,
    output: &Path,
    quiet: bool,
) -> Result<PackReport, PackError> {
    let file = File::create(output).map_err(|source| PackError::OutputOpen {
        path: output.to_path_buf(),
        source,
    })?;
    let artifact = output.canonicalize().ok();
    let start = std::env::current_dir().and_then(|dir| dir.canonicalize()).ok();
    let mut out = BufWriter::new(file);

    let (skip, start) = (artifact.as_deref(), start.as_deref());
    let report = if quiet {
        pack_tree(rules, root, skip, start, &mut out, &mut io::sink())?
    } else {
        pack_tree(rules, root, skip, start, &mut out, &mut io::stderr().lock())?
    };

    out.flush()?;
    Ok(report)
}

/// Run the pack command
pub fn run_pack(
    root: &Path,
    rules: &RuleSet,
    output: &Path,
    quiet: bool,
    show_stats: bool,
) -> Result<()> {
    let report = pack_to_file(rules, root, output, quiet)?;

    info!(
        files = report.files_written,
        bytes = report.bytes_written,
        output = %output.display(),
        "pack complete"
    );

    if show_stats {
        eprintln!("📦 Pack Statistics:");
        eprintln!("   Files: {}", report.files_written);
        eprintln!("   Bytes: {}", report.bytes_written);
        eprintln!(
            "   Force-included: {} written, {} skipped",
            report.forced_written, report.forced_skipped
        );
        eprintln!("   Directories pruned: {}", report.dirs_pruned);
    }

    Ok(())
}
