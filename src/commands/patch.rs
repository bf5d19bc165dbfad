use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use subpatch::defaults::{self, PatchConfig};
use subpatch::patch;
use subpatch::Error;

use crate::commands::CmdResult;

#[derive(Args, Debug, Default)]
pub struct PatchArgs {
    /// Root directory to scan (default: src)
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,
    /// File pattern to scan, repeatable (default: *.tsx *.ts *.jsx *.js *.mdx)
    #[arg(long = "ext", value_name = "PATTERN")]
    pub extensions: Vec<String>,
    /// Literal text to replace (default: zen.)
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub from: Option<String>,
    /// Literal text to write instead (default: zen-)
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub to: Option<String>,
    /// Config file (default: ./subpatch.json when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum PatchOutput {
    #[serde(rename = "patch")]
    Patch {
        root: String,
        marker: String,
        replacement: String,
        extensions: Vec<String>,
        dry_run: bool,
        scanned: usize,
        total_replacements: usize,
        total_files: usize,
        edits: Vec<EditSummary>,
        applied: bool,
    },
}

#[derive(Debug, Serialize)]
pub struct EditSummary {
    pub file: String,
    pub replacements: usize,
}

pub fn run(args: PatchArgs) -> CmdResult<PatchOutput> {
    let cwd = std::env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("resolve working directory".to_string()))
    })?;
    run_in(args, &cwd)
}

fn run_in(args: PatchArgs, cwd: &Path) -> CmdResult<PatchOutput> {
    let config = resolve_config(&args, cwd)?;
    let spec = config.to_spec()?;
    let root = config.root_in(cwd);

    let result = patch::patch_tree(&spec, &root, !args.dry_run)?;

    Ok((
        PatchOutput::Patch {
            root: config.root,
            marker: result.marker,
            replacement: result.replacement,
            extensions: spec.patterns,
            dry_run: args.dry_run,
            scanned: result.scanned,
            total_replacements: result.total_replacements,
            total_files: result.total_files,
            edits: result
                .edits
                .into_iter()
                .map(|e| EditSummary {
                    file: e.file,
                    replacements: e.replacements,
                })
                .collect(),
            applied: result.applied,
        },
        0,
    ))
}

/// Config file values, then CLI flags on top, field by field.
fn resolve_config(args: &PatchArgs, cwd: &Path) -> subpatch::Result<PatchConfig> {
    let explicit = args.config.as_ref().map(|p| cwd.join(p));
    let mut config = defaults::load_config(explicit.as_deref(), cwd)?;

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if !args.extensions.is_empty() {
        config.extensions = args.extensions.clone();
    }
    if let Some(from) = &args.from {
        config.marker = from.clone();
    }
    if let Some(to) = &args.to {
        config.replacement = to.clone();
    }

    Ok(config)
}
