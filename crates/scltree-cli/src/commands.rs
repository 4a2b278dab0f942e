use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;

use scltree_diff::{DiffConfig, DiffSummary, TreeDiffer};
use scltree_dom::{has_scl_extension, Document, SCL_EXTENSIONS};
use scltree_index::SubtreeAggregator;
use scltree_types::{DigestKind, Fingerprint};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref(), cli.digest)?;
    match cli.command {
        Command::Hash(args) => cmd_hash(args, config, &cli.format),
        Command::Diff(args) => cmd_diff(args, config, &cli.format),
    }
}

fn load_config(path: Option<&Path>, digest: Option<DigestKind>) -> anyhow::Result<DiffConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => DiffConfig::default(),
    };
    if let Some(digest) = digest {
        config.index.digest = digest;
    }
    Ok(config)
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    if !has_scl_extension(path) {
        bail!(
            "{} is not an SCL file (expected one of: {})",
            path.display(),
            SCL_EXTENSIONS.join(", ")
        );
    }
    Document::from_path(path).with_context(|| format!("cannot load {}", path.display()))
}

// ---------------------------------------------------------------
// hash
// ---------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HashOutput {
    file: String,
    digest: DigestKind,
    root: Option<Fingerprint>,
    distinct: usize,
    nodes: Vec<NodeEntry>,
}

#[derive(Debug, Serialize)]
struct NodeEntry {
    path: String,
    depth: usize,
    own: Fingerprint,
    effective: Fingerprint,
}

fn hash_document(path: &Path, config: &DiffConfig, collisions_only: bool) -> anyhow::Result<HashOutput> {
    let doc = load_document(path)?;
    let index = SubtreeAggregator::new(config.index.clone())
        .aggregate(&doc)
        .with_context(|| format!("cannot fingerprint {}", path.display()))?;

    let mut nodes = Vec::new();
    for id in doc.node_ids() {
        let Some(record) = index.fingerprints_of(id) else {
            continue;
        };
        if collisions_only && index.lookup(&record.effective).len() < 2 {
            continue;
        }
        nodes.push(NodeEntry {
            path: doc.path(id),
            depth: record.depth,
            own: record.own,
            effective: record.effective,
        });
    }

    Ok(HashOutput {
        file: path.display().to_string(),
        digest: index.digest(),
        root: index.root_fingerprint(),
        distinct: index.len(),
        nodes,
    })
}

fn cmd_hash(args: HashArgs, config: DiffConfig, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let output = hash_document(&args.file, &config, args.collisions)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            println!("{} ({})", output.file.bold(), output.digest.to_string().cyan());
            if let Some(root) = output.root {
                println!("  Root: {}", root.to_hex().yellow());
            }
            for node in &output.nodes {
                println!("  {}  {}", node.effective.short_hex().yellow(), node.path);
            }
            println!(
                "{} elements listed, {} distinct fingerprints",
                output.nodes.len().to_string().bold(),
                output.distinct.to_string().bold()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------
// diff
// ---------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PathPair {
    old: String,
    new: String,
}

#[derive(Debug, Serialize)]
struct DiffOutput {
    old: String,
    new: String,
    identical: bool,
    summary: DiffSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    matched: Vec<PathPair>,
    removed: Vec<String>,
    added: Vec<String>,
    changed: Vec<PathPair>,
}

fn diff_documents(args: &DiffArgs, mut config: DiffConfig) -> anyhow::Result<DiffOutput> {
    let old = load_document(&args.old)?;
    let new = load_document(&args.new)?;
    config.verify_matches |= args.verify;
    config.parallel |= args.parallel;

    let report = TreeDiffer::new(config).diff(&old, &new)?;
    let pair = |(a, b): &(scltree_dom::NodeId, scltree_dom::NodeId)| PathPair {
        old: old.path(*a),
        new: new.path(*b),
    };

    Ok(DiffOutput {
        old: args.old.display().to_string(),
        new: args.new.display().to_string(),
        identical: report.is_identical(),
        summary: report.summary(),
        matched: if args.show_matched {
            report.matched().iter().map(pair).collect()
        } else {
            Vec::new()
        },
        removed: report.removed().iter().map(|id| old.path(*id)).collect(),
        added: report.added().iter().map(|id| new.path(*id)).collect(),
        changed: report.changed().iter().map(pair).collect(),
    })
}

fn cmd_diff(args: DiffArgs, config: DiffConfig, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let output = diff_documents(&args, config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            for pair in &output.matched {
                println!("  {} {}", "=".dimmed(), pair.old.dimmed());
            }
            for path in &output.removed {
                println!("{} {}", "-".red().bold(), path.red());
            }
            for path in &output.added {
                println!("{} {}", "+".green().bold(), path.green());
            }
            for pair in &output.changed {
                if pair.old == pair.new {
                    println!("{} {}", "~".yellow().bold(), pair.old.yellow());
                } else {
                    println!("{} {} -> {}", "~".yellow().bold(), pair.old.yellow(), pair.new.yellow());
                }
            }
            if output.identical {
                println!("{} Documents are structurally identical", "✓".green().bold());
            } else {
                println!("{}", output.summary);
            }
        }
    }
    Ok(if output.identical {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
