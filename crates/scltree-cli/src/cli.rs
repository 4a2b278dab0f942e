use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use scltree_types::DigestKind;

#[derive(Parser)]
#[command(
    name = "scltree",
    about = "Fingerprint and structurally compare SCL documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with diff and index settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Digest to fingerprint with (blake3, sha256, rapid64)
    #[arg(long, global = true)]
    pub digest: Option<DigestKind>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the subtree fingerprint of every element
    Hash(HashArgs),
    /// Compare two documents, ignoring sibling order outside Private elements
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct HashArgs {
    pub file: PathBuf,
    /// Only list fingerprints shared by more than one element
    #[arg(long)]
    pub collisions: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Verify every fingerprint match structurally
    #[arg(long)]
    pub verify: bool,
    /// Index both documents in parallel
    #[arg(long)]
    pub parallel: bool,
    /// Also list matched element pairs
    #[arg(long)]
    pub show_matched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["scltree", "hash", "station.scd"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("station.scd"));
            assert!(!args.collisions);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_hash_collisions() {
        let cli = Cli::try_parse_from(["scltree", "hash", "--collisions", "a.icd"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert!(args.collisions);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["scltree", "diff", "old.scd", "new.scd", "--verify"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("old.scd"));
            assert_eq!(args.new, PathBuf::from("new.scd"));
            assert!(args.verify);
            assert!(!args.parallel);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn diff_needs_two_files() {
        assert!(Cli::try_parse_from(["scltree", "diff", "old.scd"]).is_err());
    }

    #[test]
    fn parse_digest() {
        let cli = Cli::try_parse_from(["scltree", "--digest", "SHA256", "hash", "a.cid"]).unwrap();
        assert_eq!(cli.digest, Some(DigestKind::Sha256));
        assert!(Cli::try_parse_from(["scltree", "--digest", "md5", "hash", "a.cid"]).is_err());
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["scltree", "diff", "a.scd", "b.scd", "--config", "scltree.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("scltree.toml")));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["scltree", "--verbose", "hash", "a.scd"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["scltree", "--format", "json", "hash", "a.scd"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
