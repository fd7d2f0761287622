//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use orcid_export::Section;

#[derive(Parser, Debug)]
#[command(name = "academia-orcid")]
#[command(version, about = "Generate faculty report sections from ORCID records", long_about = None)]
#[command(after_help = "EXAMPLES:
    academia-orcid latex --orcid 0000-0002-1825-0097 --output-dir out
    academia-orcid latex --uin 123456789 --mapping-db shared.db --output-dir out --section data
    academia-orcid bibtex --orcid 0000-0002-1825-0097 --output-dir out --year 2020-2024 --enrich
    academia-orcid json --orcid 0000-0002-1825-0097 --output-dir out --no-fetch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write orcid-publications.tex or orcid-data.tex
    Latex {
        #[command(flatten)]
        common: CommonArgs,

        /// Part of the record to render
        #[arg(long, value_enum, default_value_t = SectionArg::Publications)]
        section: SectionArg,
    },

    /// Write orcid-publications.bib
    Bibtex {
        #[command(flatten)]
        common: CommonArgs,

        /// Fill missing venue, volume, pages etc. from doi.org
        #[arg(long)]
        enrich: bool,
    },

    /// Write orcid-publications.json or orcid-data.json
    Json {
        #[command(flatten)]
        common: CommonArgs,

        /// Part of the record to render
        #[arg(long, value_enum, default_value_t = SectionArg::Publications)]
        section: SectionArg,
    },
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Latex { common, .. }
            | Command::Bibtex { common, .. }
            | Command::Json { common, .. } => common,
        }
    }
}

/// Arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Faculty UIN, looked up in --mapping-db
    #[arg(long, required_unless_present = "orcid")]
    pub uin: Option<String>,

    /// ORCID iD (bypasses the UIN mapping)
    #[arg(long)]
    pub orcid: Option<String>,

    /// Directory the output file is written to
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Base directory holding the record cache
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Publication year filter: YYYY-YYYY, YYYY or "all"
    #[arg(long)]
    pub year: Option<String>,

    /// Only use cached records
    #[arg(long)]
    pub no_fetch: bool,

    /// Refetch from the API even when the cache is fresh
    #[arg(long)]
    pub force_fetch: bool,

    /// SQLite database with an orcid_mapping table (required with --uin)
    #[arg(long)]
    pub mapping_db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionArg {
    Publications,
    Data,
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Publications => Section::Publications,
            SectionArg::Data => Section::Data,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(alias = "critical")]
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("academia-orcid").chain(args.iter().copied()))
    }

    #[test]
    fn test_latex_defaults() {
        let cli = parse(&["latex", "--orcid", "0000-0002-1825-0097", "--output-dir", "out"]).unwrap();
        let Command::Latex { common, section } = cli.command else {
            panic!("expected latex subcommand");
        };
        assert_eq!(section, SectionArg::Publications);
        assert_eq!(common.data_dir, PathBuf::from("."));
        assert_eq!(common.log_level, LogLevel::Info);
        assert!(!common.no_fetch);
        assert!(!common.force_fetch);
    }

    #[test]
    fn test_bibtex_enrich_and_year() {
        let cli = parse(&[
            "bibtex", "--uin", "123456789", "--mapping-db", "shared.db",
            "--output-dir", "out", "--year", "2020-2024", "--enrich",
        ])
        .unwrap();
        let Command::Bibtex { common, enrich } = cli.command else {
            panic!("expected bibtex subcommand");
        };
        assert!(enrich);
        assert_eq!(common.uin.as_deref(), Some("123456789"));
        assert_eq!(common.year.as_deref(), Some("2020-2024"));
    }

    #[test]
    fn test_json_data_section() {
        let cli = parse(&[
            "json", "--orcid", "0000-0002-1825-0097", "--output-dir", "out", "--section", "data",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Json { section: SectionArg::Data, .. }));
    }

    #[test]
    fn test_requires_uin_or_orcid() {
        assert!(parse(&["latex", "--output-dir", "out"]).is_err());
    }

    #[test]
    fn test_requires_output_dir() {
        assert!(parse(&["json", "--orcid", "0000-0002-1825-0097"]).is_err());
    }

    #[test]
    fn test_log_level_accepts_python_style_names() {
        let cli = parse(&[
            "latex", "--orcid", "0000-0002-1825-0097", "--output-dir", "out", "--log-level", "WARNING",
        ])
        .unwrap();
        assert_eq!(cli.command.common().log_level, LogLevel::Warn);
    }

    #[test]
    fn test_bibtex_has_no_section() {
        assert!(parse(&[
            "bibtex", "--orcid", "0000-0002-1825-0097", "--output-dir", "out", "--section", "data",
        ])
        .is_err());
    }
}
