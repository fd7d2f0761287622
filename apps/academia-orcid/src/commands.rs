//! Subcommand flows
//!
//! Every subcommand resolves an ORCID iD, loads the record (cache first),
//! renders one section and writes it to `--output-dir`. Nothing is written
//! when the renderer has nothing to say, since report composers include a
//! section only when its file exists.

use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info, warn};

use orcid_export::{
    export_bibtex, export_data, export_publications, generate_data_latex,
    generate_publications_latex, generate_unavailable_latex, to_json_string, Section,
};
use orcid_fetch::{
    lookup_orcid_for_uin, Config, DoiClient, FetchError, FetchPolicy, RecordSource,
};
use orcid_record::{
    extract_data, extract_publications, parse_year_filter, validate_orcid_id, validate_uin,
    OrcidData, Publications, YearRange,
};

use crate::cli::{Command, CommonArgs};

/// Failures that abort a run with exit code 1
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// File written, or nothing to write
    Done,
    /// Bad ORCID iD or UIN, or missing mapping database
    InvalidInput,
    /// The ORCID API could not provide the record
    FetchFailed,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::InvalidInput => ExitCode::from(1),
            Outcome::FetchFailed => ExitCode::from(2),
        }
    }
}

/// Result of resolving and loading the record
enum Lookup {
    Record { orcid_id: String, record: Value },
    /// The UIN has no ORCID iD on file
    Unmapped { uin: String },
    /// Not cached and fetching disabled
    Missing { orcid_id: String },
    FetchFailed { orcid_id: String, error: FetchError },
    Invalid,
}

pub async fn run(command: &Command, config: &Config) -> Result<Outcome, AppError> {
    match command {
        Command::Latex { common, section } => run_latex(common, (*section).into(), config).await,
        Command::Bibtex { common, enrich } => run_bibtex(common, *enrich, config).await,
        Command::Json { common, section } => run_json(common, (*section).into(), config).await,
    }
}

async fn run_latex(args: &CommonArgs, section: Section, config: &Config) -> Result<Outcome, AppError> {
    let file_name = format!("{}.tex", section.file_stem());
    let year_range = year_filter(args, section);

    let (orcid_id, record) = match lookup(args, config).await? {
        Lookup::Record { orcid_id, record } => (orcid_id, record),
        Lookup::Invalid => return Ok(Outcome::InvalidInput),
        Lookup::Unmapped { uin } => {
            warn!("No ORCID iD found for UIN {}; writing placeholder", uin);
            let placeholder = generate_unavailable_latex(
                section,
                "No ORCID ID on file for this faculty member.",
            );
            write_output(&args.output_dir, &file_name, &placeholder)?;
            return Ok(Outcome::Done);
        }
        Lookup::Missing { orcid_id } => {
            warn!("No ORCID record found for {}; writing placeholder", orcid_id);
            let reason = format!("ORCID record unavailable for {}.", orcid_id);
            write_output(&args.output_dir, &file_name, &generate_unavailable_latex(section, &reason))?;
            return Ok(Outcome::Done);
        }
        Lookup::FetchFailed { orcid_id, error } => {
            let reason = format!("ORCID API fetch failed for {}: {}", orcid_id, error);
            error!("{}", reason);
            write_output(&args.output_dir, &file_name, &generate_unavailable_latex(section, &reason))?;
            return Ok(Outcome::FetchFailed);
        }
    };

    let latex = match section {
        Section::Publications => {
            let publications = publications(&record, config, year_range);
            generate_publications_latex(&orcid_id, &publications)
        }
        Section::Data => generate_data_latex(&orcid_id, &data(&record)),
    };

    if latex.is_empty() {
        info!("No {} data found; skipping file creation", section);
        return Ok(Outcome::Done);
    }

    write_output(&args.output_dir, &file_name, &latex)?;
    Ok(Outcome::Done)
}

async fn run_bibtex(args: &CommonArgs, enrich: bool, config: &Config) -> Result<Outcome, AppError> {
    let year_range = year_filter(args, Section::Publications);

    let (orcid_id, record) = match record_or_skip(lookup(args, config).await?) {
        Ok(found) => found,
        Err(outcome) => return Ok(outcome),
    };

    let mut publications = publications(&record, config, year_range);

    if enrich {
        info!("Enriching publications via DOI content negotiation");
        let doi_client = DoiClient::new(&config.api)?;
        doi_client.enrich_publications(publications.iter_mut()).await;
    }

    let bibtex = export_bibtex(&orcid_id, &publications, Utc::now());
    if bibtex.is_empty() {
        info!("No publications found; skipping .bib file creation");
        return Ok(Outcome::Done);
    }

    write_output(&args.output_dir, "orcid-publications.bib", &bibtex)?;
    Ok(Outcome::Done)
}

async fn run_json(args: &CommonArgs, section: Section, config: &Config) -> Result<Outcome, AppError> {
    let year_range = year_filter(args, section);

    let (orcid_id, record) = match record_or_skip(lookup(args, config).await?) {
        Ok(found) => found,
        Err(outcome) => return Ok(outcome),
    };

    let generated_at = Utc::now();
    let value = match section {
        Section::Publications => {
            export_publications(&orcid_id, &publications(&record, config, year_range), generated_at)
        }
        Section::Data => export_data(&orcid_id, &data(&record), generated_at),
    };

    let Some(value) = value else {
        info!("No {} data found; skipping file creation", section);
        return Ok(Outcome::Done);
    };

    let json = to_json_string(&value, config.output.json_indent)?;
    write_output(&args.output_dir, &format!("{}.json", section.file_stem()), &json)?;
    Ok(Outcome::Done)
}

/// Record for formats without a placeholder file; any other lookup is
/// logged and turned into the run's outcome
fn record_or_skip(lookup: Lookup) -> Result<(String, Value), Outcome> {
    match lookup {
        Lookup::Record { orcid_id, record } => Ok((orcid_id, record)),
        Lookup::Invalid => Err(Outcome::InvalidInput),
        Lookup::Unmapped { uin } => {
            warn!("No ORCID iD found for UIN {}; skipping", uin);
            Err(Outcome::Done)
        }
        Lookup::Missing { orcid_id } => {
            warn!("No ORCID record found for {}; skipping", orcid_id);
            Err(Outcome::Done)
        }
        Lookup::FetchFailed { orcid_id, error } => {
            error!("ORCID API fetch failed for {}: {}", orcid_id, error);
            Err(Outcome::FetchFailed)
        }
    }
}

/// Parse `--year` for the publications section; the data section ignores it
fn year_filter(args: &CommonArgs, section: Section) -> Option<YearRange> {
    if section == Section::Data {
        if args.year.is_some() {
            info!("--year is ignored for the data section (all data included)");
        }
        return None;
    }

    let range = parse_year_filter(args.year.as_deref());
    if let Some(range) = range {
        info!("Year filter: {}", range);
    }
    range
}

fn publications(record: &Value, config: &Config, range: Option<YearRange>) -> Publications {
    let publications = extract_publications(record, config.output.author_limit);
    info!(
        "Found {} journal articles, {} conference papers, {} other",
        publications.journal_articles.len(),
        publications.conference_papers.len(),
        publications.other.len()
    );

    if range.is_none() {
        return publications;
    }

    let before = publications.total();
    let filtered = publications.filter_by_year(range);
    info!("{} of {} publications inside the year filter", filtered.total(), before);
    filtered
}

fn data(record: &Value) -> OrcidData {
    let data = extract_data(record);
    info!(
        "Found: {} external IDs, {} fundings, {} employments, {} educations, \
         {} distinctions, {} memberships, {} services",
        data.external_identifiers.len(),
        data.fundings.len(),
        data.employments.len(),
        data.educations.len(),
        data.distinctions.len(),
        data.memberships.len(),
        data.services.len()
    );
    data
}

/// Resolve the ORCID iD and load its record
async fn lookup(args: &CommonArgs, config: &Config) -> Result<Lookup, AppError> {
    let orcid_id = if let Some(orcid_id) = &args.orcid {
        if !validate_orcid_id(orcid_id) {
            error!("Invalid ORCID iD format: {} (expected XXXX-XXXX-XXXX-XXXX)", orcid_id);
            return Ok(Lookup::Invalid);
        }
        info!("Using ORCID iD directly: {}", orcid_id);
        orcid_id.clone()
    } else {
        let uin = args.uin.as_deref().unwrap_or_default();
        if !validate_uin(uin) {
            error!("Invalid UIN format: {} (expected 9 digits)", uin);
            return Ok(Lookup::Invalid);
        }

        let Some(db_path) = &args.mapping_db else {
            error!("--mapping-db is required when using --uin");
            return Ok(Lookup::Invalid);
        };
        if !db_path.exists() {
            error!("Mapping database not found: {}", db_path.display());
            return Ok(Lookup::Invalid);
        }

        match lookup_orcid_for_uin(db_path, uin)? {
            Some(orcid_id) => {
                info!("Found ORCID {} for UIN {}", orcid_id, uin);
                orcid_id
            }
            None => {
                return Ok(Lookup::Unmapped {
                    uin: uin.to_string(),
                })
            }
        }
    };

    let policy = FetchPolicy {
        fetch: !args.no_fetch,
        force: args.force_fetch,
    };
    let source = RecordSource::from_config(&args.data_dir, config)?;

    match source.get_or_fetch(&orcid_id, None, policy).await {
        Ok(Some(record)) => Ok(Lookup::Record { orcid_id, record }),
        Ok(None) => Ok(Lookup::Missing { orcid_id }),
        Err(FetchError::InvalidOrcid(id)) => {
            error!("Invalid ORCID iD format: {}", id);
            Ok(Lookup::Invalid)
        }
        Err(error) => Ok(Lookup::FetchFailed { orcid_id, error }),
    }
}

/// Write `contents`, log it and print the path on stdout
fn write_output(output_dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    fs::write(&path, contents)?;
    info!("Generated: {}", path.display());
    println!("{}", path.display());
    Ok(path)
}
