use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pix_exif::config;
use pix_exif::fields::FieldRegistry;
use pix_exif::hooks::{AttachmentHooks, MetadataStore};
use pix_exif::metadata::{AttachmentMetadata, FormFieldSet};
use pix_exif::store::JsonFileStore;
use pix_exif::sync::{FormSubmission, SaveReport, apply_assignments, read_submission_file};

#[derive(Parser, Debug)]
#[command(
    name = "pix-exif",
    version,
    about = "Edit the camera EXIF fields of image attachments in a JSON metadata store"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Metadata store directory (overrides the config)
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List attachments in the store
    List,
    /// Show the EXIF form fields of an attachment
    Show {
        /// Attachment id
        id: u64,
    },
    /// Save EXIF form values for an attachment
    Save {
        /// Attachment id
        id: u64,

        /// A field value, as `aperture=14/5` or `pix_exif_aperture=14/5` (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// JSON object of submitted form values, keyed by form-field name
        #[arg(long, value_name = "FILE")]
        form: Option<PathBuf>,

        /// Preview the resulting image_meta without writing the record
        #[arg(long)]
        dry_run: bool,
    },
}

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("No command specified. Use --help for usage.");
    };

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.store {
        config.store.dir = dir;
    }

    let registry = FieldRegistry::with_prefix(config.field_prefix.as_str());
    let mut store = JsonFileStore::from_config(&config.store);
    log::debug!("Using store at {}", store.dir().display());

    match command {
        Command::List => {
            let entries = store.list()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                log::info!("No attachments found in {}", store.dir().display());
            } else {
                for entry in &entries {
                    let kind = if entry.is_image { "image" } else { "other" };
                    println!("{:>8}  {kind:<6} {}", entry.id, entry.file.as_deref().unwrap_or("-"));
                }
            }
        }
        Command::Show { id } => {
            let types = store.clone();
            let hooks = AttachmentHooks::new(&registry, &mut store, &types);
            let form = hooks.fields_to_edit(id, FormFieldSet::new())?;

            if form.is_empty() {
                anyhow::bail!("Attachment {id} is not an image attachment.");
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                print_form(id, &form);
            }
        }
        Command::Save { id, set, form, dry_run } => {
            let submitted = build_submission(&registry, form.as_deref(), &set)?;
            if submitted.is_empty() {
                anyhow::bail!("Nothing to save. Pass --set FIELD=VALUE or --form FILE.");
            }

            let types = store.clone();
            let mut hooks = AttachmentHooks::new(&registry, &mut store, &types);

            if dry_run {
                let Some((record, report)) = hooks.preview_save(id, &submitted)? else {
                    anyhow::bail!("Attachment {id} is not an image attachment.");
                };
                log::info!("DRY RUN — attachment {id} will not be modified");
                if cli.json {
                    let out = serde_json::json!({
                        "report": report,
                        "image_meta": record.image_meta,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    print_save(&registry, &report, &record);
                }
                return Ok(());
            }

            let report = hooks.fields_to_save(id, &submitted)?;
            if !report.is_image {
                anyhow::bail!("Attachment {id} is not an image attachment.");
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let record = store.get_metadata(id)?.unwrap_or_default();
                print_save(&registry, &report, &record);
            }
        }
    }

    Ok(())
}

/// Merge `--form` file values with `--set` overrides into one submission.
fn build_submission(registry: &FieldRegistry, form: Option<&Path>, set: &[String]) -> Result<FormSubmission> {
    let mut submitted = match form {
        Some(path) => read_submission_file(path)?,
        None => FormSubmission::new(),
    };
    apply_assignments(registry, &mut submitted, set).context("Invalid --set")?;
    Ok(submitted)
}

fn print_form(id: u64, form: &FormFieldSet) {
    println!();
    println!("  {BOLD}Attachment {id}{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(72));
    for (name, field) in form.iter() {
        let label_col = format!("{:<16}", field.label);
        let value = if field.value.is_empty() { "-" } else { field.value.as_str() };
        println!("  {label_col} : {value}");
        println!("  {DIM}{:<16}   {name} — {}{RESET}", "", field.helps);
    }
    println!();
}

fn print_save(registry: &FieldRegistry, report: &SaveReport, record: &AttachmentMetadata) {
    println!();
    for def in registry.fields() {
        let label_col = format!("{:<16}", def.label);
        if report.written.iter().any(|k| k == def.key) {
            println!("  {GREEN}{label_col} : {} *{RESET}", record.image_meta_text(def.key));
        } else if let Some(rejected) = report.rejected.iter().find(|r| r.key == def.key) {
            println!(
                "  {YELLOW}{label_col} : {:?} rejected, kept {:?}{RESET}",
                rejected.input,
                record.image_meta_text(def.key)
            );
        } else {
            println!("  {DIM}{label_col} : {}{RESET}", record.image_meta_text(def.key));
        }
    }
    println!();

    let action = if report.persisted { "Saved" } else { "Would save" };
    log::info!("{action}: {} field(s), {} rejected", report.written.len(), report.rejected.len());
}
