use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};

use cover_pages::assemble::{dedup_subjects, generate, validate, OutputMode};
use cover_pages::package::TemplateSource;
use cover_pages::seed::sample_template_bytes;
use cover_pages::substitute::{scan_tokens, token, StudentData, FIELDS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate student cover pages from a DOCX template")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the template for each subject and write the output artifact.
    Generate {
        /// Template path; defaults to template.docx in the working directory.
        #[arg(long)]
        template: Option<PathBuf>,

        #[arg(long)]
        name: String,

        #[arg(long)]
        surname: String,

        /// Class label, e.g. "Grade 10A".
        #[arg(long, default_value = "")]
        class: String,

        /// Academic year.
        #[arg(long, value_parser = clap::value_parser!(u16).range(2000..=2100), default_value_t = current_year())]
        year: u16,

        /// Comma-separated subject names; duplicates are dropped.
        #[arg(long, value_delimiter = ',', required = true)]
        subjects: Vec<String>,

        #[arg(long, value_enum, default_value_t = Mode::Merged)]
        mode: Mode,

        /// Directory the artifact is written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Report which placeholders the template contains.
    Inspect {
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Write the sample cover-page template.
    Seed {
        #[arg(long, default_value = "template.docx")]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    /// One document with a page break between subjects.
    Merged,
    /// A ZIP archive with one document per subject.
    Archive,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Merged => OutputMode::Merged,
            Mode::Archive => OutputMode::Archive,
        }
    }
}

fn current_year() -> u16 {
    chrono::Local::now().year().clamp(2000, 2100) as u16
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::Generate {
            template,
            name,
            surname,
            class,
            year,
            subjects,
            mode,
            out_dir,
        } => {
            let student = StudentData {
                name,
                surname,
                class,
                year,
            };
            let subjects = dedup_subjects(&subjects);
            validate(&student, &subjects)?;

            let source = TemplateSource::locate(template.as_deref())?;
            match generate(&source, &student, &subjects, mode.into())? {
                Some(artifact) => {
                    let path = out_dir.join(&artifact.file_name);
                    std::fs::write(&path, &artifact.bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Generated {} cover page(s): {}",
                        subjects.len(),
                        path.display()
                    );
                }
                None => println!("Nothing to generate."),
            }
        }

        Command::Inspect { template } => {
            let source = TemplateSource::locate(template.as_deref())?;
            let mut doc = source.open()?;
            let found = scan_tokens(&mut doc);
            for field in FIELDS {
                let tok = token(field);
                let status = if found.contains(&tok) { "found" } else { "missing" };
                println!("{tok}: {status}");
            }
            for tok in &found {
                if !FIELDS.iter().any(|f| token(f) == *tok) {
                    println!("{tok}: unrecognized (left untouched)");
                }
            }
        }

        Command::Seed { out } => {
            let bytes = sample_template_bytes()?;
            std::fs::write(&out, bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Wrote sample template: {}", out.display());
        }
    }
    Ok(())
}
