//
// cli.rs
// Dicom-Anonymizer-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - January 2026

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::anonymize::{self, AnonymizationPolicy};
use crate::error::AnonymizerError;
use crate::models::TreeReport;
use crate::workspace::RequestWorkspace;
use crate::{archive, batch, detect, web};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "dicom-anonymizer")]
#[command(about = "Anonimizador DICOM em Rust", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Anonymize a single DICOM file
    Anonymize {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Value assigned to PatientID (empty by default)
        #[arg(long, default_value = "")]
        id: String,
    },
    /// Check whether a file parses as a DICOM object
    Detect { file: PathBuf },
    /// Anonymize every file under a directory into a mirrored output tree
    Batch {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Value assigned to PatientID on every file (empty by default)
        #[arg(long, default_value = "")]
        id: String,
        /// Print the per-file report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Anonymize a ZIP archive into a new ZIP archive
    Archive {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Value assigned to PatientID on every file (empty by default)
        #[arg(long, default_value = "")]
        id: String,
    },
    /// Start the web server
    Web {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

pub async fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    let policy = AnonymizationPolicy::default();

    match cli.command {
        Commands::Anonymize { input, output, id } => {
            // The single-file flow validates before producing any output.
            if !detect::is_dicom(&input) {
                return Err(AnonymizerError::NotDicom(input).into());
            }
            let written = anonymize::process_file(&input, output, &id, &policy)?;
            println!("Arquivo anonimizado salvo em: {:?}", written);
        }
        Commands::Detect { file } => {
            if detect::is_dicom(&file) {
                println!("DICOM válido: {}", file.display());
            } else {
                println!("Não é DICOM: {}", file.display());
                std::process::exit(1);
            }
        }
        Commands::Batch {
            input,
            output,
            id,
            json,
        } => {
            println!("Processando diretório: {:?}", input);
            let report = batch::process_tree(&input, &output, &id, &policy)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Archive { input, output, id } => {
            let workspace = RequestWorkspace::new()?;
            let input_root = workspace.input_dir()?;
            let output_root = workspace.output_dir()?;

            archive::extract(&input, &input_root).context("Falha ao extrair o arquivo ZIP")?;
            let report = batch::process_tree(&input_root, &output_root, &id, &policy)?;

            let target = output.unwrap_or_else(|| default_archive_name(&input));
            archive::create(&output_root, &target)?;

            print_report(&report);
            println!("Arquivo anonimizado salvo em: {:?}", target);
        }
        Commands::Web { host, port } => web::start_server(&host, port).await?,
    }

    Ok(())
}

fn default_archive_name(input: &Path) -> PathBuf {
    let mut p = input.to_path_buf();
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("anonymized");
    p.set_file_name(format!("{}_anon.zip", stem));
    p
}

fn print_report(report: &TreeReport) {
    for failure in report.failures() {
        eprintln!(
            "Erro em {:?}: {}",
            failure.relative_path,
            failure.error.as_deref().unwrap_or("unknown")
        );
    }
    println!(
        "Concluído: {} anonimizados, {} copiados, {} falhas",
        report.anonymized(),
        report.copied(),
        report.failures().count()
    );
}
