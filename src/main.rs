//
// main.rs
// Dicom-Anonymizer-rs
//
// Tokio entry point that installs the tracing subscriber and hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - January 2026

use dicom_anonymizer::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tokio runtime entry point: install logging, then delegate all argument
    // parsing and dispatching to the CLI module.
    tracing_subscriber::fmt::init();
    cli::run().await
}
