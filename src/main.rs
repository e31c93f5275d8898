//! Craniotrack command-line entry point.
//!
//! Usage:
//!   craniotrack assess --length <mm> --width <mm> --right-diagonal <mm> --left-diagonal <mm>
//!   craniotrack scale --cvai <percent>

#![allow(non_snake_case)]

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use Craniotrack::adapters::memory::MemoryStore;
use Craniotrack::adapters::sanitize::SanitizingMakeWriter;
use Craniotrack::config::{LogMode, Settings};
use Craniotrack::domain::{ChoaLevel, Measurement};
use Craniotrack::{Assessment, AssessmentService};

#[derive(Parser)]
#[command(name = "craniotrack")]
#[command(version)]
#[command(about = "Cranial index, CVAI and deformity classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indices and diagnosis for one measurement
    Assess {
        /// Anteroposterior length (mm)
        #[arg(long)]
        length: Option<f64>,

        /// Biparietal width (mm)
        #[arg(long)]
        width: Option<f64>,

        /// Right oblique diagonal (mm)
        #[arg(long)]
        right_diagonal: Option<f64>,

        /// Left oblique diagonal (mm)
        #[arg(long)]
        left_diagonal: Option<f64>,

        /// Head circumference (mm)
        #[arg(long)]
        circumference: Option<f64>,

        /// Measurement date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show the CHOA plagiocephaly level for a CVAI value
    Scale {
        /// CVAI (%)
        #[arg(long)]
        cvai: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> Result<()> {
    let settings = Settings::from_env();

    let (writer, _guard) = match settings.log_mode {
        LogMode::File => {
            if let Some(parent) = settings.log_file.parent() {
                // Best-effort: an unwritable directory surfaces on open below.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&settings.log_file)
                .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer().with_writer(
                SanitizingMakeWriter::new(writer).with_max_bytes(settings.sanitize_max_bytes),
            ),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            length,
            width,
            right_diagonal,
            left_diagonal,
            circumference,
            date,
            format,
        } => {
            let measurement = Measurement {
                length,
                width,
                right_diagonal,
                left_diagonal,
                head_circumference: circumference,
                measurement_date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
            };

            let service = AssessmentService::new(Arc::new(MemoryStore::new()));
            let assessment = service.assess(&measurement)?;

            match format {
                Format::Json => println!("{}", assessment.to_json()?),
                Format::Text => print_assessment(&assessment),
            }
        }
        Commands::Scale { cvai } => {
            anyhow::ensure!(cvai.is_finite() && cvai >= 0.0, "CVAI must be a non-negative number");
            let level = ChoaLevel::from_cvai(cvai);
            println!("{level} ({})", level.severity());
            println!("{}", level.recommendation());
        }
    }

    Ok(())
}

fn print_assessment(assessment: &Assessment) {
    let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));

    println!("Índice craniano:     {}%", show(assessment.cranial_index));
    println!("Diferença diagonal:  {} mm", show(assessment.diagonal_difference));
    println!("CVAI:                {}%", show(assessment.cvai));
    match &assessment.diagnosis {
        Some(diagnosis) => println!("Diagnóstico:         {}", diagnosis.diagnosis_text),
        None => println!("Diagnóstico:         medidas incompletas"),
    }
    if let Some(level) = assessment.choa_level {
        println!("Escala CHOA:         {level} - {}", level.recommendation());
    }
}
