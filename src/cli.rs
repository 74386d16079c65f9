use crate::affinity::{AggregationType, ScoringMode};
use crate::utils::Result;
use chrono::Datelike;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="motifscore",
          version=&**FULL_VERSION,
          long_about = None,
          disable_help_subcommand = true,
          after_help = format!("Copyright (C) 2012-{}
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
research use only.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Motif affinity scorer")]
    Score(ScoreArgs),
    #[clap(about = "Gene-proximity region filter")]
    Filter(FilterArgs),
    #[clap(about = "Motif library validator")]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("score")))]
#[command(arg_required_else_help(true))]
pub struct ScoreArgs {
    #[clap(required = true)]
    #[clap(short = 'm')]
    #[clap(long = "motifs")]
    #[clap(help = "Log-odds motif library")]
    #[clap(value_name = "MOTIFS")]
    #[arg(value_parser = check_file_exists)]
    pub motifs_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "ids")]
    #[clap(help = "Motif identifiers, one per line in library order")]
    #[clap(value_name = "IDS")]
    #[arg(value_parser = check_file_exists)]
    pub ids_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "calibration")]
    #[clap(help = "Motif calibration (JSON or tab-delimited id, threshold, sum, fp)")]
    #[clap(value_name = "CALIBRATION")]
    #[arg(value_parser = check_file_exists)]
    pub calibration_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "sequences")]
    #[clap(help = "FASTA file with region sequences")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub sequences_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output affinity matrix")]
    #[clap(value_name = "MATRIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: PathBuf,

    #[clap(short = 'f')]
    #[clap(long = "gene-file")]
    #[clap(help = "Gene proximity table; only regions whose midpoint maps to a gene are scored")]
    #[clap(value_name = "GENE_FILE")]
    #[arg(value_parser = check_file_exists)]
    pub gene_file: Option<PathBuf>,

    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(help = "Genome build selecting the background composition (hg18, hg19, mm8, mm9, mm10)")]
    #[clap(value_name = "GENOME")]
    #[clap(default_value = "mm9")]
    pub genome: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "aggregation")]
    #[clap(value_name = "TYPE")]
    #[clap(help = "Sigmoid aggregation type (0 or 1)")]
    #[clap(default_value = "1")]
    pub aggregation: AggregationType,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "mode")]
    #[clap(value_name = "MODE")]
    #[clap(help = "Matrix cell contents (affinity or best-scan)")]
    #[clap(default_value = "affinity")]
    pub mode: ScoringMode,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("filter")))]
#[command(arg_required_else_help(true))]
pub struct FilterArgs {
    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "sequences")]
    #[clap(help = "FASTA file with region sequences")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub sequences_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'f')]
    #[clap(long = "gene-file")]
    #[clap(help = "Gene proximity table")]
    #[clap(value_name = "GENE_FILE")]
    #[arg(value_parser = check_file_exists)]
    pub gene_file: PathBuf,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output FASTA [default: gene file with .fsa extension]")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[clap(required = true)]
    #[clap(short = 'm')]
    #[clap(long = "motifs")]
    #[clap(help = "Log-odds motif library")]
    #[clap(value_name = "MOTIFS")]
    #[arg(value_parser = check_file_exists)]
    pub motifs_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "ids")]
    #[clap(help = "Motif identifiers, one per line in library order")]
    #[clap(value_name = "IDS")]
    #[arg(value_parser = check_file_exists)]
    pub ids_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "calibration")]
    #[clap(help = "Motif calibration (JSON or tab-delimited id, threshold, sum, fp)")]
    #[clap(value_name = "CALIBRATION")]
    #[arg(value_parser = check_file_exists)]
    pub calibration_path: PathBuf,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}
