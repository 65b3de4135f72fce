use anyhow::Result;
use bamraster_render::StrokePolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{format_error_with_suggestions, CliError};

#[derive(Parser, Debug)]
#[command(name = "bamraster")]
#[command(about = "Render the reads of a SAM/BAM region as a PNG or JPEG pileup")]
#[command(version)]
#[command(long_about = "
bamraster draws every read overlapping a genomic region, stacked into rows,
under a ruler, the reference bases, a consensus line and a depth histogram.

Examples:
  bamraster -r chr1:100-200 -o pileup.png reads.bam
  bamraster -r chr1:150+20 -R ref.fa --clip -N -o pileup.jpg reads.sam
  samtools view -h reads.bam chr1:100-200 | bamraster -r chr1:100-200 > pileup.png
  samtools view -b reads.bam chr1:100-200 | bamraster -r chr1:100-200 -o pileup.png
")]
pub struct Cli {
    /// SAM or BAM file; read from stdin when absent
    pub input: Option<PathBuf>,

    /// Region to draw: 'contig:start-end', 'contig:pos+flank' or 'contig'
    #[arg(short, long, required_unless_present = "print_config")]
    pub region: Option<String>,

    /// Output file, PNG when it ends with .png and JPEG otherwise. PNG to stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// FASTA reference used for the reference track and mismatches
    #[arg(short = 'R', long)]
    pub reference: Option<PathBuf>,

    /// Image width in pixels (at least 100)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Hide bases matching the reference
    #[arg(long = "nobase")]
    pub hide_bases: bool,

    /// Print the read name instead of its bases
    #[arg(short = 'N', long = "name")]
    pub print_name: bool,

    /// Minimum horizontal pixel distance between two reads in a row
    #[arg(long = "minh", alias = "min-distance")]
    pub min_distance: Option<f64>,

    /// Show soft and hard clipped parts of reads
    #[arg(long)]
    pub clip: bool,

    /// Draw at most this many rows; negative for no limit
    #[arg(long, alias = "maxrows", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Height of the depth histogram; 0 hides it
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i32>,

    /// Fill reads with a flat colour instead of a gradient
    #[arg(long)]
    pub no_read_gradient: bool,

    /// Highlight these positions (repeatable or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub highlight: Vec<i64>,

    /// Number of pixels between tracks and rows
    #[arg(long)]
    pub spaceyfeature: Option<u32>,

    /// How read outlines are coloured
    #[arg(long, value_enum)]
    pub stroke: Option<StrokeArg>,

    /// Minimum mapping quality of drawn reads
    #[arg(long)]
    pub min_mapq: Option<u8>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrokeArg {
    /// Pairing, mate and duplicate flags
    Flags,
    /// Grey level from the mapping quality
    Mapq,
}

impl From<StrokeArg> for StrokePolicy {
    fn from(arg: StrokeArg) -> Self {
        match arg {
            StrokeArg::Flags => StrokePolicy::Flags,
            StrokeArg::Mapq => StrokePolicy::Mapq,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.print_config {
        print!("{}", Config::example_toml()?);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    commands::render::execute(config, &cli)
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("Error: {}", format_error_with_suggestions(cli_err)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
