//! unresume CLI - résumé text extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use unresume::{render, JsonFormat, ParseOptions, ParseOutput, Unresume};

#[derive(Parser)]
#[command(name = "unresume")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract text, links and emails from PDF and Word résumés as JSON",
    long_about = None
)]
struct Cli {
    /// Input résumé (.pdf, .doc, .docx)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output indented JSON
    #[arg(long)]
    pretty: bool,

    /// Report unreadable documents as errors instead of empty text
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        if self.strict {
            ParseOptions::new().strict()
        } else {
            ParseOptions::new().lenient()
        }
    }

    fn json_format(&self) -> JsonFormat {
        if self.pretty {
            JsonFormat::Pretty
        } else {
            JsonFormat::Compact
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let output = Unresume::new()
        .with_options(cli.parse_options())
        .parse_output(cli.input.as_deref());

    if let ParseOutput::Failed(failure) = &output {
        log::debug!("no extraction: {}", failure.error);
    }

    // The payload carries extraction errors; only failing to emit it is fatal.
    if let Err(e) = emit(&output, cli.json_format(), cli.output.as_deref()) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn emit(
    output: &ParseOutput,
    format: JsonFormat,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = render::to_json(output, format)?;

    if let Some(path) = path {
        fs::write(path, &json)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
