//! flexdex - flexible index generator

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use flexdex::{Backend, Diagnostics, Processor, Settings, Severity};

#[derive(Parser)]
#[command(name = "flexdex")]
#[command(version, about = "Flexible back-of-document index generator", long_about = None)]
#[command(after_help = "EXAMPLES:
    flexdex doc.html out.html              Render with built-in styles
    flexdex -b docbook doc.xml out.xml     DocBook output
    flexdex -c styles.conf doc.html out.html
                                           Layer a style configuration file")]
struct Cli {
    /// Input file
    #[arg(value_name = "INFILE")]
    infile: String,

    /// Output file
    #[arg(value_name = "OUTFILE")]
    outfile: String,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output backend (html, xhtml11, docbook, docbook45)
    #[arg(short, long, default_value = "xhtml11")]
    backend: String,

    /// Additional style configuration file (repeatable)
    #[arg(short, long = "config", value_name = "FILE")]
    config: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> flexdex::Result<()> {
    let backend = Backend::from_name(&cli.backend)
        .ok_or_else(|| flexdex::Error::UnknownBackend(cli.backend.clone()))?;

    let mut diag = Diagnostics::new();
    let mut settings = Settings::new();
    settings.parse_str(flexdex::BUILTIN_CONFIG, &mut diag);
    for path in &cli.config {
        let text = fs::read_to_string(path)?;
        settings.parse_str(&text, &mut diag);
    }

    let input = fs::read_to_string(&cli.infile)?;
    let processor = Processor::from_settings(backend, &settings);
    let output = processor.process(&input, &mut diag);
    fs::write(&cli.outfile, output)?;

    for report in diag.reports() {
        match report.severity {
            Severity::Warning => eprintln!("{report}"),
            Severity::Info => {
                if cli.verbose > 0 {
                    eprintln!("{report}");
                }
            }
        }
    }
    Ok(())
}
