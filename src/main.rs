use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use markmin::{Options, Registry};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dialect {
    Xml,
    Svg,
}

impl Dialect {
    fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Xml,
        }
    }
}

#[derive(Parser)]
#[command(name = "markmin")]
#[command(about = "A streaming XML and SVG minifier", long_about = None)]
struct Cli {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Markup dialect (default: svg for .svg inputs, xml otherwise)
    #[arg(short, long, value_enum)]
    dialect: Option<Dialect>,

    /// Keep processing instructions and the XML declaration in SVG
    #[arg(long)]
    keep_processing_instructions: bool,

    /// Keep the version attribute on svg elements
    #[arg(long)]
    keep_version: bool,

    /// Maximum tokens to look ahead when trimming whitespace
    #[arg(long, default_value = "4096")]
    max_lookahead: usize,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(&cli.input)?
    };

    let input_len = input.len();

    let options = Options {
        remove_processing_instructions: !cli.keep_processing_instructions,
        remove_version: !cli.keep_version,
        max_lookahead: cli.max_lookahead,
    };
    let dialect = cli
        .dialect
        .unwrap_or_else(|| Dialect::from_path(&cli.input));

    // Minify fully before touching the output, so a failure never leaves a partial file
    let mut output = Vec::with_capacity(input_len);
    match dialect {
        Dialect::Xml => markmin::xml::minify(&mut output, &input[..], &options)?,
        Dialect::Svg => {
            let registry = Registry::with_markup(options.clone());
            markmin::svg::minify(&registry, &mut output, &input[..], &options)?
        }
    }
    let output_len = output.len();

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(&output)?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    // Print stats if requested
    if cli.stats {
        let saved = input_len.saturating_sub(output_len);
        let percent = if input_len > 0 {
            (saved as f64 / input_len as f64) * 100.0
        } else {
            0.0
        };
        eprintln!(
            "{} -> {} bytes ({:.1}% smaller)",
            input_len, output_len, percent
        );
    }

    Ok(())
}
