//! Compute the 2-D FFT magnitude image of a grayscale PNG.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fft-tool")]
#[command(about = "Compute 2D FFT of a grayscale PNG")]
struct Args {
    /// Input PNG file
    input: PathBuf,

    /// Output PNG file
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    spectrum::compute_fft(&args.input, &args.output).with_context(|| {
        format!(
            "Failed to compute FFT of {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    info!(input = %args.input.display(), output = %args.output.display(), "Wrote FFT magnitude image");
    Ok(())
}
