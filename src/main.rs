//! certgen – command-line certificate generator.
//!
//! Usage:
//!   certgen <name> <registration-number> [output-dir] [--env-file PATH]
//!           [--dump-layout] [--dump-config]
//!
//! Layout and styling come from environment variables (a `.env` file in the
//! working directory is loaded first). If `output-dir` is omitted the PDF is
//! written to the current directory.

use std::{env, path::PathBuf, process};

use cert_forge::pipeline::{compute_layout, generate, CertificateRequest};
use cert_forge::RenderConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let mut positional: Vec<String> = Vec::new();
    let mut env_file: Option<PathBuf> = None;
    let mut dump_layout = false;
    let mut dump_config = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--env-file" | "-e" => match iter.next() {
                Some(v) => env_file = Some(PathBuf::from(v)),
                None => {
                    eprintln!("Error: --env-file needs a path.");
                    process::exit(1);
                }
            },
            "--dump-layout" => dump_layout = true,
            "--dump-config" => dump_config = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            value => positional.push(value.to_string()),
        }
    }

    if positional.len() < 2 || positional.len() > 3 {
        eprintln!("Error: expected <name> <registration-number> [output-dir].");
        print_usage(&args[0]);
        process::exit(1);
    }

    if let Some(path) = &env_file {
        if let Err(e) = dotenvy::from_path(path) {
            eprintln!("Error reading '{}': {e}", path.display());
            process::exit(1);
        }
    }
    let config = RenderConfig::from_env();

    if dump_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serialising config: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let output_dir = positional
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let request = CertificateRequest::new(&positional[0], &positional[1], output_dir);

    if dump_layout {
        println!("{}", compute_layout(&request, &config).to_json());
        return;
    }

    match generate(&request, &config) {
        Ok(path) => println!("{}", path.display()),
        Err(e) => {
            eprintln!("Error generating certificate: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("certgen – certificate PDF generator (cert-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <name> <registration-number> [output-dir] [flags]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <name>                 Recipient name printed on the certificate");
    eprintln!("  <registration-number>  Printed, encoded in the QR URL and used as filename");
    eprintln!("  [output-dir]           Directory for the PDF (default: current directory)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --env-file, -e PATH    Load settings from PATH before the environment");
    eprintln!("  --dump-layout          Print the computed layout as JSON, write nothing");
    eprintln!("  --dump-config          Print the resolved configuration as JSON");
    eprintln!("  --help                 Print this message");
    eprintln!();
    eprintln!("Diagnostics (page size, filename) are logged at info level;");
    eprintln!("set RUST_LOG=warn to silence them or RUST_LOG=debug for more.");
    eprintln!();
    eprintln!("Settings (environment): TEMPLATE_IMAGE, FONT_FAMILY, TEMPLATE_WIDTH_PX,");
    eprintln!("  TEMPLATE_HEIGHT_PX, DPI, NAME_*/REG_* (SIZE, LEFT, TOP, COLOR_R/G/B, BOLD,");
    eprintln!("  ALIGN), REG_LABEL, QR_LEFT, QR_TOP, QR_SIZE, QR_ERROR_CORRECTION,");
    eprintln!("  QR_FG_R/G/B/A, QR_BG_R/G/B/A, VERIFICATION_BASE_URL, FILENAME_INCLUDE_NAME");
}
