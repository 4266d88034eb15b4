//! Command-line front end.
//!
//! Output goes to the writers passed in so the whole surface can be driven
//! from tests. Exit codes: 0 success, 1 derivation or validation error,
//! 2 usage error.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

use crate::batch::{derive_batch_with, BatchOptions};
use crate::error::{AddrgenError, ErrorCode};
use crate::validation::{count_from_u64, index_from_u64, validate_range, validate_ufvk_text};

pub const EXIT_OK: u8 = 0;
pub const EXIT_ERR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

const NOTES: &str = "Notes:
  - UFVKs are sensitive (watch-only, but reveal incoming transaction details).
  - This tool is offline; it never talks to junocashd or the network.";

#[derive(Debug, Parser)]
#[command(
    name = "juno-addrgen",
    version,
    about = "Offline address derivation (UFVK + index -> j1...) for Juno Cash.",
    after_help = NOTES,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive the address at one diversifier index
    Derive(DeriveArgs),
    /// Derive consecutive addresses starting at an index
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct UfvkSource {
    /// UFVK (jview1...)
    #[arg(long)]
    ufvk: Option<String>,
    /// Read UFVK from file
    #[arg(long, value_name = "PATH")]
    ufvk_file: Option<String>,
    /// Read UFVK from env var (name)
    #[arg(long, value_name = "VAR")]
    ufvk_env: Option<String>,
}

#[derive(Debug, Args)]
struct DeriveArgs {
    #[command(flatten)]
    source: UfvkSource,
    /// Diversifier index (0..2^32-1)
    #[arg(long, default_value_t = 0)]
    index: u64,
    /// JSON output
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct BatchArgs {
    #[command(flatten)]
    source: UfvkSource,
    /// Start diversifier index (0..2^32-1)
    #[arg(long, default_value_t = 0)]
    start: u64,
    /// Number of addresses (1..100000)
    #[arg(long, default_value_t = 0)]
    count: u64,
    /// JSON output
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Err,
}

#[derive(Serialize)]
struct DeriveResponse<'a> {
    status: Status,
    address: &'a str,
}

#[derive(Serialize)]
struct BatchResponse<'a> {
    status: Status,
    start: u32,
    count: u32,
    addresses: &'a [String],
}

#[derive(Serialize)]
struct ErrorResponse {
    status: Status,
    error: ErrorCode,
}

/// Parses `args` (including the program name) and runs the selected command.
pub fn run<I, T>(
    args: I,
    options: &BatchOptions,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, stdout, stderr),
    };

    let result = match cli.command {
        Command::Derive(args) => run_derive(args, stdout, stderr),
        Command::Batch(args) => run_batch(args, options, stdout, stderr),
    };

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to write output");
        EXIT_ERR
    })
}

fn report_parse_error(e: clap::Error, stdout: &mut dyn Write, stderr: &mut dyn Write) -> u8 {
    let (written, code) = match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            (write!(stdout, "{}", e.render()), EXIT_OK)
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::MissingSubcommand => {
            (write!(stdout, "{}", Cli::command().render_help()), EXIT_USAGE)
        }
        _ => (write!(stderr, "{}", e.render()), EXIT_USAGE),
    };
    match written {
        Ok(()) => code,
        Err(_) => EXIT_ERR,
    }
}

fn run_derive(
    args: DeriveArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> io::Result<u8> {
    let ufvk = match read_ufvk(&args.source) {
        Ok(ufvk) => ufvk,
        Err(e) => {
            writeln!(stderr, "{:#}", e)?;
            return Ok(EXIT_USAGE);
        }
    };

    let index = match index_from_u64("index", args.index) {
        Ok(index) => index,
        Err(e) => return write_validation_err(stdout, stderr, args.json, &e),
    };

    let ufvk = match validate_ufvk_text(&ufvk) {
        Ok(ufvk) => ufvk,
        Err(e) => return write_addrgen_err(stdout, stderr, args.json, &e),
    };

    tracing::debug!(index, "Running derive");

    let address = match crate::batch::derive(ufvk, index) {
        Ok(address) => address,
        Err(e) => return write_addrgen_err(stdout, stderr, args.json, &e),
    };

    if args.json {
        write_json(
            stdout,
            &DeriveResponse {
                status: Status::Ok,
                address: &address,
            },
        )?;
    } else {
        writeln!(stdout, "{}", address)?;
    }
    Ok(EXIT_OK)
}

fn run_batch(
    args: BatchArgs,
    options: &BatchOptions,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> io::Result<u8> {
    let ufvk = match read_ufvk(&args.source) {
        Ok(ufvk) => ufvk,
        Err(e) => {
            writeln!(stderr, "{:#}", e)?;
            return Ok(EXIT_USAGE);
        }
    };

    let start = match index_from_u64("start", args.start) {
        Ok(start) => start,
        Err(e) => return write_validation_err(stdout, stderr, args.json, &e),
    };
    let count = match count_from_u64(args.count) {
        Ok(count) => count,
        Err(e) => return write_validation_err(stdout, stderr, args.json, &e),
    };
    if let Err(e) = validate_range(start, count) {
        return write_addrgen_err(stdout, stderr, args.json, &e);
    }

    let ufvk = match validate_ufvk_text(&ufvk) {
        Ok(ufvk) => ufvk,
        Err(e) => return write_addrgen_err(stdout, stderr, args.json, &e),
    };

    tracing::debug!(start, count, "Running batch");

    let addresses = match derive_batch_with(ufvk, start, count, options) {
        Ok(addresses) => addresses,
        Err(e) => return write_addrgen_err(stdout, stderr, args.json, &e),
    };

    if args.json {
        write_json(
            stdout,
            &BatchResponse {
                status: Status::Ok,
                start,
                count,
                addresses: &addresses,
            },
        )?;
    } else {
        for address in &addresses {
            writeln!(stdout, "{}", address)?;
        }
    }
    Ok(EXIT_OK)
}

/// Resolves the UFVK text from exactly one of the three sources.
fn read_ufvk(source: &UfvkSource) -> anyhow::Result<String> {
    let given = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    let flag = given(&source.ufvk);
    let file = given(&source.ufvk_file);
    let env = given(&source.ufvk_env);

    let sources = [&flag, &file, &env].iter().filter(|s| s.is_some()).count();
    if sources == 0 {
        anyhow::bail!("ufvk is required (use --ufvk, --ufvk-file, or --ufvk-env)");
    }
    if sources > 1 {
        anyhow::bail!("ufvk source conflict (use only one of --ufvk, --ufvk-file, --ufvk-env)");
    }

    if let Some(ufvk) = flag {
        return Ok(ufvk);
    }

    if let Some(var) = env {
        tracing::debug!(var = %var, "Reading UFVK from environment");
        return Ok(std::env::var(&var).unwrap_or_default().trim().to_string());
    }

    let path = file.unwrap_or_default();
    // Only the base name is echoed; the directory may itself be sensitive.
    let base = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read ufvk file ({})", base))?;
    Ok(text.trim().to_string())
}

fn write_json<T: Serialize>(stdout: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *stdout, value)?;
    writeln!(stdout)
}

/// Reports a derivation error by code only.
fn write_addrgen_err(
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    json: bool,
    err: &AddrgenError,
) -> io::Result<u8> {
    tracing::debug!(code = %err.code(), detail = %err, "Derivation failed");
    write_err(stdout, stderr, json, err.code(), None)
}

/// Reports a CLI-side bounds error with its message.
fn write_validation_err(
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    json: bool,
    err: &AddrgenError,
) -> io::Result<u8> {
    write_err(stdout, stderr, json, err.code(), err.detail().as_deref())
}

fn write_err(
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    json: bool,
    code: ErrorCode,
    message: Option<&str>,
) -> io::Result<u8> {
    if json {
        write_json(
            stdout,
            &ErrorResponse {
                status: Status::Err,
                error: code,
            },
        )?;
        return Ok(EXIT_ERR);
    }

    match message {
        Some(message) => writeln!(stderr, "{}: {}", code, message)?,
        None => writeln!(stderr, "{}", code)?,
    }
    Ok(EXIT_ERR)
}
