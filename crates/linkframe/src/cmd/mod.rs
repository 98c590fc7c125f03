use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use linkframe_frame::ErrorCode;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame a payload and print the wire bytes.
    Encode(EncodeArgs),
    /// Extract every frame from wire bytes.
    Decode(DecodeArgs),
    /// Print parity and CRC-8 of a payload.
    Checksum(ChecksumArgs),
    /// Frame a payload and send it over a Unix socket.
    Send(SendArgs),
    /// Accept one peer on a Unix socket and print received frames.
    Listen(ListenArgs),
    /// Push a payload through an in-process noisy loopback.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, code: ErrorCode, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, code, format),
        Command::Decode(args) => decode::run(args, code, format),
        Command::Checksum(args) => checksum::run(args, code, format),
        Command::Send(args) => send::run(args, code),
        Command::Listen(args) => listen::run(args, code, format),
        Command::Simulate(args) => simulate::run(args, code, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where a payload comes from. Defaults to stdin.
#[derive(Args, Debug, Default)]
pub struct PayloadArgs {
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex-encoded payload (whitespace ignored).
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn resolve(&self) -> CliResult<Vec<u8>> {
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(text) = &self.hex {
            return parse_hex(text);
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("failed reading stdin", err))?;
        Ok(buf)
    }
}

pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(compact).map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")))
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire bytes to scan.
    #[command(flatten)]
    pub wire: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Flip one bit in every N-th wire byte (0 disables).
    #[arg(long, default_value = "0")]
    pub flip_every: usize,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Flip one bit in every N-th wire byte (0 disables).
    #[arg(long, default_value = "0")]
    pub flip_every: usize,
    /// Bit index flipped in damaged bytes.
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..8))]
    pub flip_bit: u8,
    /// Number of times the payload is sent.
    #[arg(long, default_value = "1")]
    pub repeat: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
