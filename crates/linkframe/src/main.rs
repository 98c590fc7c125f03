mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use linkframe_frame::ErrorCode;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "linkframe", version, about = "Data-link framing CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Error-detection code (must match the other end of the link).
    #[arg(
        long,
        value_name = "CODE",
        default_value = "crc8",
        env = "LINKFRAME_ERROR_CODE",
        global = true
    )]
    error_code: ErrorCode,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, cli.error_code, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from(["linkframe", "encode", "--data", "hello"])
            .expect("encode args should parse");

        assert!(matches!(cli.command, Command::Encode(_)));
        assert_eq!(cli.error_code, ErrorCode::Crc8);
    }

    #[test]
    fn parses_error_code_flag() {
        let cli = Cli::try_parse_from([
            "linkframe",
            "--error-code",
            "parity",
            "decode",
            "--hex",
            "7b00 7d",
        ])
        .expect("decode args should parse");

        assert_eq!(cli.error_code, ErrorCode::Parity);
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn rejects_unknown_error_code() {
        let err = Cli::try_parse_from(["linkframe", "--error-code", "md5", "checksum"])
            .expect_err("unknown code should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "linkframe",
            "encode",
            "--hex",
            "00ff",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_simulate_subcommand() {
        let cli = Cli::try_parse_from([
            "linkframe",
            "simulate",
            "--data",
            "noisy",
            "--flip-every",
            "7",
            "--repeat",
            "3",
        ])
        .expect("simulate args should parse");
        assert!(matches!(cli.command, Command::Simulate(_)));
    }
}
