mod cmd;
mod exit;
mod logging;
mod output;

use clap::{Parser, ValueEnum};
use recordio_frame::{FrameConfig, FrameLayout};

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LayoutArg {
    /// Host-native magic and usize length (compatible with existing files).
    Native,
    /// Little-endian magic and 64-bit length.
    Portable,
}

impl From<LayoutArg> for FrameLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Native => FrameLayout::Native,
            LayoutArg::Portable => FrameLayout::Portable,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "recordio", version, about = "Record file CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "RECORDIO_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Frame header layout of the record file.
    #[arg(long, value_name = "LAYOUT", default_value = "native", global = true)]
    layout: LayoutArg,

    /// Reject records larger than this many bytes.
    #[arg(long, value_name = "BYTES", global = true)]
    max_payload: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            layout: self.layout.into(),
            max_payload_size: self.max_payload,
            ..FrameConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = Context {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        frame_config: cli.frame_config(),
    };
    let result = cmd::run(cli.command, &ctx);

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
    fn parses_append_subcommand() {
        let cli = Cli::try_parse_from([
            "recordio",
            "append",
            "/tmp/test.rec",
            "--data",
            "ABC",
            "--data",
            "",
            "--json",
            "{\"x\":1}",
        ])
        .expect("append args should parse");

        assert!(matches!(cli.command, Command::Append(_)));
    }

    #[test]
    fn layout_and_limit_feed_frame_config() {
        let cli = Cli::try_parse_from([
            "recordio",
            "--layout",
            "portable",
            "--max-payload",
            "1024",
            "stat",
            "/tmp/test.rec",
        ])
        .expect("stat args should parse");

        let cfg = cli.frame_config();
        assert_eq!(cfg.layout, FrameLayout::Portable);
        assert_eq!(cfg.max_payload_size, Some(1024));
        assert!(matches!(cli.command, Command::Stat(_)));
    }

    #[test]
    fn rejects_unknown_layout() {
        let err = Cli::try_parse_from(["recordio", "--layout", "big", "dump", "/tmp/x.rec"])
            .expect_err("unknown layout should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_dump_with_limit() {
        let cli = Cli::try_parse_from(["recordio", "dump", "/tmp/x.rec", "--limit", "3"])
            .expect("dump args should parse");
        match cli.command {
            Command::Dump(args) => assert_eq!(args.limit, Some(3)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
