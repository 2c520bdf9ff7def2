use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "playstat", version)]
#[command(about = "Decode a shift-ciphered play script and summarize its structure.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode the script and write the statistics report
    Analyze(AnalyzeCmd),
    /// Decode the script and write the plaintext
    Decode(DecodeCmd),
    /// Print the threshold index and the shift key
    Key(KeyCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct AnalyzeCmd {
    /// Input file path, or '-' for stdin
    pub input: String,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub to: Format,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct DecodeCmd {
    /// Input file path, or '-' for stdin
    pub input: String,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output file path (optional)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct KeyCmd {
    /// Partial-sum threshold (defaults to the configured one)
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Format {
    Json,
    Tsv,
    Txt,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Tsv => "tsv",
            Format::Txt => "txt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_defaults() {
        let args = Args::try_parse_from(["playstat", "analyze", "play.txt"]).unwrap();
        match args.command {
            Command::Analyze(cmd) => {
                assert_eq!(cmd.input, "play.txt");
                assert_eq!(cmd.to, Format::Json);
                assert!(!cmd.out.stdout);
                assert!(cmd.out.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_key_threshold_as_text() {
        let args = Args::try_parse_from(["playstat", "key", "--threshold", "abc"]).unwrap();
        match args.command {
            Command::Key(cmd) => assert_eq!(cmd.threshold.as_deref(), Some("abc")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags() {
        let args = Args::try_parse_from([
            "playstat",
            "--log-level",
            "debug",
            "decode",
            "-",
            "--stdout",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Command::Decode(ref c) if c.out.stdout));
    }
}
