use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// scanline: run nmap with a live progress line
///
/// Everything after scanline's own options is handed to the scanner
/// unchanged. Periodic stats are requested automatically unless the
/// arguments already contain `--stats-every`.
#[derive(Parser, Debug)]
#[command(
    name = "scanline",
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print help (`-h` is passed to the scanner)
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Scanner executable to run
    #[arg(long, value_name = "PATH", default_value = "nmap")]
    pub scanner: String,

    /// YAML file overriding the status line styles
    #[arg(long, value_name = "PATH")]
    pub theme: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write debug logs to daily rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Arguments passed to the scanner verbatim
    #[arg(
        value_name = "SCANNER_ARGS",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub scanner_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("scanline").chain(args.iter().copied()))
    }

    #[test]
    fn test_scanner_args_are_captured_verbatim() {
        let cli = parse(&["-sV", "-p", "1-1000", "--open", "scanme.nmap.org"]).unwrap();
        assert_eq!(cli.scanner, "nmap");
        assert_eq!(
            cli.scanner_args,
            vec!["-sV", "-p", "1-1000", "--open", "scanme.nmap.org"]
        );
    }

    #[test]
    fn test_own_options_before_scanner_args() {
        let cli = parse(&[
            "--no-color",
            "--scanner",
            "/opt/nmap/bin/nmap",
            "--theme",
            "t.yaml",
            "-Pn",
            "10.0.0.1",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.scanner, "/opt/nmap/bin/nmap");
        assert_eq!(cli.theme, Some(PathBuf::from("t.yaml")));
        assert_eq!(cli.scanner_args, vec!["-Pn", "10.0.0.1"]);
    }

    #[test]
    fn test_options_after_first_scanner_arg_belong_to_scanner() {
        let cli = parse(&["10.0.0.1", "--no-color"]).unwrap();
        assert!(!cli.no_color);
        assert_eq!(cli.scanner_args, vec!["10.0.0.1", "--no-color"]);
    }

    #[test]
    fn test_short_flags_are_not_ours() {
        let cli = parse(&["-V"]).unwrap();
        assert_eq!(cli.scanner_args, vec!["-V"]);
    }

    #[test]
    fn test_short_help_goes_to_scanner() {
        let cli = parse(&["-h"]).unwrap();
        assert_eq!(cli.scanner_args, vec!["-h"]);
        assert_eq!(cli.help, None);
    }

    #[test]
    fn test_long_help_is_ours() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_scanner_args_required() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
