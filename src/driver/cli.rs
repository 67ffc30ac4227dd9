//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

use crate::adapter::config::DEFAULT_CONFIG_FILE;

/// ローカルフォルダのファイルをSharePointライブラリへ同期するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "spsync", version)]
#[command(about = "Copy new files from a local folder to a SharePoint document library", long_about = None)]
pub struct Args {
    /// Config file path (looked up in the working directory, then beside the executable)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Fernet key used to decrypt the client secret
    #[arg(long, env = "SPSYNC_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Dry run mode - check existence but don't upload
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Wait for Enter before exiting when the run fails
    #[arg(long)]
    pub pause_on_exit: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 補助コマンド
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encrypt a client secret for the [SHAREPOINT] password entry
    EncryptSecret {
        /// Plain client secret
        value: String,
    },

    /// Print a new random Fernet key
    GenerateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_config() {
        let args = Args::parse_from(["spsync"]);
        assert_eq!(args.config, "tools_XML.ini");
        assert!(!args.dry_run);
        assert!(!args.pause_on_exit);
        assert!(args.report.is_none());
        assert!(args.command.is_none());
    }

    #[test]
    fn test_args_dry_run() {
        let args = Args::parse_from(["spsync", "--dry-run"]);
        assert!(args.dry_run);
    }

    #[test]
    fn test_args_custom_config() {
        let args = Args::parse_from(["spsync", "-c", "/etc/spsync/custom.ini"]);
        assert_eq!(args.config, "/etc/spsync/custom.ini");
    }

    #[test]
    fn test_args_secret_key_flag() {
        let args = Args::parse_from(["spsync", "--secret-key", "abc"]);
        assert_eq!(args.secret_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_args_combined() {
        let args = Args::parse_from([
            "spsync",
            "--dry-run",
            "--report",
            "out/report.json",
            "--pause-on-exit",
        ]);
        assert!(args.dry_run);
        assert!(args.pause_on_exit);
        assert_eq!(args.report.as_deref(), Some("out/report.json"));
    }

    #[test]
    fn test_encrypt_secret_command() {
        let args = Args::parse_from(["spsync", "encrypt-secret", "s3cret"]);
        assert_eq!(
            args.command,
            Some(Command::EncryptSecret {
                value: "s3cret".to_string()
            })
        );
    }

    #[test]
    fn test_generate_key_command() {
        let args = Args::parse_from(["spsync", "generate-key"]);
        assert_eq!(args.command, Some(Command::GenerateKey));
    }
}
