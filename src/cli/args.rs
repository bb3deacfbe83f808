use crate::config::AppConfig;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Send batches of transfers from a tab-delimited list
#[derive(Parser, Debug)]
#[command(name = "batch-disburse")]
#[command(about = "Send batches of transfers from a tab-delimited list", long_about = None)]
pub struct CliArgs {
    /// Configuration file replacing config/disburse.{toml,yaml,json}
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Default answer to the list file prompt
    #[arg(long = "input", value_name = "FILE", help = "Default list file path")]
    pub input: Option<PathBuf>,

    #[arg(
        long = "output-dir",
        value_name = "DIR",
        help = "Directory for session log files"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long = "rpc-url", value_name = "URL", help = "Node JSON-RPC endpoint")]
    pub rpc_url: Option<String>,

    /// Largest acceptable fee for a single transfer, in ether
    #[arg(
        long = "fee-ceiling",
        value_name = "ETHER",
        help = "Largest acceptable fee per transfer, in ether"
    )]
    pub fee_ceiling: Option<Decimal>,

    #[arg(
        long = "confirmation-timeout-secs",
        value_name = "SECONDS",
        help = "Give up waiting for a receipt after this many seconds"
    )]
    pub confirmation_timeout_secs: Option<u64>,

    #[arg(long = "log-level", value_name = "FILTER", help = "Log filter, e.g. info or debug")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Apply the flags that were given on top of the loaded configuration
    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(input) = &self.input {
            config.default_input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(fee_ceiling) = self.fee_ceiling {
            config.fee_ceiling = fee_ceiling;
        }
        if let Some(seconds) = self.confirmation_timeout_secs {
            config.confirmation_timeout_secs = Some(seconds);
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> AppConfig {
        AppConfig {
            default_input_path: PathBuf::from("input/list.tsv"),
            output_dir: PathBuf::from("output"),
            rpc_url: "http://localhost:8545".to_string(),
            private_key: "key".to_string(),
            fee_ceiling: Decimal::new(1, 2),
            native_asset: "ETH".to_string(),
            confirmations: 1,
            confirmation_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        let config = parsed.apply_overrides(config());

        assert_eq!(config.fee_ceiling, Decimal::new(1, 2));
        assert_eq!(config.default_input_path, PathBuf::from("input/list.tsv"));
        assert_eq!(config.confirmation_timeout_secs, None);
    }

    #[test]
    fn test_all_flags_override() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--config",
            "prod.toml",
            "--input",
            "march.tsv",
            "--output-dir",
            "logs",
            "--rpc-url",
            "http://node:8545",
            "--fee-ceiling",
            "0.005",
            "--confirmation-timeout-secs",
            "300",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("prod.toml")));

        let config = parsed.apply_overrides(config());

        assert_eq!(config.default_input_path, PathBuf::from("march.tsv"));
        assert_eq!(config.output_dir, PathBuf::from("logs"));
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.fee_ceiling, Decimal::new(5, 3));
        assert_eq!(config.confirmation_timeout_secs, Some(300));
        assert_eq!(config.log_level, "debug");
        // Never settable from the command line
        assert_eq!(config.private_key, "key");
    }

    #[rstest]
    #[case::bad_fee_ceiling(&["program", "--fee-ceiling", "cheap"])]
    #[case::bad_timeout(&["program", "--confirmation-timeout-secs", "-5"])]
    #[case::unknown_flag(&["program", "--private-key", "abc"])]
    #[case::positional(&["program", "list.tsv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
