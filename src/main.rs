//! Batch Disbursement CLI
//!
//! Interactive tool that sends transfers listed in a tab-delimited file.
//!
//! # Usage
//!
//! ```bash
//! DISBURSE_PRIVATE_KEY=... cargo run
//! cargo run -- --config prod.toml --input march.tsv --fee-ceiling 0.002
//! ```
//!
//! The program checks the node, then repeatedly asks for a list file, confirms
//! the totals with the operator, sends every transfer in order, and writes
//! `log_<timestamp>` to the output directory.
//!
//! # Exit Codes
//!
//! - 0: The operator chose to exit
//! - 1: Any error (bad configuration, unreachable node, bad list file, aborted batch, etc.)

use batch_disburse::config::{load_config, AppConfig};
use batch_disburse::core::BatchSettings;
use batch_disburse::network::eth::{EthClient, EthClientConfig};
use batch_disburse::operator::TerminalOperator;
use batch_disburse::{cli, logging, DisburseError, SessionRunner};
use std::process;
use std::time::Duration;
use tracing::error;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

async fn run(config: AppConfig) -> Result<usize, DisburseError> {
    let network = EthClient::connect(&EthClientConfig {
        rpc_url: config.rpc_url.clone(),
        native_asset: config.native_asset.clone(),
        confirmations: config.confirmations,
        poll_interval: POLL_INTERVAL,
    })
    .map_err(|cause| DisburseError::ConnectivityError { cause })?;
    let operator = TerminalOperator::stdio();

    let settings = BatchSettings {
        fee_ceiling: config.fee_ceiling,
        confirmation_timeout: config.confirmation_timeout(),
        output_dir: config.output_dir.clone(),
    };

    let runner = SessionRunner::new(
        &network,
        &operator,
        config.credentials(),
        config.default_input_path.clone(),
        settings,
    );
    runner.run().await
}

fn main() {
    dotenv::dotenv().ok();

    let args = cli::parse_args();

    let config = load_config(args.config.as_deref())
        .map(|config| args.apply_overrides(config))
        .and_then(|config| config.validate().map(|_| config));
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config)) {
        error!("{}", e);
        error!("Terminating program ...");
        process::exit(1);
    }
}
