//! daovote — command-line client for the DAO voting contract.

use anyhow::Context;
use clap::Parser;
use daovote_contract::{ContractAccessor, HttpContractAccessor};
use daovote_provider::{HttpWalletProvider, Notifier, StderrNotifier, WalletProvider};
use daovote_types::ProposalId;
use daovote_utils::LogFormat;
use daovote_workflow::{ClientConfig, VoteOutcome, VotingWorkflow};
use std::path::PathBuf;

type Client = VotingWorkflow<HttpContractAccessor, HttpWalletProvider, StderrNotifier>;

#[derive(Parser, Debug)]
#[command(name = "daovote", about = "List, and vote on, DAO proposals")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DAOVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Wallet-capable JSON-RPC endpoint used to authorize accounts and send votes.
    #[arg(long, env = "DAOVOTE_WALLET_URL")]
    wallet_url: Option<String>,

    /// Read-only JSON-RPC endpoint used when no wallet is configured.
    #[arg(long, env = "DAOVOTE_RPC_URL")]
    rpc_url: Option<String>,

    /// Address of the DAO contract.
    #[arg(long, env = "DAOVOTE_CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Issue each proposal's two reads concurrently.
    #[arg(long, env = "DAOVOTE_PARALLEL_READS")]
    parallel_reads: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DAOVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DAOVOTE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show all proposals.
    Proposals,
    /// Connect the wallet and show proposals with vote actions.
    Connect,
    /// Vote on a proposal as the wallet's first account.
    Vote {
        /// Proposal id (starting at 1).
        id: u64,
    },
}

impl Cli {
    /// Layer flags and env vars over `base`.
    fn apply_to(&self, base: ClientConfig) -> ClientConfig {
        ClientConfig {
            wallet_url: self.wallet_url.clone().or(base.wallet_url),
            rpc_url: self.rpc_url.clone().or(base.rpc_url),
            contract_address: self
                .contract_address
                .clone()
                .unwrap_or(base.contract_address),
            parallel_detail_reads: self.parallel_reads || base.parallel_detail_reads,
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            ..base
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let base = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    Ok(cli.apply_to(base))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    daovote_utils::init_logging(config.log_format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }
    tracing::debug!(
        wallet = ?config.wallet_url,
        rpc = ?config.rpc_url,
        contract = %config.contract_address,
        "client configured"
    );

    let wallet = config
        .wallet_provider()
        .context("building wallet provider")?;
    let mut client: Client =
        VotingWorkflow::new(config.contract_accessor(), wallet, StderrNotifier)
            .with_read_mode(config.read_mode());

    let result = run(&mut client, &cli.command).await;
    print!("{}", client.view());
    result
}

/// Run `command` after the initial sync.
///
/// A failed initialization is logged and the command still runs: connecting
/// works without a contract handle, and a handle may be present even when
/// the first sync failed. Only `proposals` reports it as its own failure.
async fn run<A, W, N>(client: &mut VotingWorkflow<A, W, N>, command: &Command) -> anyhow::Result<()>
where
    A: ContractAccessor,
    W: WalletProvider,
    N: Notifier,
{
    let initialized = client.initialize().await;
    if let Err(e) = &initialized {
        tracing::warn!(error = %e, "continuing without an initial proposal list");
    }

    match command {
        Command::Proposals => {
            initialized.context("loading proposals")?;
            Ok(())
        }
        Command::Connect => {
            client.connect_wallet().await.context("connecting wallet")?;
            Ok(())
        }
        Command::Vote { id } => {
            let id = ProposalId::new(*id)?;
            client.connect_wallet().await.context("connecting wallet")?;
            match client.vote_on_proposal(id).await.context("voting")? {
                VoteOutcome::Submitted(receipt) => {
                    tracing::info!(
                        proposal = %id,
                        tx = %receipt.transaction_hash,
                        "vote included"
                    );
                    Ok(())
                }
                VoteOutcome::Skipped => anyhow::bail!("vote on {id} was not sent"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daovote_nullables::{NullAccessor, NullContract, NullNotifier, NullWallet, ResolveFailure};
    use daovote_types::Address;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("daovote").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_vote_subcommand() {
        let cli = parse(&["vote", "3"]);
        assert_eq!(cli.command, Command::Vote { id: 3 });
    }

    #[test]
    fn rejects_non_numeric_proposal_id() {
        assert!(Cli::try_parse_from(["daovote", "vote", "three"]).is_err());
    }

    #[test]
    fn flags_override_file_settings() {
        let base = ClientConfig {
            wallet_url: Some("http://file-wallet".into()),
            log_level: "warn".into(),
            ..Default::default()
        };
        let cli = parse(&[
            "--rpc-url",
            "http://flag-rpc",
            "--log-format",
            "json",
            "--parallel-reads",
            "proposals",
        ]);

        let config = cli.apply_to(base);

        assert_eq!(config.wallet_url.as_deref(), Some("http://file-wallet"));
        assert_eq!(config.rpc_url.as_deref(), Some("http://flag-rpc"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "warn");
        assert!(config.parallel_detail_reads);
    }

    fn voter() -> Address {
        Address::new([0xab; 20])
    }

    fn scenario() -> NullContract {
        NullContract::new()
            .with_proposal("Fund X", 5, false, 40)
            .with_proposal("Fund Y", 10, true, 80)
    }

    fn client(
        accessor: NullAccessor,
        wallet: &NullWallet,
    ) -> VotingWorkflow<NullAccessor, NullWallet, NullNotifier> {
        VotingWorkflow::new(accessor, Some(wallet.clone()), NullNotifier::new())
    }

    #[tokio::test]
    async fn connects_and_votes_after_failed_first_sync() {
        let contract = scenario();
        contract.fail_count(true);
        let wallet = NullWallet::with_accounts(vec![voter()]);

        let mut wf = client(NullAccessor::new(contract.clone()), &wallet);
        run(&mut wf, &Command::Connect).await.expect("connect runs");
        assert_eq!(wf.state().account(), Some(&voter()));

        let mut wf = client(NullAccessor::new(contract.clone()), &wallet);
        run(&mut wf, &Command::Vote { id: 1 }).await.expect("vote runs");
        assert_eq!(contract.votes().len(), 1);
        assert!(!wf.state().loading());
    }

    #[tokio::test]
    async fn connects_after_failed_resolution() {
        let accessor =
            NullAccessor::failing_first(scenario(), vec![ResolveFailure::ProviderUnavailable]);
        let wallet = NullWallet::with_accounts(vec![voter()]);
        let mut wf = client(accessor, &wallet);

        run(&mut wf, &Command::Connect).await.expect("connect runs");

        assert_eq!(wallet.requests(), 1);
        assert_eq!(wf.state().account(), Some(&voter()));
        assert!(!wf.state().has_contract());
    }

    #[tokio::test]
    async fn proposals_fails_when_initialization_fails() {
        let contract = scenario();
        contract.fail_count(true);
        let wallet = NullWallet::with_accounts(vec![voter()]);
        let mut wf = client(NullAccessor::new(contract), &wallet);

        assert!(run(&mut wf, &Command::Proposals).await.is_err());
        assert_eq!(wallet.requests(), 0);
    }

    #[tokio::test]
    async fn vote_without_contract_is_a_failure() {
        let accessor =
            NullAccessor::failing_first(scenario(), vec![ResolveFailure::Resolution]);
        let wallet = NullWallet::with_accounts(vec![voter()]);
        let mut wf = client(accessor, &wallet);

        assert!(run(&mut wf, &Command::Vote { id: 1 }).await.is_err());
    }

    #[test]
    fn defaults_apply_without_flags() {
        let config = parse(&["connect"]).apply_to(ClientConfig::default());
        assert_eq!(config, ClientConfig::default());
    }
}
