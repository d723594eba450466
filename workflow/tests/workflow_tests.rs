//! Integration tests driving the workflow end-to-end against nullables:
//! initialization → sync → wallet connection → vote → refresh.

use daovote_nullables::{Call, NullAccessor, NullContract, NullNotifier, NullWallet, ResolveFailure};
use daovote_types::{Address, ProposalId, U256};
use daovote_workflow::{
    Phase, ReadMode, SyncOutcome, VoteOutcome, VotingWorkflow, WorkflowError,
    WALLET_UNAVAILABLE_NOTICE,
};

type Workflow = VotingWorkflow<NullAccessor, NullWallet, NullNotifier>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn account() -> Address {
    Address::parse("0x0000000000000000000000000000000000000abc").expect("valid address")
}

fn other_account() -> Address {
    Address::parse("0x0000000000000000000000000000000000000def").expect("valid address")
}

fn id(n: u64) -> ProposalId {
    ProposalId::new(n).expect("non-zero id")
}

/// Two proposals: #1 open at 40%, #2 executed at 80%.
fn scenario_contract() -> NullContract {
    NullContract::new()
        .with_proposal("Fund X", 5, false, 40)
        .with_proposal("Fund Y", 10, true, 80)
}

fn workflow_with(
    accessor: NullAccessor,
    wallet: Option<NullWallet>,
) -> (Workflow, NullNotifier) {
    let notifier = NullNotifier::new();
    let workflow = VotingWorkflow::new(accessor, wallet, notifier.clone());
    (workflow, notifier)
}

fn workflow(contract: &NullContract, wallet: Option<NullWallet>) -> (Workflow, NullNotifier) {
    workflow_with(NullAccessor::new(contract.clone()), wallet)
}

fn descriptions(workflow: &Workflow) -> Vec<String> {
    workflow
        .state()
        .proposals()
        .iter()
        .map(|p| p.description.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Initialization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn initialize_resolves_and_runs_initial_sync() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, None);

    let outcome = wf.initialize().await.expect("initialize");

    assert_eq!(outcome, SyncOutcome::Committed { count: 2 });
    assert!(wf.state().has_contract());
    assert_eq!(wf.state().phase(), Phase::Ready);
    assert!(!wf.state().loading());
    assert_eq!(wf.state().sync_cycles(), 1);
    assert_eq!(contract.count_calls(), 1);
    assert_eq!(descriptions(&wf), vec!["Fund X", "Fund Y"]);
}

#[tokio::test]
async fn initialize_without_provider_leaves_handle_absent() {
    let contract = scenario_contract();
    let accessor =
        NullAccessor::failing_first(contract.clone(), vec![ResolveFailure::ProviderUnavailable]);
    let (mut wf, notifier) = workflow_with(accessor, None);

    let err = wf.initialize().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderUnavailable(_)));
    assert!(!wf.state().has_contract());
    assert_eq!(wf.state().phase(), Phase::Uninitialized);
    assert!(!wf.state().loading());
    assert!(contract.calls().is_empty());
    // Only wallet connection failures are shown to the user.
    assert!(notifier.notices().is_empty());

    assert_eq!(wf.sync_proposals().await.unwrap(), SyncOutcome::NoContract);
    assert!(contract.calls().is_empty());
}

#[tokio::test]
async fn resolution_error_is_reported() {
    let accessor = NullAccessor::failing_first(NullContract::new(), vec![ResolveFailure::Resolution]);
    let (mut wf, _) = workflow_with(accessor, None);

    let err = wf.initialize().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ContractResolution(_)));
    assert!(!wf.state().has_contract());
}

#[tokio::test]
async fn retry_initialize_recovers_after_failure() {
    let contract = scenario_contract();
    let accessor =
        NullAccessor::failing_first(contract.clone(), vec![ResolveFailure::ProviderUnavailable]);
    let (mut wf, _) = workflow_with(accessor.clone(), None);

    assert!(wf.initialize().await.is_err());
    let outcome = wf.retry_initialize().await.expect("retry");

    assert_eq!(outcome, SyncOutcome::Committed { count: 2 });
    assert!(wf.state().has_contract());
    assert_eq!(accessor.resolves(), 2);
}

#[tokio::test]
async fn retry_initialize_is_noop_once_resolved() {
    let contract = scenario_contract();
    let accessor = NullAccessor::new(contract.clone());
    let (mut wf, _) = workflow_with(accessor.clone(), None);

    wf.initialize().await.expect("initialize");
    let outcome = wf.retry_initialize().await.expect("retry");

    assert_eq!(outcome, SyncOutcome::AlreadyResolved);
    assert_eq!(accessor.resolves(), 1);
    assert_eq!(contract.count_calls(), 1);
}

// ---------------------------------------------------------------------------
// 2. Sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_with_no_proposals_commits_empty_list() {
    let contract = NullContract::new();
    let (mut wf, _) = workflow(&contract, None);

    assert_eq!(
        wf.initialize().await.unwrap(),
        SyncOutcome::Committed { count: 0 }
    );
    assert!(wf.state().proposals().is_empty());
    assert_eq!(contract.calls(), vec![Call::Count]);
}

#[tokio::test]
async fn sync_reads_detail_then_percentage_per_id_in_order() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, None);

    wf.initialize().await.expect("initialize");

    assert_eq!(
        contract.calls(),
        vec![
            Call::Count,
            Call::Proposal(id(1)),
            Call::Percentage(id(1)),
            Call::Proposal(id(2)),
            Call::Percentage(id(2)),
        ]
    );
    let ids: Vec<u64> = wf.state().proposals().iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(wf.state().proposals()[0].vote_percentage.get(), 40);
    assert!(wf.state().proposals()[1].executed);
}

#[tokio::test]
async fn failed_percentage_read_keeps_previous_proposals() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, None);
    wf.initialize().await.expect("initialize");

    contract.push_proposal("Fund Z", 0, false, 0);
    contract.fail_percentage_at(Some(3));
    let err = wf.sync_proposals().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ContractReadFailure(_)));
    assert_eq!(descriptions(&wf), vec!["Fund X", "Fund Y"]);
    assert!(!wf.state().loading());
    assert_eq!(wf.state().phase(), Phase::Ready);
}

#[tokio::test]
async fn failed_detail_read_keeps_previous_proposals() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, None);
    wf.initialize().await.expect("initialize");

    contract.fail_detail_at(Some(1));
    assert!(wf.sync_proposals().await.is_err());
    assert_eq!(descriptions(&wf), vec!["Fund X", "Fund Y"]);

    // The failure is not sticky: the next sync commits again.
    contract.fail_detail_at(None);
    contract.push_proposal("Fund Z", 0, false, 0);
    assert_eq!(
        wf.sync_proposals().await.unwrap(),
        SyncOutcome::Committed { count: 3 }
    );
    assert_eq!(descriptions(&wf), vec!["Fund X", "Fund Y", "Fund Z"]);
}

#[tokio::test]
async fn failed_count_read_on_startup_leaves_empty_list() {
    let contract = scenario_contract();
    contract.fail_count(true);
    let (mut wf, _) = workflow(&contract, None);

    let err = wf.initialize().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ContractReadFailure(_)));
    // The handle was resolved even though the first sync failed.
    assert!(wf.state().has_contract());
    assert!(wf.state().proposals().is_empty());
    assert!(!wf.state().loading());
}

#[tokio::test]
async fn paired_reads_produce_the_same_list() {
    let contract = scenario_contract();
    let notifier = NullNotifier::new();
    let mut wf = VotingWorkflow::new(NullAccessor::new(contract.clone()), None::<NullWallet>, notifier)
        .with_read_mode(ReadMode::PairedPerId);

    wf.initialize().await.expect("initialize");

    let ids: Vec<u64> = wf.state().proposals().iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(wf.state().proposals()[1].vote_percentage.get(), 80);
}

// ---------------------------------------------------------------------------
// 3. Wallet connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_with_handle_triggers_exactly_one_sync() {
    let contract = scenario_contract();
    let wallet = NullWallet::with_accounts(vec![account()]);
    let (mut wf, notifier) = workflow(&contract, Some(wallet.clone()));
    wf.initialize().await.expect("initialize");
    let before = contract.count_calls();

    let connected = wf.connect_wallet().await.expect("connect");

    assert_eq!(connected, account());
    assert_eq!(wf.state().account(), Some(&account()));
    assert_eq!(contract.count_calls(), before + 1);
    assert_eq!(wf.state().sync_cycles(), 2);
    assert_eq!(wallet.requests(), 1);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn connect_without_handle_does_not_sync() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, Some(NullWallet::with_accounts(vec![account()])));

    wf.connect_wallet().await.expect("connect");

    assert_eq!(wf.state().account(), Some(&account()));
    assert!(contract.calls().is_empty());
    assert_eq!(wf.state().sync_cycles(), 0);
}

#[tokio::test]
async fn connect_uses_first_account() {
    let contract = scenario_contract();
    let wallet = NullWallet::with_accounts(vec![other_account(), account()]);
    let (mut wf, _) = workflow(&contract, Some(wallet));

    assert_eq!(wf.connect_wallet().await.unwrap(), other_account());
    assert_eq!(wf.state().account(), Some(&other_account()));
}

#[tokio::test]
async fn connect_without_wallet_shows_notice() {
    let contract = scenario_contract();
    let (mut wf, notifier) = workflow(&contract, None);
    wf.initialize().await.expect("initialize");

    let err = wf.connect_wallet().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderUnavailable(_)));
    assert_eq!(notifier.notices(), vec![WALLET_UNAVAILABLE_NOTICE.to_string()]);
    assert!(wf.state().account().is_none());
    assert_eq!(contract.count_calls(), 1);
    assert!(wf.view().show_connect);
}

#[tokio::test]
async fn rejected_connection_shows_error_message() {
    let contract = scenario_contract();
    let wallet = NullWallet::rejecting("User rejected the request.");
    let (mut wf, notifier) = workflow(&contract, Some(wallet));
    wf.initialize().await.expect("initialize");

    let err = wf.connect_wallet().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderRejected(_)));
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("Failed to connect wallet: "));
    assert!(notices[0].contains("User rejected the request."));
    assert!(wf.state().account().is_none());
    assert_eq!(contract.count_calls(), 1);
}

#[tokio::test]
async fn unreachable_wallet_is_unavailable() {
    let (mut wf, notifier) = workflow(&scenario_contract(), Some(NullWallet::unreachable()));

    let err = wf.connect_wallet().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderUnavailable(_)));
    assert_eq!(notifier.notices().len(), 1);
    assert!(wf.state().account().is_none());
}

#[tokio::test]
async fn empty_account_list_is_rejected() {
    let (mut wf, notifier) = workflow(&scenario_contract(), Some(NullWallet::with_accounts(Vec::new())));

    let err = wf.connect_wallet().await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderRejected(_)));
    assert_eq!(notifier.notices().len(), 1);
    assert!(wf.state().account().is_none());
}

// ---------------------------------------------------------------------------
// 4. Voting
// ---------------------------------------------------------------------------

async fn connected_workflow(contract: &NullContract) -> (Workflow, NullNotifier) {
    let (mut wf, notifier) = workflow(contract, Some(NullWallet::with_accounts(vec![account()])));
    wf.initialize().await.expect("initialize");
    wf.connect_wallet().await.expect("connect");
    (wf, notifier)
}

#[tokio::test]
async fn vote_triggers_exactly_one_sync_and_clears_loading() {
    let contract = scenario_contract().with_proposal("Fund Z", 0, false, 0);
    let (mut wf, _) = connected_workflow(&contract).await;
    let before = contract.count_calls();
    let cycles = wf.state().sync_cycles();

    let outcome = wf.vote_on_proposal(id(3)).await.expect("vote");

    assert!(matches!(outcome, VoteOutcome::Submitted(ref r) if r.success));
    assert_eq!(contract.count_calls(), before + 1);
    assert_eq!(wf.state().sync_cycles(), cycles + 1);
    assert!(!wf.state().loading());
    assert_eq!(wf.state().phase(), Phase::Ready);
    assert_eq!(contract.votes(), vec![(id(3), account())]);
    assert_eq!(wf.state().proposals()[2].vote_count, U256::from(1));
}

#[tokio::test]
async fn vote_without_account_is_skipped() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, None);
    wf.initialize().await.expect("initialize");
    let calls = contract.calls().len();

    assert_eq!(wf.vote_on_proposal(id(1)).await.unwrap(), VoteOutcome::Skipped);
    assert_eq!(contract.calls().len(), calls);
    assert!(!wf.state().loading());
}

#[tokio::test]
async fn vote_without_handle_is_skipped() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, Some(NullWallet::with_accounts(vec![account()])));
    wf.connect_wallet().await.expect("connect");

    assert_eq!(wf.vote_on_proposal(id(1)).await.unwrap(), VoteOutcome::Skipped);
    assert!(contract.calls().is_empty());
}

#[tokio::test]
async fn reverted_vote_does_not_sync() {
    let contract = scenario_contract();
    let (mut wf, notifier) = connected_workflow(&contract).await;
    let before = contract.count_calls();
    contract.revert_votes(Some("already voted"));

    let err = wf.vote_on_proposal(id(1)).await.unwrap_err();

    assert!(matches!(err, WorkflowError::ContractWriteFailure(_)));
    assert_eq!(contract.count_calls(), before);
    assert!(!wf.state().loading());
    assert_eq!(wf.state().proposals()[0].vote_count, U256::from(5));
    // Vote failures are silent beyond the log.
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn declined_vote_is_provider_rejection() {
    let contract = scenario_contract();
    let (mut wf, _) = connected_workflow(&contract).await;
    contract.reject_votes(Some("User denied transaction signature."));

    let err = wf.vote_on_proposal(id(1)).await.unwrap_err();

    assert!(matches!(err, WorkflowError::ProviderRejected(_)));
    assert!(!wf.state().loading());
}

#[tokio::test]
async fn vote_succeeds_even_if_refresh_fails() {
    let contract = scenario_contract();
    let (mut wf, _) = connected_workflow(&contract).await;
    contract.fail_count(true);

    let outcome = wf.vote_on_proposal(id(1)).await.expect("vote");

    assert!(matches!(outcome, VoteOutcome::Submitted(_)));
    assert_eq!(contract.vote_count(1), Some(U256::from(6)));
    // The stale list stays until a sync completes.
    assert_eq!(wf.state().proposals()[0].vote_count, U256::from(5));
    assert!(!wf.state().loading());
}

#[tokio::test]
async fn contract_decides_on_executed_proposals() {
    let contract = scenario_contract();
    let (mut wf, _) = connected_workflow(&contract).await;

    // No local validation: the vote is sent and the contract reverts it.
    let err = wf.vote_on_proposal(id(2)).await.unwrap_err();

    assert!(matches!(err, WorkflowError::ContractWriteFailure(_)));
    assert_eq!(contract.votes(), vec![(id(2), account())]);
}

// ---------------------------------------------------------------------------
// 5. View
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_view_offers_vote_only_on_open_proposal() {
    let contract = scenario_contract();
    let (mut wf, _) = workflow(&contract, Some(NullWallet::with_accounts(vec![account()])));
    wf.initialize().await.expect("initialize");

    let before = wf.view();
    assert!(before.show_connect);
    assert_eq!(before.proposals.len(), 2);
    assert_eq!(before.votable().count(), 0);

    wf.connect_wallet().await.expect("connect");

    let view = wf.view();
    assert!(!view.show_connect);
    assert!(!view.loading);
    assert_eq!(view.proposals.len(), 2);
    assert_eq!(view.proposals[0].description, "Fund X");
    assert_eq!(view.proposals[0].vote_count, U256::from(5));
    assert_eq!(view.proposals[0].vote_percentage.get(), 40);
    assert!(view.proposals[0].can_vote);
    assert_eq!(view.proposals[1].description, "Fund Y");
    assert_eq!(view.proposals[1].vote_count, U256::from(10));
    assert_eq!(view.proposals[1].vote_percentage.get(), 80);
    assert!(!view.proposals[1].can_vote);
}
