//! In-memory ledger backend using DashMap.
//!
//! Holds the accounts hosted on this node and the node's vault of
//! unconsumed loan states. Every mutating flow consumes its input and
//! produces outputs under a fresh transaction hash; the consume-and-produce
//! step runs under a single lock so two flows can never spend the same input.

use std::sync::Arc;

use dashmap::DashMap;
use loanbook_core::{
    sha256_hash, AccountId, AccountInfo, LoanBook, PartyName, SecureHash, SigningKey, StateAndRef,
    StateRef,
};
use parking_lot::Mutex;
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

/// Errors a flow can end with.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// No account with this id is hosted on the node.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    /// The input state is not in the vault (never existed or already spent).
    #[error("state {0} is not an unconsumed state in this vault")]
    StateConsumed(StateRef),

    /// A flow argument failed validation.
    #[error("invalid flow argument: {0}")]
    InvalidArgument(String),
}

/// An account plus its activity flag.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: StateAndRef<AccountInfo>,
    pub active: bool,
}

struct Inner {
    host: PartyName,
    accounts: DashMap<AccountId, AccountRecord>,
    vault: DashMap<StateRef, StateAndRef<LoanBook>>,
    /// Serializes consume-and-produce.
    ledger: Mutex<()>,
}

/// Shared node state.
///
/// Cheaply cloneable via `Arc`; all clones share the same ledger.
#[derive(Clone)]
pub struct NodeStore {
    inner: Arc<Inner>,
}

impl NodeStore {
    /// Create an empty node identified by `host`.
    pub fn new(host: PartyName) -> Self {
        Self {
            inner: Arc::new(Inner {
                host,
                accounts: DashMap::new(),
                vault: DashMap::new(),
                ledger: Mutex::new(()),
            }),
        }
    }

    /// Create a node hosting the agent account plus two counterpart accounts,
    /// one of which is inactive.
    pub fn seeded(host: PartyName, agent_account: AccountId) -> Self {
        let store = Self::new(host);
        let regulator = PartyName::new("O=Regulator, L=New York, C=US").ok();
        store.add_account_with_id(agent_account, "agent", true, regulator.into_iter().collect());
        store.add_account("counterparty", true);
        store.add_account("dormant", false);
        store
    }

    /// Identity of this node.
    pub fn host(&self) -> &PartyName {
        &self.inner.host
    }

    /// Create an account with a random id and signing key.
    pub fn add_account(&self, name: &str, active: bool) -> StateAndRef<AccountInfo> {
        self.add_account_with_id(AccountId::new(), name, active, Vec::new())
    }

    /// Create an account with a given id and a random signing key.
    pub fn add_account_with_id(
        &self,
        account_id: AccountId,
        name: &str,
        active: bool,
        carbon_copy_receivers: Vec<PartyName>,
    ) -> StateAndRef<AccountInfo> {
        let info = AccountInfo {
            account_name: name.to_string(),
            account_host: self.inner.host.clone(),
            account_id,
            signing_key: Some(SigningKey::from_public_key_bytes(&random_bytes::<32>())),
            carbon_copy_receivers,
        };
        let txhash = new_tx_hash(&serde_json::to_vec(&info).unwrap_or_default());
        let account = StateAndRef::new(info, StateRef::new(txhash, 0));
        self.inner.accounts.insert(
            account_id,
            AccountRecord {
                account: account.clone(),
                active,
            },
        );
        tracing::info!(%account_id, name, active, "account created");
        account
    }

    /// Number of unconsumed loan states.
    pub fn vault_len(&self) -> usize {
        self.inner.vault.len()
    }

    fn account(&self, id: AccountId) -> Result<AccountRecord, FlowError> {
        self.inner
            .accounts
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(FlowError::UnknownAccount(id))
    }

    // ── Flows ───────────────────────────────────────────────────────

    /// Unconsumed loans held for accounts hosted on this node, in reference
    /// order. The requesting account must be hosted here.
    pub fn loans_owned_by_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<StateAndRef<LoanBook>>, FlowError> {
        self.account(account)?;

        // Held so a listing never observes a transaction half committed.
        let _guard = self.inner.ledger.lock();
        let hosted_keys: Vec<SigningKey> = self
            .inner
            .accounts
            .iter()
            .filter_map(|e| e.value().account.data().signing_key.clone())
            .collect();

        let mut loans: Vec<StateAndRef<LoanBook>> = self
            .inner
            .vault
            .iter()
            .map(|e| e.value().clone())
            .filter(|loan| {
                loan.data()
                    .owning_account
                    .as_ref()
                    .is_some_and(|k| hosted_keys.contains(k))
            })
            .collect();
        loans.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(loans)
    }

    /// Issue a new loan in a transaction with a single output.
    pub fn issue_loan(
        &self,
        value_in_usd: i64,
        owning_account: AccountId,
    ) -> Result<StateAndRef<LoanBook>, FlowError> {
        if value_in_usd <= 0 {
            return Err(FlowError::InvalidArgument(format!(
                "loan value must be positive, got {value_in_usd}"
            )));
        }
        let owner = self.account(owning_account)?;
        let output = LoanBook {
            deal_id: Uuid::new_v4(),
            value_in_usd,
            owning_account: owner.account.data().signing_key.clone(),
        };

        let _guard = self.inner.ledger.lock();
        let mut outputs = self.commit(None, vec![output]);
        let issued = outputs.remove(0);
        tracing::info!(reference = %issued.reference, value_in_usd, "loan issued");
        Ok(issued)
    }

    /// Accounts on this node, optionally including inactive ones.
    pub fn accounts(&self, include_inactive: bool) -> Vec<StateAndRef<AccountInfo>> {
        let _guard = self.inner.ledger.lock();
        let mut accounts: Vec<StateAndRef<AccountInfo>> = self
            .inner
            .accounts
            .iter()
            .filter(|e| include_inactive || e.value().active)
            .map(|e| e.value().account.clone())
            .collect();
        accounts.sort_by(|a, b| a.data().account_name.cmp(&b.data().account_name));
        accounts
    }

    /// Consume `reference` and produce two outputs: `split_value` at index 0
    /// and the remainder at index 1.
    pub fn split_loan(
        &self,
        reference: &StateRef,
        split_value: i64,
    ) -> Result<Vec<StateAndRef<LoanBook>>, FlowError> {
        let _guard = self.inner.ledger.lock();
        let input = self.unconsumed(reference)?;
        let value = input.data().value_in_usd;
        if split_value <= 0 || split_value >= value {
            return Err(FlowError::InvalidArgument(format!(
                "split value must be between 0 and {value} exclusive, got {split_value}"
            )));
        }

        let first = LoanBook {
            value_in_usd: split_value,
            ..input.data().clone()
        };
        let second = LoanBook {
            value_in_usd: value - split_value,
            ..input.data().clone()
        };
        let outputs = self.commit(Some(reference), vec![first, second]);
        tracing::info!(input = %reference, split_value, "loan split");
        Ok(outputs)
    }

    /// Consume `reference` and produce one output owned by `target`.
    pub fn move_loan(
        &self,
        target: AccountId,
        reference: &StateRef,
    ) -> Result<StateAndRef<LoanBook>, FlowError> {
        let target_key = self.account(target)?.account.data().signing_key.clone();

        let _guard = self.inner.ledger.lock();
        let input = self.unconsumed(reference)?;
        let output = LoanBook {
            owning_account: target_key,
            ..input.data().clone()
        };
        let mut outputs = self.commit(Some(reference), vec![output]);
        tracing::info!(input = %reference, %target, "loan moved");
        Ok(outputs.remove(0))
    }

    // ── Ledger primitives (caller holds the ledger lock) ────────────

    fn unconsumed(&self, reference: &StateRef) -> Result<StateAndRef<LoanBook>, FlowError> {
        self.inner
            .vault
            .get(reference)
            .map(|e| e.value().clone())
            .ok_or_else(|| FlowError::StateConsumed(reference.clone()))
    }

    fn commit(&self, input: Option<&StateRef>, outputs: Vec<LoanBook>) -> Vec<StateAndRef<LoanBook>> {
        let content = serde_json::to_vec(&(input, &outputs)).unwrap_or_default();
        let txhash = new_tx_hash(&content);

        if let Some(input) = input {
            self.inner.vault.remove(input);
        }
        outputs
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                let state = StateAndRef::new(data, StateRef::new(txhash.clone(), index as u32));
                self.inner.vault.insert(state.reference.clone(), state.clone());
                state
            })
            .collect()
    }
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// SHA-256 over `content` and a random nonce, so identical content in two
/// transactions still yields distinct hashes.
fn new_tx_hash(content: &[u8]) -> SecureHash {
    let mut salted = content.to_vec();
    salted.extend_from_slice(&random_bytes::<16>());
    sha256_hash(&salted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (NodeStore, AccountId) {
        let agent = AccountId::new();
        let host = PartyName::new("O=Agent Bank, L=London, C=GB").unwrap();
        (NodeStore::seeded(host, agent), agent)
    }

    fn account_named(store: &NodeStore, name: &str) -> StateAndRef<AccountInfo> {
        store
            .accounts(true)
            .into_iter()
            .find(|a| a.data().account_name == name)
            .unwrap()
    }

    #[test]
    fn seeded_node_has_one_inactive_account() {
        let (store, _) = store();
        assert_eq!(store.accounts(true).len(), 3);
        assert_eq!(store.accounts(false).len(), 2);
        assert!(store
            .accounts(false)
            .iter()
            .all(|a| a.data().account_name != "dormant"));
    }

    #[test]
    fn issue_produces_single_output_at_index_zero() {
        let (store, agent) = store();
        let loan = store.issue_loan(10_000_000, agent).unwrap();
        assert_eq!(loan.reference.index, 0);
        assert_eq!(loan.data().value_in_usd, 10_000_000);
        assert_eq!(
            loan.data().owning_account,
            account_named(&store, "agent").data().signing_key
        );
        assert_eq!(store.loans_owned_by_account(agent).unwrap(), vec![loan]);
    }

    #[test]
    fn issue_rejects_non_positive_value_and_unknown_account() {
        let (store, agent) = store();
        assert!(matches!(
            store.issue_loan(0, agent),
            Err(FlowError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.issue_loan(5, AccountId::new()),
            Err(FlowError::UnknownAccount(_))
        ));
    }

    #[test]
    fn split_consumes_input_and_produces_two_outputs() {
        let (store, agent) = store();
        let loan = store.issue_loan(101, agent).unwrap();
        let outputs = store.split_loan(&loan.reference, 50).unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].data().value_in_usd, 50);
        assert_eq!(outputs[1].data().value_in_usd, 51);
        assert_eq!(outputs[0].reference.txhash, outputs[1].reference.txhash);
        assert_ne!(outputs[0].reference.txhash, loan.reference.txhash);
        assert!(outputs.iter().all(|o| o.data().deal_id == loan.data().deal_id));

        let after = store.loans_owned_by_account(agent).unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.iter().all(|l| l.reference != loan.reference));
    }

    #[test]
    fn spent_input_cannot_be_split_again() {
        let (store, agent) = store();
        let loan = store.issue_loan(100, agent).unwrap();
        store.split_loan(&loan.reference, 50).unwrap();
        assert!(matches!(
            store.split_loan(&loan.reference, 50),
            Err(FlowError::StateConsumed(_))
        ));
    }

    #[test]
    fn split_value_must_leave_both_outputs_positive() {
        let (store, agent) = store();
        let loan = store.issue_loan(100, agent).unwrap();
        assert!(store.split_loan(&loan.reference, 0).is_err());
        assert!(store.split_loan(&loan.reference, 100).is_err());
        assert_eq!(store.vault_len(), 1);
    }

    #[test]
    fn move_reassigns_owner_and_stays_in_vault_view() {
        let (store, agent) = store();
        let counterparty = account_named(&store, "counterparty");
        let loan = store.issue_loan(100, agent).unwrap();

        let moved = store
            .move_loan(counterparty.data().account_id, &loan.reference)
            .unwrap();
        assert_eq!(moved.data().owning_account, counterparty.data().signing_key);
        assert_eq!(moved.data().deal_id, loan.data().deal_id);

        let visible = store.loans_owned_by_account(agent).unwrap();
        assert_eq!(visible, vec![moved]);
    }

    #[test]
    fn move_to_unknown_account_leaves_input_unspent() {
        let (store, agent) = store();
        let loan = store.issue_loan(100, agent).unwrap();
        assert!(matches!(
            store.move_loan(AccountId::new(), &loan.reference),
            Err(FlowError::UnknownAccount(_))
        ));
        assert_eq!(store.loans_owned_by_account(agent).unwrap(), vec![loan]);
    }

    #[test]
    fn loans_for_unknown_account_is_an_error() {
        let (store, _) = store();
        assert!(matches!(
            store.loans_owned_by_account(AccountId::new()),
            Err(FlowError::UnknownAccount(_))
        ));
    }

    #[test]
    fn listing_during_splits_always_sees_whole_transactions() {
        let (store, agent) = store();
        const TOTAL: i64 = 1 << 20;
        store.issue_loan(TOTAL, agent).unwrap();

        let splitter = {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let loans = store.loans_owned_by_account(agent).unwrap();
                    let Some(largest) = loans.iter().max_by_key(|l| l.data().value_in_usd) else {
                        break;
                    };
                    let value = largest.data().value_in_usd;
                    if value < 2 {
                        break;
                    }
                    store.split_loan(&largest.reference, value / 2).unwrap();
                }
            })
        };

        while !splitter.is_finished() {
            let listed: i64 = store
                .loans_owned_by_account(agent)
                .unwrap()
                .iter()
                .map(|l| l.data().value_in_usd)
                .sum();
            assert_eq!(listed, TOTAL);
        }
        splitter.join().unwrap();
        assert_eq!(store.vault_len(), 201);
    }

    #[test]
    fn concurrent_spends_of_one_input_succeed_once() {
        let (store, agent) = store();
        let loan = store.issue_loan(100, agent).unwrap();

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let reference = loan.reference.clone();
                std::thread::spawn(move || store.split_loan(&reference, 10).is_ok())
            })
            .collect();
        let successes = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.vault_len(), 2);
    }
}
