//! The in-memory account state a block executes against.

use std::collections::{BTreeMap, BTreeSet};

use tessera_types::{Address, Motes};

use crate::error::CoreError;

/// A single account record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    balance: Motes,
}

impl Account {
    /// Returns the account's balance.
    pub fn balance(&self) -> Motes {
        self.balance
    }

    /// Credits the account.
    pub fn add_balance(&mut self, amount: Motes) -> Result<(), CoreError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(CoreError::BalanceOverflow)?;
        Ok(())
    }

    /// Debits the account.
    pub fn sub_balance(&mut self, amount: Motes) -> Result<(), CoreError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(CoreError::BalanceUnderflow)?;
        Ok(())
    }
}

/// A contract registered by a deploy transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// Language tag of the source, `js` or `ts`.
    pub source_type: String,
    /// The contract source.
    pub source: String,
    /// Constructor arguments, JSON-encoded.
    pub args: String,
}

/// The account state of one block.
///
/// Cloning yields an independent, fully writable snapshot; replacing one
/// state with another applies the whole diff at once. `BTreeMap`/`BTreeSet`
/// keep iteration order deterministic across nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountState {
    accounts: BTreeMap<Address, Account>,
    contracts: BTreeMap<Address, DeployedContract>,
    candidates: BTreeSet<Address>,
    delegations: BTreeMap<Address, Address>,
}

impl AccountState {
    /// Constructs an empty account state.
    pub fn new() -> AccountState {
        AccountState::default()
    }

    /// Returns the account at `address`, creating an empty one on demand.
    pub fn get_or_create_user_account(&mut self, address: &Address) -> &mut Account {
        self.accounts.entry(*address).or_default()
    }

    /// Returns the account at `address` if one exists.
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Returns the balance at `address`, zero when no account exists.
    pub fn balance_of(&self, address: &Address) -> Motes {
        self.accounts
            .get(address)
            .map(Account::balance)
            .unwrap_or_default()
    }

    /// Registers a deployed contract at `address`.
    pub fn register_contract(&mut self, address: Address, contract: DeployedContract) {
        self.contracts.insert(address, contract);
    }

    /// Returns the contract deployed at `address`, if any.
    pub fn contract(&self, address: &Address) -> Option<&DeployedContract> {
        self.contracts.get(address)
    }

    /// Adds `address` to the candidate set.
    pub fn register_candidate(&mut self, address: Address) {
        self.candidates.insert(address);
    }

    /// Removes `address` from the candidate set.
    pub fn withdraw_candidate(&mut self, address: &Address) {
        self.candidates.remove(address);
    }

    /// Returns `true` if `address` is a registered candidate.
    pub fn is_candidate(&self, address: &Address) -> bool {
        self.candidates.contains(address)
    }

    /// Records `voter`'s delegation, replacing any previous one.
    pub fn delegate(&mut self, voter: Address, delegatee: Address) {
        self.delegations.insert(voter, delegatee);
    }

    /// Removes and returns `voter`'s delegation.
    pub fn undelegate(&mut self, voter: &Address) -> Option<Address> {
        self.delegations.remove(voter)
    }

    /// Returns the delegatee `voter` currently votes through, if any.
    pub fn delegation(&self, voter: &Address) -> Option<Address> {
        self.delegations.get(voter).copied()
    }
}

#[cfg(test)]
mod tests {
    use tessera_types::Digest;

    use super::*;

    fn address(seed: u8) -> Address {
        Address::new_contract(&Digest::hash([seed]))
    }

    #[test]
    fn should_create_empty_account_on_demand() {
        let mut state = AccountState::new();
        let addr = address(1);
        assert!(state.account(&addr).is_none());
        assert!(state.get_or_create_user_account(&addr).balance().is_zero());
        assert!(state.account(&addr).is_some());
    }

    #[test]
    fn should_credit_and_debit_balance() {
        let mut state = AccountState::new();
        let addr = address(2);
        let account = state.get_or_create_user_account(&addr);
        account.add_balance(Motes::from(100u64)).expect("should credit");
        account.sub_balance(Motes::from(40u64)).expect("should debit");
        assert_eq!(account.balance(), Motes::from(60u64));
    }

    #[test]
    fn should_fail_debit_beyond_balance() {
        let mut state = AccountState::new();
        let addr = address(3);
        let account = state.get_or_create_user_account(&addr);
        account.add_balance(Motes::from(10u64)).expect("should credit");
        assert_eq!(
            account.sub_balance(Motes::from(11u64)),
            Err(CoreError::BalanceUnderflow)
        );
        assert_eq!(account.balance(), Motes::from(10u64), "should be unchanged");
    }

    #[test]
    fn should_fail_credit_beyond_range() {
        let mut state = AccountState::new();
        let addr = address(4);
        let account = state.get_or_create_user_account(&addr);
        account
            .add_balance(Motes::new(tessera_types::U128::MAX))
            .expect("should credit");
        assert_eq!(
            account.add_balance(Motes::from(1u64)),
            Err(CoreError::BalanceOverflow)
        );
    }

    #[test]
    fn should_isolate_cloned_state() {
        let mut state = AccountState::new();
        let addr = address(5);
        state
            .get_or_create_user_account(&addr)
            .add_balance(Motes::from(7u64))
            .expect("should credit");

        let mut snapshot = state.clone();
        snapshot
            .get_or_create_user_account(&addr)
            .add_balance(Motes::from(1u64))
            .expect("should credit");
        snapshot.register_candidate(addr);

        assert_eq!(
            state.account(&addr).map(Account::balance),
            Some(Motes::from(7u64)),
            "should not observe snapshot mutation"
        );
        assert!(!state.is_candidate(&addr));
        assert!(snapshot.is_candidate(&addr));
    }

    #[test]
    fn should_track_delegations() {
        let mut state = AccountState::new();
        let voter = address(6);
        let delegatee = address(7);
        state.register_candidate(delegatee);
        assert!(state.is_candidate(&delegatee));

        state.delegate(voter, delegatee);
        assert_eq!(state.delegation(&voter), Some(delegatee));
        assert_eq!(state.undelegate(&voter), Some(delegatee));
        assert_eq!(state.delegation(&voter), None);

        state.withdraw_candidate(&delegatee);
        assert!(!state.is_candidate(&delegatee));
    }
}
