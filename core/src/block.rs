//! The block context a transaction executes against.

use std::collections::BTreeMap;

use tessera_types::{Address, Digest};

use crate::{chainspec::ChainConfig, event::Event, state::AccountState};

/// The execution context of one block: its height, coinbase, account state
/// and the events recorded while applying transactions.
///
/// `Block` is `Clone`; a clone is a full logical copy, so mutations to it are
/// invisible to the original until [`merge`](Block::merge) applies them back.
/// Discarding the clone rolls its effects back. [`begin`](Block::begin) /
/// [`rollback`](Block::rollback) provide an additional nested scope on top of
/// the same snapshot semantics.
#[derive(Clone, Debug)]
pub struct Block {
    height: u64,
    coinbase: Address,
    config: ChainConfig,
    acc_state: AccountState,
    events: BTreeMap<Digest, Vec<Event>>,
    snapshots: Vec<Snapshot>,
}

#[derive(Clone, Debug)]
struct Snapshot {
    acc_state: AccountState,
    events: BTreeMap<Digest, Vec<Event>>,
}

impl Block {
    /// Constructs a block with an empty account state.
    pub fn new(config: ChainConfig, height: u64, coinbase: Address) -> Block {
        Block {
            height,
            coinbase,
            config,
            acc_state: AccountState::new(),
            events: BTreeMap::new(),
            snapshots: Vec::new(),
        }
    }

    /// Returns the block's height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Returns the address credited with transaction fees for this block.
    pub fn coinbase(&self) -> Address {
        self.coinbase
    }

    /// Returns the chain configuration in force for this block.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Returns the block's account state.
    pub fn state(&self) -> &AccountState {
        &self.acc_state
    }

    /// Returns the block's account state, writable.
    pub fn state_mut(&mut self) -> &mut AccountState {
        &mut self.acc_state
    }

    /// Applies the diff carried by `other`, a clone of this block, back onto
    /// this block.
    ///
    /// Under serial per-block execution the clone's state *is* the merged
    /// state, so the whole of it replaces this block's.
    pub fn merge(&mut self, other: Block) {
        self.acc_state = other.acc_state;
        self.events = other.events;
    }

    /// Opens a nested scope; a later [`rollback`](Block::rollback) restores
    /// the state and events as of this call.
    pub fn begin(&mut self) {
        self.snapshots.push(Snapshot {
            acc_state: self.acc_state.clone(),
            events: self.events.clone(),
        });
    }

    /// Discards every mutation made since the matching [`begin`](Block::begin).
    ///
    /// Without an open scope this is a no-op.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshots.pop() {
            self.acc_state = snapshot.acc_state;
            self.events = snapshot.events;
        }
    }

    /// Records an event against the transaction identified by `tx_hash`.
    pub fn record_event(&mut self, tx_hash: Digest, event: Event) {
        self.events.entry(tx_hash).or_default().push(event);
    }

    /// Returns the events recorded for the transaction identified by `tx_hash`.
    pub fn events(&self, tx_hash: &Digest) -> &[Event] {
        self.events
            .get(tx_hash)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use tessera_types::Motes;

    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            chain_id: 100,
            optimize_height: 0,
            transaction_optimize_height: 0,
        }
    }

    fn test_address(seed: u8) -> Address {
        Address::new_contract(&Digest::hash([seed]))
    }

    #[test]
    fn should_isolate_clone_until_merge() {
        let addr = test_address(1);
        let mut block = Block::new(test_config(), 10, test_address(0));

        let mut tx_block = block.clone();
        tx_block
            .state_mut()
            .get_or_create_user_account(&addr)
            .add_balance(Motes::from(42u64))
            .expect("should credit");

        assert!(block.state().account(&addr).is_none(), "should be isolated");

        block.merge(tx_block);
        assert_eq!(
            block
                .state()
                .account(&addr)
                .map(|account| account.balance()),
            Some(Motes::from(42u64)),
            "should observe merged mutation"
        );
    }

    #[test]
    fn should_discard_clone_without_merge() {
        let addr = test_address(2);
        let mut block = Block::new(test_config(), 10, test_address(0));

        {
            let mut tx_block = block.clone();
            tx_block
                .state_mut()
                .get_or_create_user_account(&addr)
                .add_balance(Motes::from(1u64))
                .expect("should credit");
        }

        assert!(block.state().account(&addr).is_none());
    }

    #[test]
    fn should_restore_state_and_events_on_rollback() {
        let addr = test_address(3);
        let tx_hash = Digest::hash(b"tx");
        let mut block = Block::new(test_config(), 10, test_address(0));

        block.begin();
        block
            .state_mut()
            .get_or_create_user_account(&addr)
            .add_balance(Motes::from(5u64))
            .expect("should credit");
        block.record_event(
            tx_hash,
            Event {
                topic: "topic".to_string(),
                data: "{}".to_string(),
            },
        );
        block.rollback();

        assert!(block.state().account(&addr).is_none());
        assert!(block.events(&tx_hash).is_empty());
    }

    #[test]
    fn should_tolerate_rollback_without_begin() {
        let mut block = Block::new(test_config(), 10, test_address(0));
        block.rollback();
        assert!(block.state().account(&test_address(4)).is_none());
    }

    #[test]
    fn should_append_events_in_order() {
        let tx_hash = Digest::hash(b"ordered");
        let mut block = Block::new(test_config(), 10, test_address(0));
        for index in 0..3u8 {
            block.record_event(
                tx_hash,
                Event {
                    topic: format!("topic-{}", index),
                    data: String::new(),
                },
            );
        }
        let topics: Vec<&str> = block
            .events(&tx_hash)
            .iter()
            .map(|event| event.topic.as_str())
            .collect();
        assert_eq!(topics, vec!["topic-0", "topic-1", "topic-2"]);
    }
}
