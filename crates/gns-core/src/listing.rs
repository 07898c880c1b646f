//! Snapshot of every registered domain.

use std::cell::{Cell, RefCell};

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::contract::RegistryContract;
use crate::error::GnsError;
use crate::gateway::ChainGateway;
use crate::models::MintRecord;

/// Result of a [`ListingSynchronizer::refresh`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced; carries the number of records.
    Replaced(usize),
    /// A pass was already running; it will read once more before finishing.
    Coalesced,
}

/// Rebuilds the listing wholesale, one pass at a time.
pub struct ListingSynchronizer<G> {
    contract: RegistryContract<G>,
    snapshot: RefCell<Vec<MintRecord>>,
    generation: Cell<u64>,
    in_flight: Cell<bool>,
    rerun: Cell<bool>,
}

impl<G: ChainGateway> ListingSynchronizer<G> {
    pub fn new(contract: RegistryContract<G>) -> Self {
        Self {
            contract,
            snapshot: RefCell::new(Vec::new()),
            generation: Cell::new(0),
            in_flight: Cell::new(false),
            rerun: Cell::new(false),
        }
    }

    pub fn records(&self) -> Vec<MintRecord> {
        self.snapshot.borrow().clone()
    }

    /// Number of snapshots stored so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.get()
    }

    /// A coalesced request is still waiting for its read.
    pub fn is_stale(&self) -> bool {
        self.rerun.get() && !self.in_flight.get()
    }

    /// Re-read the registry and replace the snapshot.
    ///
    /// At most one pass runs at a time. A call made during a pass marks it
    /// for one more full read instead of starting an overlapping one. On
    /// error the previous snapshot stays in place.
    ///
    /// A coalesced caller returns before the pass ends and never sees its
    /// error. If that pass fails the request stays marked, see
    /// [`is_stale`](Self::is_stale), and the next call serves it.
    pub async fn refresh(&self) -> Result<RefreshOutcome, GnsError> {
        if self.in_flight.replace(true) {
            debug!("refresh already running, coalescing");
            self.rerun.set(true);
            return Ok(RefreshOutcome::Coalesced);
        }

        let result = self.run_passes().await;
        self.in_flight.set(false);
        if result.is_err() && self.rerun.get() {
            warn!("pass failed with a coalesced request pending");
        }
        result
    }

    async fn run_passes(&self) -> Result<RefreshOutcome, GnsError> {
        loop {
            self.rerun.set(false);
            let records = self.fetch().await?;
            let count = records.len();
            self.store(records);
            if !self.rerun.get() {
                return Ok(RefreshOutcome::Replaced(count));
            }
            debug!("refresh requested during pass, reading again");
        }
    }

    async fn fetch(&self) -> Result<Vec<MintRecord>, GnsError> {
        let names = self.contract.all_names().await?;

        let lookups = names.into_iter().enumerate().map(|(index, name)| async move {
            let (record, owner) = futures::try_join!(
                self.contract.record_of(&name),
                self.contract.owner_of(&name)
            )?;
            Ok::<_, GnsError>(MintRecord {
                index,
                name,
                record,
                owner,
            })
        });

        try_join_all(lookups).await
    }

    fn store(&self, records: Vec<MintRecord>) {
        info!(count = records.len(), "listing refreshed");
        *self.snapshot.borrow_mut() = records;
        self.generation.set(self.generation.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use alloy_primitives::address;

    use super::*;
    use crate::error::ProviderError;
    use crate::mock::{GatewayCall, MockGateway};

    const CONTRACT: alloy_primitives::Address = address!("00000000000000000000000000000000000c0de5");

    fn listing(gateway: &MockGateway) -> ListingSynchronizer<MockGateway> {
        ListingSynchronizer::new(RegistryContract::new(Rc::new(gateway.clone()), CONTRACT))
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let gateway = MockGateway::new(address!("00000000000000000000000000000000000a11ce"), 80001);
        let sync = listing(&gateway);

        assert_eq!(sync.refresh().await, Ok(RefreshOutcome::Replaced(0)));
        assert!(sync.records().is_empty());
        assert_eq!(sync.generation(), 1);
    }

    #[tokio::test]
    async fn test_records_follow_enumeration_order() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let bob = address!("0000000000000000000000000000000000000b0b");
        let gateway = MockGateway::new(alice, 80001);
        gateway
            .seed_domain("abc", "first", alice)
            .seed_domain("wxyz", "second", bob);
        let sync = listing(&gateway);

        sync.refresh().await.unwrap();

        assert_eq!(
            sync.records(),
            vec![
                MintRecord {
                    index: 0,
                    name: "abc".into(),
                    record: "first".into(),
                    owner: alice,
                },
                MintRecord {
                    index: 1,
                    name: "wxyz".into(),
                    record: "second".into(),
                    owner: bob,
                },
            ]
        );
        assert_eq!(gateway.count(|c| matches!(c, GatewayCall::Record(_))), 2);
        assert_eq!(gateway.count(|c| matches!(c, GatewayCall::Owner(_))), 2);
    }

    #[tokio::test]
    async fn test_each_pass_replaces_snapshot() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let gateway = MockGateway::new(alice, 80001);
        gateway.seed_domain("abc", "", alice);
        let sync = listing(&gateway);

        sync.refresh().await.unwrap();
        gateway.seed_domain("defg", "", alice);
        sync.refresh().await.unwrap();

        let names: Vec<_> = sync.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["abc", "defg"]);
        assert_eq!(sync.generation(), 2);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_previous_snapshot() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let gateway = MockGateway::new(alice, 80001);
        gateway.seed_domain("abc", "kept", alice);
        let sync = listing(&gateway);
        sync.refresh().await.unwrap();

        gateway.fail_reads(Some(ProviderError::other("rpc down")));
        assert!(sync.refresh().await.is_err());
        assert!(!sync.is_refreshing());
        assert_eq!(sync.records().len(), 1);
        assert_eq!(sync.generation(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_coalesced() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let gateway = MockGateway::new(alice, 80001);
        gateway.seed_domain("abc", "", alice);
        let sync = listing(&gateway);

        let release = gateway.hold_next_read();
        let second = async {
            let outcome = sync.refresh().await;
            release.send(()).unwrap();
            outcome
        };
        let (first, second) = futures::join!(sync.refresh(), second);

        assert_eq!(first, Ok(RefreshOutcome::Replaced(1)));
        assert_eq!(second, Ok(RefreshOutcome::Coalesced));
        assert_eq!(gateway.count(|c| *c == GatewayCall::GetAllNames), 2);
        assert_eq!(sync.generation(), 2);
        assert!(!sync.is_refreshing());
    }

    #[tokio::test]
    async fn test_request_coalesced_into_failed_pass_stays_pending() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let gateway = MockGateway::new(alice, 80001);
        gateway.seed_domain("abc", "", alice);
        let sync = listing(&gateway);

        gateway.fail_reads(Some(ProviderError::other("rpc down")));
        let release = gateway.hold_next_read();
        let second = async {
            let outcome = sync.refresh().await;
            release.send(()).unwrap();
            outcome
        };
        let (first, second) = futures::join!(sync.refresh(), second);

        assert!(first.is_err());
        assert_eq!(second, Ok(RefreshOutcome::Coalesced));
        assert!(sync.is_stale());
        assert_eq!(sync.generation(), 0);

        gateway.fail_reads(None);
        assert_eq!(sync.refresh().await, Ok(RefreshOutcome::Replaced(1)));
        assert!(!sync.is_stale());
        assert_eq!(gateway.count(|c| *c == GatewayCall::GetAllNames), 1);
    }
}
