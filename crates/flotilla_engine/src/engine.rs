//! The transaction coordinator.
//!
//! One writer at a time, any number of readers. The live state is a single
//! atomically swappable pointer to an immutable store, so a reader sees either
//! the state before a commit or the state after it, never a mix.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use flotilla_foundation::{
    EntityRef, Error, InvariantId, Rejection, Result, Violation, ViolationClass,
};
use flotilla_storage::Store;
use tracing::{debug, info, info_span, warn};

use crate::config::EngineConfig;
use crate::history::{CommitLog, CommitRecord, CommitSummary};
use crate::intent::{CommitId, Intent};
use crate::invariant::InvariantChecker;
use crate::query::View;
use crate::seed::Dataset;
use crate::transaction::{Transaction, TransactionState};

/// A committed store together with the commit that produced it.
#[derive(Debug)]
struct Head {
    commit: CommitId,
    store: Arc<Store>,
}

/// State only the writer touches.
#[derive(Debug)]
struct Writer {
    history: CommitLog,
}

/// Validates and atomically applies transactions against the live store.
///
/// # Example
///
/// ```
/// use flotilla_engine::{Engine, EngineConfig, Intent};
/// use flotilla_foundation::{EntityId, Fleet, Planet};
///
/// let engine = Engine::new(EngineConfig::default());
/// let commit = engine
///     .apply([
///         Intent::insert(EntityId(1), Planet::new("Vega")),
///         Intent::insert(EntityId(1), Fleet::new("Home Guard", 4).with_home_planet(EntityId(1))),
///     ])
///     .unwrap();
///
/// assert_eq!(engine.head(), commit);
/// assert_eq!(engine.view().fleets_homed_at(EntityId(1)).len(), 1);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    checker: InvariantChecker,
    live: ArcSwap<Head>,
    writer: Mutex<Writer>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine over an empty store.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::from_store(Store::new(), config)
    }

    /// Creates an engine from a seed dataset.
    ///
    /// Every row is inserted, then the full invariant set is checked once.
    /// Damage is not derived during load; seed ships must already agree with
    /// their reports.
    ///
    /// # Errors
    ///
    /// Returns `CorruptSeed` with every violation found if the seeded state
    /// is invalid, including rows that repeat an id.
    pub fn load(dataset: Dataset, config: EngineConfig) -> Result<Self> {
        let span = info_span!("load", engine = %config.name, rows = dataset.len());
        let _guard = span.enter();

        let mut store = Store::new();
        let mut violations = Vec::new();
        for (id, record) in dataset {
            let target = EntityRef::new(record.kind(), id);
            if store.contains(target.kind, id) {
                violations.push(Violation::new(
                    InvariantId::ReferentialIntegrity,
                    ViolationClass::DuplicateKey,
                    target,
                    "seed row repeats an existing id",
                ));
                continue;
            }
            store.put(id, record);
        }

        let checker = InvariantChecker::new();
        violations.extend(checker.check(&store));
        if !violations.is_empty() {
            warn!(violations = violations.len(), "seed rejected");
            for violation in &violations {
                debug!(%violation, "seed violation");
            }
            return Err(Error::corrupt_seed(violations));
        }

        info!(entities = store.total_len(), "seed loaded");
        Ok(Self::from_store(store, config))
    }

    fn from_store(store: Store, config: EngineConfig) -> Self {
        let store = Arc::new(store);
        let mut history = CommitLog::new(config.history_size);
        history.push(CommitRecord::new(
            CommitId::GENESIS,
            CommitSummary::default(),
            Arc::clone(&store),
        ));
        Self {
            config,
            checker: InvariantChecker::new(),
            live: ArcSwap::from_pointee(Head {
                commit: CommitId::GENESIS,
                store,
            }),
            writer: Mutex::new(Writer { history }),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the checker this engine validates with.
    #[must_use]
    pub fn checker(&self) -> &InvariantChecker {
        &self.checker
    }

    /// Applies a batch of intents as one transaction.
    ///
    /// Intents apply in order to a shadow of the live store. The checker
    /// runs once against the result; the shadow then either replaces the
    /// live store or is dropped. Calls are serialized.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] listing every violation. The live store is
    /// unchanged.
    pub fn apply<I>(&self, intents: I) -> std::result::Result<CommitId, Rejection>
    where
        I: IntoIterator<Item = Intent>,
    {
        // The live store only ever holds validated snapshots, so a panic in
        // another writer leaves nothing to repair.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let head = self.live.load_full();
        let next = head.commit.next();
        let mut txn = Transaction::new(intents.into_iter().collect());

        let span = info_span!(
            "transaction",
            engine = %self.config.name,
            commit = %next,
            intents = txn.len()
        );
        let _guard = span.enter();

        let shadow = match txn.stage(&head.store, self.config.derive_damage) {
            Ok(shadow) => shadow,
            Err(violations) => return Err(Self::reject(&txn, violations)),
        };

        let violations = txn.validate(&self.checker, &head.store, &shadow);
        if !violations.is_empty() {
            return Err(Self::reject(&txn, violations));
        }

        let store = Arc::new(shadow);
        txn.commit(next);
        let summary = txn.summary();
        writer
            .history
            .push(CommitRecord::new(next, summary, Arc::clone(&store)));
        self.live.store(Arc::new(Head {
            commit: next,
            store,
        }));

        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            repaired = summary.repaired,
            "committed"
        );
        Ok(next)
    }

    fn reject(txn: &Transaction, violations: Vec<Violation>) -> Rejection {
        debug_assert_eq!(txn.state(), TransactionState::Rejected);
        warn!(violations = violations.len(), "rejected");
        for violation in &violations {
            debug!(%violation, "violation");
        }
        Rejection::new(violations)
    }

    /// Returns the id of the most recent commit.
    #[must_use]
    pub fn head(&self) -> CommitId {
        self.live.load().commit
    }

    /// Returns the live store.
    ///
    /// The returned snapshot is immutable; later commits do not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Store> {
        Arc::clone(&self.live.load().store)
    }

    /// Returns a read-only view of the live store.
    #[must_use]
    pub fn view(&self) -> View {
        let head = self.live.load();
        View::new(head.commit, Arc::clone(&head.store))
    }

    /// Returns a view of the store as of a retained commit.
    #[must_use]
    pub fn snapshot_at(&self, commit: CommitId) -> Option<View> {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .history
            .get(commit)
            .map(|record| View::new(record.id(), Arc::clone(record.store())))
    }

    /// Returns the retained commits, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<(CommitId, CommitSummary)> {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .history
            .iter()
            .map(|record| (record.id(), *record.summary()))
            .collect()
    }

    /// Re-runs the full invariant set against the live store.
    ///
    /// Always empty for a store the engine committed.
    #[must_use]
    pub fn verify(&self) -> Vec<Violation> {
        self.checker.check(&self.live.load().store)
    }
}
