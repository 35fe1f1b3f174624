//! Startup rehydration of the liked collection.
//!
//! After a restart only liked IDs are known. The rehydrator fetches the
//! missing records in one all-or-nothing batch and merges them into the
//! store. It is a background reconciliation, never a startup gate: a failure
//! is logged and the hydrated sequence stays as it was.

use dexswipe_core::error::BulkFetchError;
use tokio::task::JoinHandle;

use crate::collection_store::CollectionStore;
use crate::fetch_client::EntityFetchClient;

/// Result of one rehydration pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RehydrationOutcome {
    /// Every liked ID already had a record.
    NothingToDo,
    /// `count` records were added to the hydrated sequence.
    Hydrated { count: usize },
    /// The batch failed; nothing was merged.
    Failed(BulkFetchError),
}

#[derive(Clone)]
pub struct Rehydrator {
    fetch_client: EntityFetchClient,
    store: CollectionStore,
}

impl Rehydrator {
    pub fn new(fetch_client: EntityFetchClient, store: CollectionStore) -> Self {
        Self {
            fetch_client,
            store,
        }
    }

    pub async fn run(&self) -> RehydrationOutcome {
        let missing = self.store.missing_hydration();
        if missing.is_empty() {
            tracing::debug!("[Rehydration] Nothing to rehydrate");
            return RehydrationOutcome::NothingToDo;
        }

        tracing::info!("[Rehydration] Fetching {} liked records", missing.len());
        match self.fetch_client.fetch_many(&missing).await {
            Ok(records) => {
                let count = self.store.merge_hydrated(records);
                tracing::info!("[Rehydration] Hydrated {} liked records", count);
                RehydrationOutcome::Hydrated { count }
            }
            Err(e) => {
                tracing::error!("[Rehydration] Abandoned: {}", e);
                RehydrationOutcome::Failed(e)
            }
        }
    }

    /// Runs in the background. Must be called from within a tokio runtime.
    pub fn spawn(self) -> JoinHandle<RehydrationOutcome> {
        tokio::spawn(async move { self.run().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCatalog, FakePreferencesRepository, pokemon};
    use dexswipe_core::config::AppConfig;
    use dexswipe_core::preferences::{Theme, UserPreferences};

    async fn setup(liked: Vec<u32>) -> (std::sync::Arc<FakeCatalog>, CollectionStore, Rehydrator) {
        let catalog = FakeCatalog::new();
        let client = EntityFetchClient::new(catalog.clone(), &AppConfig::default());
        let repo = FakePreferencesRepository::with(UserPreferences::new(liked, Theme::Light));
        let store = CollectionStore::load(repo, None).await;
        let rehydrator = Rehydrator::new(client, store.clone());
        (catalog, store, rehydrator)
    }

    #[tokio::test]
    async fn test_rehydrates_in_persisted_order() {
        let (_, store, rehydrator) = setup(vec![1, 4, 7]).await;
        assert!(store.liked().is_empty());

        let outcome = rehydrator.run().await;

        assert_eq!(outcome, RehydrationOutcome::Hydrated { count: 3 });
        assert_eq!(store.liked(), vec![pokemon(1), pokemon(4), pokemon(7)]);
    }

    #[tokio::test]
    async fn test_failure_leaves_hydrated_empty() {
        let (catalog, store, rehydrator) = setup(vec![1, 4, 7]).await;
        catalog.fail_id(4);

        let outcome = rehydrator.spawn().await.unwrap();

        match outcome {
            RehydrationOutcome::Failed(e) => assert_eq!(e.first_failure.id, 4),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(store.liked().is_empty());
        assert_eq!(store.liked_ids(), vec![1, 4, 7]);
    }

    #[tokio::test]
    async fn test_empty_collection_makes_no_calls() {
        let (catalog, _, rehydrator) = setup(Vec::new()).await;

        assert_eq!(rehydrator.run().await, RehydrationOutcome::NothingToDo);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_only_missing_records_are_fetched() {
        let (catalog, store, rehydrator) = setup(vec![1, 4]).await;
        store.add_liked(pokemon(9)).await;

        rehydrator.run().await;

        assert_eq!(catalog.calls(), vec![1, 4]);
        assert_eq!(store.liked(), vec![pokemon(1), pokemon(4), pokemon(9)]);
        assert_eq!(rehydrator.run().await, RehydrationOutcome::NothingToDo);
    }
}
