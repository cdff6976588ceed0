//! Link entry registry persisted as a single store document.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::UsageStore;
use crate::domain::clock::Clock;
use crate::domain::entities::{LinkEntry, LinkEntryPatch, NewLinkEntry, SeedLink};
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::id_generator::generate_id;

/// Store key of the link collection document.
pub const LINKS_KEY: &str = "config";

/// Owns the ordered collection of link entries.
///
/// The collection is one JSON array under [`LINKS_KEY`]. Every mutation
/// rewrites the whole array, so concurrent admin edits resolve as last writer
/// wins. Reads degrade to an empty list when the store is down; mutations
/// propagate store failures.
pub struct LinkRegistry {
    store: Arc<dyn KeyValueStore>,
    usage: Arc<UsageStore>,
    clock: Arc<dyn Clock>,
    seed_links: Vec<SeedLink>,
}

impl LinkRegistry {
    /// Creates a registry.
    ///
    /// `seed_links` are persisted the first time the collection is read and
    /// found absent.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        usage: Arc<UsageStore>,
        clock: Arc<dyn Clock>,
        seed_links: Vec<SeedLink>,
    ) -> Self {
        Self {
            store,
            usage,
            clock,
            seed_links,
        }
    }

    /// Loads the collection, seeding it if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the store cannot be read.
    /// Returns [`AppError::Internal`] if the stored document is not a valid
    /// link collection.
    pub async fn try_list(&self) -> Result<Vec<LinkEntry>, AppError> {
        let Some(raw) = self.store.get(LINKS_KEY).await? else {
            return Ok(self.seed().await);
        };

        serde_json::from_str(&raw).map_err(|e| {
            AppError::internal(
                "Stored link collection is corrupt",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    /// All entries in insertion order; empty if the store cannot be read.
    pub async fn list(&self) -> Vec<LinkEntry> {
        match self.try_list().await {
            Ok(links) => links,
            Err(e) => {
                warn!(error = %e, "Failed to load link collection, treating as empty");
                Vec::new()
            }
        }
    }

    /// Looks up an entry by id.
    pub async fn find(&self, id: &str) -> Option<LinkEntry> {
        self.list().await.into_iter().find(|link| link.id == id)
    }

    /// Entries that are enabled and below their daily quota.
    ///
    /// Quota checks read today's usage counters; if those cannot be read the
    /// counts are treated as zero and quota-limited entries stay available.
    pub async fn available_now(&self) -> Vec<LinkEntry> {
        let links = self.list().await;
        if links.is_empty() {
            return links;
        }

        let counts = self.usage.get_counts().await;

        links
            .into_iter()
            .filter(|link| link.enabled && !link.is_quota_exhausted(counts.today_for(&link.id)))
            .collect()
    }

    /// Validates and appends a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if the target is blank or the weight
    /// or quota is zero.
    /// Returns [`AppError::StoreUnavailable`] if the collection cannot be
    /// read or written.
    pub async fn add(&self, new_link: NewLinkEntry) -> Result<LinkEntry, AppError> {
        validate_target(&new_link.target)?;
        if let Some(weight) = new_link.weight {
            validate_weight(weight)?;
        }
        if let Some(quota) = new_link.max_daily_quota {
            validate_quota(quota)?;
        }

        let mut links = self.try_list().await?;
        let id = unique_id(&links)?;
        let link = new_link.into_entry(id, self.clock.now());

        links.push(link.clone());
        self.save(&links).await?;

        info!(link_id = %link.id, target = %link.target, "Link added");
        Ok(link)
    }

    /// Merges `patch` into the entry identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entry has this id.
    /// Returns [`AppError::InvalidInput`] if the patch sets a blank target or a
    /// zero weight or quota.
    /// Returns [`AppError::StoreUnavailable`] if the collection cannot be
    /// read or written.
    pub async fn update(&self, id: &str, patch: LinkEntryPatch) -> Result<LinkEntry, AppError> {
        if let Some(target) = &patch.target {
            validate_target(target)?;
        }
        if let Some(weight) = patch.weight {
            validate_weight(weight)?;
        }
        if let Some(Some(quota)) = patch.max_daily_quota {
            validate_quota(quota)?;
        }

        let mut links = self.try_list().await?;
        let link = links
            .iter_mut()
            .find(|link| link.id == id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        patch.apply(link, self.clock.now());
        let updated = link.clone();

        self.save(&links).await?;

        info!(link_id = id, "Link updated");
        Ok(updated)
    }

    /// Removes the entry identified by `id`.
    ///
    /// Usage counters for the id are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no entry has this id, including when
    /// it was already deleted.
    /// Returns [`AppError::StoreUnavailable`] if the collection cannot be
    /// read or written.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut links = self.try_list().await?;
        let before = links.len();
        links.retain(|link| link.id != id);

        if links.len() == before {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        self.save(&links).await?;

        info!(link_id = id, "Link deleted");
        Ok(())
    }

    async fn save(&self, links: &[LinkEntry]) -> Result<(), AppError> {
        let raw = serde_json::to_string(links).map_err(|e| {
            AppError::internal(
                "Failed to serialize link collection",
                json!({ "reason": e.to_string() }),
            )
        })?;
        self.store.put(LINKS_KEY, &raw).await?;
        Ok(())
    }

    /// Materializes the configured seed links and persists them best effort.
    async fn seed(&self) -> Vec<LinkEntry> {
        if self.seed_links.is_empty() {
            return Vec::new();
        }

        let now = self.clock.now();
        let links: Vec<LinkEntry> = self
            .seed_links
            .iter()
            .map(|seed| seed.link.clone().into_entry(seed.id.clone(), now))
            .collect();

        match self.save(&links).await {
            Ok(()) => info!(count = links.len(), "Seeded link collection"),
            Err(e) => warn!(error = %e, "Failed to persist seed links"),
        }

        links
    }
}

fn validate_target(target: &str) -> Result<(), AppError> {
    if target.trim().is_empty() {
        return Err(AppError::invalid_input(
            "Target must not be empty",
            json!({ "field": "target" }),
        ));
    }
    Ok(())
}

fn validate_weight(weight: u32) -> Result<(), AppError> {
    if weight == 0 {
        return Err(AppError::invalid_input(
            "Weight must be at least 1",
            json!({ "field": "weight", "value": weight }),
        ));
    }
    Ok(())
}

fn validate_quota(quota: u32) -> Result<(), AppError> {
    if quota == 0 {
        return Err(AppError::invalid_input(
            "Daily quota must be a positive integer",
            json!({ "field": "maxDailyQuota", "value": quota }),
        ));
    }
    Ok(())
}

/// Generates an id not used by any current entry.
fn unique_id(links: &[LinkEntry]) -> Result<String, AppError> {
    const MAX_ATTEMPTS: usize = 10;

    let taken: HashSet<&str> = links.iter().map(|link| link.id.as_str()).collect();

    for _ in 0..MAX_ATTEMPTS {
        let id = generate_id()?;
        if !taken.contains(id.as_str()) {
            return Ok(id);
        }
        debug!(id = %id, "Generated id collided, retrying");
    }

    Err(AppError::internal(
        "Failed to generate unique id",
        json!({ "reason": "Too many collisions" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::usage_store::USAGE_STATS_KEY;
    use crate::domain::clock::FixedClock;
    use crate::domain::repositories::{MockKeyValueStore, StoreError};
    use crate::infrastructure::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
        ))
    }

    fn registry_with(store: Arc<dyn KeyValueStore>, seeds: Vec<SeedLink>) -> LinkRegistry {
        let clock = clock();
        let usage = Arc::new(UsageStore::new(store.clone(), clock.clone()));
        LinkRegistry::new(store, usage, clock, seeds)
    }

    fn registry() -> (LinkRegistry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (registry_with(store.clone(), Vec::new()), store)
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_defaults() {
        let (registry, _) = registry();

        let link = registry
            .add(NewLinkEntry::new("  https://wa.me/1  "))
            .await
            .unwrap();

        assert_eq!(link.id.len(), 12);
        assert_eq!(link.target, "https://wa.me/1");
        assert_eq!(link.weight, 1);
        assert!(link.enabled);
        assert_eq!(registry.list().await, vec![link]);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let (registry, _) = registry();

        let blank = registry.add(NewLinkEntry::new("   ")).await;
        assert!(matches!(blank, Err(AppError::InvalidInput { .. })));

        let zero_weight = registry
            .add(NewLinkEntry::new("https://wa.me/1").with_weight(0))
            .await;
        assert!(matches!(zero_weight, Err(AppError::InvalidInput { .. })));

        let zero_quota = registry
            .add(NewLinkEntry::new("https://wa.me/1").with_quota(0))
            .await;
        assert!(matches!(zero_quota, Err(AppError::InvalidInput { .. })));

        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (registry, _) = registry();

        let first = registry.add(NewLinkEntry::new("https://wa.me/1")).await.unwrap();
        let second = registry.add(NewLinkEntry::new("https://wa.me/2")).await.unwrap();
        let third = registry.add(NewLinkEntry::new("https://wa.me/3")).await.unwrap();

        let ids: Vec<_> = registry.list().await.into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_keeps_id() {
        let (registry, _) = registry();
        let link = registry
            .add(NewLinkEntry::new("https://wa.me/1").with_label("Support"))
            .await
            .unwrap();

        let updated = registry
            .update(
                &link.id,
                LinkEntryPatch {
                    weight: Some(4),
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, link.id);
        assert_eq!(updated.weight, 4);
        assert!(!updated.enabled);
        assert_eq!(updated.label.as_deref(), Some("Support"));
        assert_eq!(registry.list().await, vec![updated]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (registry, _) = registry();

        let result = registry.update("nope", LinkEntryPatch::default()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_zero_weight() {
        let (registry, _) = registry();
        let link = registry.add(NewLinkEntry::new("https://wa.me/1")).await.unwrap();

        let result = registry
            .update(
                &link.id,
                LinkEntryPatch {
                    weight: Some(0),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_delete_then_update_and_delete_are_not_found() {
        let (registry, _) = registry();
        let link = registry.add(NewLinkEntry::new("https://wa.me/1")).await.unwrap();

        registry.delete(&link.id).await.unwrap();

        assert!(registry.list().await.is_empty());
        assert!(matches!(
            registry.update(&link.id, LinkEntryPatch::default()).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            registry.delete(&link.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_available_now_filters_disabled_and_exhausted() {
        let (registry, store) = registry();
        let open = registry.add(NewLinkEntry::new("https://wa.me/1")).await.unwrap();
        let capped = registry
            .add(NewLinkEntry::new("https://wa.me/2").with_quota(2))
            .await
            .unwrap();
        registry
            .add(NewLinkEntry::new("https://wa.me/3").disabled())
            .await
            .unwrap();
        let under_cap = registry
            .add(NewLinkEntry::new("https://wa.me/4").with_quota(3))
            .await
            .unwrap();

        let stats = json!({
            "total": { capped.id.clone(): 9, under_cap.id.clone(): 2 },
            "daily": {
                "2026-02-10": { capped.id.clone(): 2, under_cap.id.clone(): 2 },
                "2026-02-09": { under_cap.id.clone(): 5 }
            }
        });
        store
            .put(USAGE_STATS_KEY, &stats.to_string())
            .await
            .unwrap();

        let ids: Vec<_> = registry
            .available_now()
            .await
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![open.id, under_cap.id]);
    }

    #[tokio::test]
    async fn test_seed_links_persisted_on_first_read() {
        let store = Arc::new(MemoryStore::new());
        let seeds = vec![SeedLink {
            id: "1".to_string(),
            link: NewLinkEntry::new("https://wa.me/8613800138001").with_weight(3),
        }];
        let registry = registry_with(store.clone(), seeds);

        let links = registry.list().await;

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "1");
        assert_eq!(links[0].weight, 3);
        assert!(store.get(LINKS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_seed_write_failure_still_serves_seeds() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store.expect_get().returning(|_| Ok(None));
        mock_store
            .expect_put()
            .returning(|_, _| Err(StoreError::Unavailable("read-only".to_string())));
        let seeds = vec![SeedLink {
            id: "1".to_string(),
            link: NewLinkEntry::new("https://wa.me/8613800138001"),
        }];
        let registry = registry_with(Arc::new(mock_store), seeds);

        let available = registry.available_now().await;

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "1");
    }

    #[tokio::test]
    async fn test_reads_degrade_but_mutations_propagate_store_failure() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        mock_store.expect_put().times(0);
        let registry = registry_with(Arc::new(mock_store), Vec::new());

        assert!(registry.list().await.is_empty());
        assert!(registry.available_now().await.is_empty());

        let result = registry.add(NewLinkEntry::new("https://wa.me/1")).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_on_add() {
        let mut mock_store = MockKeyValueStore::new();
        mock_store.expect_get().returning(|_| Ok(Some("[]".to_string())));
        mock_store
            .expect_put()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("read-only".to_string())));
        let registry = registry_with(Arc::new(mock_store), Vec::new());

        let result = registry.add(NewLinkEntry::new("https://wa.me/1")).await;

        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }
}
