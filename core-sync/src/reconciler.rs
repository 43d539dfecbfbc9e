//! # Reconciler
//!
//! Diffs fetched provider records against persisted media items by
//! `(kind, external_id)` and writes inserts or in-place updates.
//!
//! Items are processed sequentially in provider order. Each write is an
//! independent unit: a failure is logged at `warn`, counted and skipped.

use crate::normalize::ProviderRawItem;
use crate::Result;
use bridge_traits::time::Clock;
use core_library::{MediaItem, MediaKind, MediaRepository};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of reconciling one provider listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    /// Successful writes (inserts plus updates)
    pub items_synced: u64,
    /// Records returned by the provider
    pub total_fetched: u64,
    #[serde(skip)]
    pub items_inserted: u64,
    #[serde(skip)]
    pub items_updated: u64,
    #[serde(skip)]
    pub items_failed: u64,
}

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Inserted,
    Updated,
}

pub struct Reconciler {
    repository: Arc<dyn MediaRepository>,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    pub fn new(repository: Arc<dyn MediaRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Reconcile `items` into the table for `kind`.
    ///
    /// Never fails as a whole; per-item errors only lower `items_synced`.
    #[instrument(skip_all, fields(kind = %kind, fetched = items.len()))]
    pub async fn reconcile(&self, kind: MediaKind, items: Vec<ProviderRawItem>) -> SyncSummary {
        let mut summary = SyncSummary {
            total_fetched: items.len() as u64,
            ..SyncSummary::default()
        };

        for item in &items {
            match self.reconcile_item(kind, item).await {
                Ok(ItemOutcome::Inserted) => summary.items_inserted += 1,
                Ok(ItemOutcome::Updated) => summary.items_updated += 1,
                Err(e) => {
                    warn!(
                        kind = %kind,
                        external_id = item.external_id(),
                        error = %e,
                        "Skipping item that could not be written"
                    );
                    summary.items_failed += 1;
                }
            }
        }

        summary.items_synced = summary.items_inserted + summary.items_updated;

        info!(
            kind = %kind,
            items_synced = summary.items_synced,
            inserted = summary.items_inserted,
            updated = summary.items_updated,
            failed = summary.items_failed,
            "Reconciliation finished"
        );

        summary
    }

    async fn reconcile_item(&self, kind: MediaKind, item: &ProviderRawItem) -> Result<ItemOutcome> {
        if item.media_kind() != kind {
            return Err(crate::SyncError::invalid_input(
                "kind",
                format!("{} record in a {} listing", item.media_kind(), kind),
            ));
        }

        let draft = item.normalize()?;
        let now = self.clock.unix_timestamp();

        match self
            .repository
            .find_by_external_id(kind, &draft.external_id)
            .await?
        {
            Some(mut existing) => {
                existing.apply_draft(draft, now);
                self.repository.update(&existing).await?;
                debug!(external_id = %existing.external_id, "Updated item");
                Ok(ItemOutcome::Updated)
            }
            None => {
                let item = MediaItem::from_draft(draft, now);
                self.repository.insert(&item).await?;
                debug!(external_id = %item.external_id, "Inserted item");
                Ok(ItemOutcome::Inserted)
            }
        }
    }
}
