//! Reconciliation of buffered edits with the remote feature store.

use crate::api::client::{FeatureApi, FeatureToSave, Notifier};
use crate::geometry::wkt::write_wkt;
use crate::geometry::CoordLayout;
use crate::map::feature::FeatureKey;
use crate::map::host::MapHost;
use crate::map::source::SharedSource;
use anyhow::Context;
use log::{debug, error};

/// What a successful reconciliation pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Features created or updated.
    pub patched: usize,
    /// Features removed remotely.
    pub deleted: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.patched == 0 && self.deleted == 0
    }
}

/// The patch/delete sets derived from one layer's buffered features.
///
/// Derived fresh at each reconciliation and never stored; geometry is
/// already serialized to WKT here.
#[derive(Debug, Default)]
struct ChangeSets {
    patch: Vec<FeatureToSave>,
    delete: Vec<FeatureToSave>,
    /// Never-saved features that were soft-deleted anyway; nothing to
    /// tell the store, they are just dropped from the collection.
    orphans: Vec<FeatureKey>,
}

fn classify(source: &SharedSource, resource_id: i64, layout: CoordLayout) -> ChangeSets {
    let mut sets = ChangeSets::default();
    let source = source.borrow();
    for (key, feature) in source.iter() {
        if feature.layer_id != resource_id {
            continue;
        }
        let to_save = || FeatureToSave {
            id: feature.id,
            geom: write_wkt(&feature.geometry, layout),
            fields: feature.attribution.clone().unwrap_or_default(),
        };
        if feature.deleted {
            if feature.id.is_some() {
                sets.delete.push(to_save());
            } else {
                sets.orphans.push(key);
            }
        } else if feature.id.is_none() || feature.is_modified() {
            // New, or modified since it was loaded
            sets.patch.push(to_save());
        }
    }
    sets
}

/// Pushes one resource's buffered edits to the remote store.
///
/// Features tagged with `resource_id` are classified into a patch set
/// (no id yet, or modified since load) and a delete set (soft-deleted
/// with an id); unmodified existing features are left out of both.
/// Empty request sets are skipped. On success the map layer is reloaded
/// and a feature-table refresh is broadcast; on failure the error is
/// logged and propagated with the local buffer left untouched, so a
/// retry is one more `reconcile` call.
pub fn reconcile(
    api: &dyn FeatureApi,
    host: &dyn MapHost,
    notifier: &dyn Notifier,
    resource_id: i64,
    source: &SharedSource,
    layout: CoordLayout,
) -> anyhow::Result<SyncReport> {
    let sets = classify(source, resource_id, layout);
    debug!(
        "resource {}: reconciling {} patched, {} deleted",
        resource_id,
        sets.patch.len(),
        sets.delete.len()
    );

    let result = push(api, resource_id, &sets);
    if let Err(err) = &result {
        error!("resource {}: synchronization failed: {:#}", resource_id, err);
    }
    result?;

    {
        let mut source = source.borrow_mut();
        for key in &sets.orphans {
            source.remove(*key);
        }
    }

    let report = SyncReport {
        patched: sets.patch.len(),
        deleted: sets.delete.len(),
    };
    if !report.is_empty() {
        host.reload_layer(resource_id);
        notifier.feature_table_refresh(resource_id);
    }
    Ok(report)
}

fn push(api: &dyn FeatureApi, resource_id: i64, sets: &ChangeSets) -> anyhow::Result<()> {
    if !sets.patch.is_empty() {
        api.patch_features(resource_id, &sets.patch)
            .with_context(|| format!("patching {} features", sets.patch.len()))?;
    }
    if !sets.delete.is_empty() {
        api.delete_features(resource_id, &sets.delete)
            .with_context(|| format!("deleting {} features", sets.delete.len()))?;
    }
    Ok(())
}
