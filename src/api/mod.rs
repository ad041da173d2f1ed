//! Remote feature store exchange and reconciliation.

pub mod client;
pub mod sync;

pub use client::{FeatureApi, FeatureItem, FeatureToSave, GeomConfig, Notifier};
pub use sync::{reconcile, SyncReport};
