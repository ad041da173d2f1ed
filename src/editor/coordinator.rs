//! Tracks the editable-resource set and the sessions serving it.

use crate::api::client::{FeatureApi, Notifier};
use crate::api::sync::{reconcile, SyncReport};
use crate::config::EditorConfig;
use crate::editor::context::{DialogHost, MessageSink, StopDecision};
use crate::editor::session::EditSession;
use crate::map::host::MapHost;
use crate::map::source::{new_shared_source, SharedSource};
use anyhow::Context;
use indexmap::IndexMap;
use log::{debug, error};
use std::rc::Rc;

/// Owns every live [`EditSession`] and reacts to editable-set changes.
///
/// The layer tree reports which resources are marked editable; the
/// coordinator diffs that set against its session table, creates a
/// session per newly editable resource (metadata and feature load must
/// both succeed or nothing is mounted), and runs the stop-editing
/// confirmation before a dirty session is dropped. At most one session
/// is enabled at a time — the map-selected resource — while the rest
/// stay inert with their undo stacks and buffered features intact.
pub struct SessionCoordinator {
    api: Rc<dyn FeatureApi>,
    host: Rc<dyn MapHost>,
    dialogs: Rc<dyn DialogHost>,
    messages: Rc<dyn MessageSink>,
    notifier: Rc<dyn Notifier>,
    config: EditorConfig,
    /// One physical collection for all sessions when configured; the
    /// host engine glitches when interactions are re-bound across
    /// collections mid-edit.
    shared_source: Option<SharedSource>,
    sessions: IndexMap<i64, Rc<EditSession>>,
    selected: Option<i64>,
}

impl SessionCoordinator {
    pub fn new(
        api: Rc<dyn FeatureApi>,
        host: Rc<dyn MapHost>,
        dialogs: Rc<dyn DialogHost>,
        messages: Rc<dyn MessageSink>,
        notifier: Rc<dyn Notifier>,
        config: EditorConfig,
    ) -> Self {
        let shared_source = config.shared_collection.then(new_shared_source);
        Self {
            api,
            host,
            dialogs,
            messages,
            notifier,
            config,
            shared_source,
            sessions: IndexMap::new(),
            selected: None,
        }
    }

    pub fn session(&self, resource_id: i64) -> Option<Rc<EditSession>> {
        self.sessions.get(&resource_id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// Applies a new editable set.
    ///
    /// Returns the effective set after the change: a resource whose
    /// session creation failed is absent, and a dirty resource whose
    /// stop the user declined ("continue editing") is retained. Callers
    /// mirror the returned set back into the layer tree.
    pub fn update_editable(&mut self, editable: &[i64]) -> Vec<i64> {
        let added: Vec<i64> = editable
            .iter()
            .copied()
            .filter(|id| !self.sessions.contains_key(id))
            .collect();
        let removed: Vec<i64> = self
            .sessions
            .keys()
            .copied()
            .filter(|id| !editable.contains(id))
            .collect();

        for resource_id in added {
            match self.create_session(resource_id) {
                Ok(session) => {
                    self.sessions.insert(resource_id, Rc::new(session));
                }
                Err(err) => {
                    error!("resource {} cannot be edited: {:#}", resource_id, err);
                    self.messages
                        .error(&format!("Cannot edit this layer: {:#}", err));
                }
            }
        }

        if !removed.is_empty() {
            self.stop_sessions(&removed);
        }

        if let Some(selected) = self.selected {
            if !self.sessions.contains_key(&selected) {
                self.selected = None;
            }
        }

        self.sessions.keys().copied().collect()
    }

    // A session mounts only once both the metadata and the feature load
    // succeed; a failure on either path leaves nothing on the map.
    fn create_session(&self, resource_id: i64) -> anyhow::Result<EditSession> {
        let session = EditSession::create(
            resource_id,
            self.api.clone(),
            self.host.clone(),
            self.dialogs.clone(),
            self.messages.clone(),
            self.config.clone(),
            self.shared_source.clone(),
        )?;

        let ticket = session.begin_feature_load();
        let result = self.api.fetch_features(resource_id);
        if let Err(err) = session
            .complete_feature_load(ticket, result)
            .with_context(|| format!("loading features for resource {}", resource_id))
        {
            session.teardown();
            return Err(err);
        }
        Ok(session)
    }

    /// Stops the given sessions, with the save/discard/continue
    /// confirmation when any of them is dirty.
    fn stop_sessions(&mut self, resource_ids: &[i64]) {
        let dirty: Vec<i64> = resource_ids
            .iter()
            .copied()
            .filter(|id| self.sessions.get(id).map(|s| s.dirty()).unwrap_or(false))
            .collect();

        let decision = if dirty.is_empty() {
            StopDecision::Discard
        } else {
            self.dialogs.confirm_stop(&dirty)
        };

        match decision {
            StopDecision::Continue => {
                // Dirty sessions stay editable; clean ones still go.
                for id in resource_ids {
                    if !dirty.contains(id) {
                        self.drop_session(*id);
                    }
                }
            }
            StopDecision::Save => {
                for id in &dirty {
                    if let Err(err) = self.save(*id) {
                        // Known gap carried over from the original flow:
                        // the session is dropped even when the save
                        // fails, so these edits are lost.
                        error!("save on stop failed for resource {}: {:#}", id, err);
                        self.messages
                            .error(&format!("Saving layer {} failed: {:#}", id, err));
                    }
                }
                for id in resource_ids {
                    self.drop_session(*id);
                }
            }
            StopDecision::Discard => {
                for id in resource_ids {
                    self.drop_session(*id);
                }
            }
        }
    }

    fn drop_session(&mut self, resource_id: i64) {
        if let Some(session) = self.sessions.shift_remove(&resource_id) {
            debug!("tearing down session for resource {}", resource_id);
            session.teardown();
        }
    }

    /// Selects which resource's session is live. Every other session is
    /// disabled but kept.
    pub fn set_selected(&mut self, resource_id: Option<i64>) {
        if self.selected == resource_id {
            return;
        }
        if let Some(previous) = self.selected.and_then(|id| self.sessions.get(&id)) {
            previous.set_enabled(false);
        }
        self.selected = resource_id.filter(|id| self.sessions.contains_key(id));
        if let Some(current) = self.selected.and_then(|id| self.sessions.get(&id)) {
            current.set_enabled(true);
        }
    }

    /// Reconciles one session's buffered edits with the remote store.
    pub fn save(&self, resource_id: i64) -> anyhow::Result<SyncReport> {
        let session = self
            .sessions
            .get(&resource_id)
            .with_context(|| format!("no edit session for resource {}", resource_id))?;
        reconcile(
            self.api.as_ref(),
            self.host.as_ref(),
            self.notifier.as_ref(),
            resource_id,
            session.source(),
            session.geom().layout,
        )
    }

    /// Unmount: tears down every session regardless of dirtiness. The
    /// embedding application calls this when the editor UI goes away.
    pub fn teardown_all(&mut self) {
        let ids: Vec<i64> = self.sessions.keys().copied().collect();
        for id in ids {
            self.drop_session(id);
        }
        self.selected = None;
    }
}
