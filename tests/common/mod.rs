//! Shared mock collaborators for the integration tests.

#![allow(dead_code)]

use mapquill::api::client::{FeatureApi, FeatureItem, FeatureToSave, GeomConfig, Notifier};
use mapquill::config::EditorConfig;
use mapquill::editor::context::{DialogHost, FormOutcome, MessageSink, StopDecision};
use mapquill::editor::session::EditSession;
use mapquill::editor::SessionCoordinator;
use mapquill::geometry::Coord;
use mapquill::map::feature::AttrMap;
use mapquill::map::host::MapHost;
use mapquill::map::layer::SharedLayer;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Identity-transform map host that records layer traffic.
#[derive(Default)]
pub struct TestHost {
    pub added: RefCell<Vec<i64>>,
    pub removed: RefCell<Vec<i64>>,
    pub reloaded: RefCell<Vec<i64>>,
}

impl MapHost for TestHost {
    fn add_layer(&self, layer: &SharedLayer) {
        self.added.borrow_mut().push(layer.borrow().resource_id());
    }

    fn remove_layer(&self, resource_id: i64) {
        self.removed.borrow_mut().push(resource_id);
    }

    fn reload_layer(&self, resource_id: i64) {
        self.reloaded.borrow_mut().push(resource_id);
    }

    fn coord_to_pixel(&self, coord: &Coord) -> (f64, f64) {
        (coord.x, coord.y)
    }

    fn pixel_to_coord(&self, pixel: (f64, f64)) -> Coord {
        Coord::xy(pixel.0, pixel.1)
    }
}

/// In-memory feature store with scriptable failures.
#[derive(Default)]
pub struct TestApi {
    /// Geometry-type string per resource; missing means "not a feature
    /// layer" and metadata loads fail.
    pub metadata: RefCell<HashMap<i64, String>>,
    pub features: RefCell<HashMap<i64, Vec<FeatureItem>>>,
    pub items: RefCell<HashMap<(i64, i64), AttrMap>>,
    pub patches: RefCell<Vec<(i64, Vec<FeatureToSave>)>>,
    pub deletes: RefCell<Vec<(i64, Vec<FeatureToSave>)>>,
    pub fail_patch: Cell<bool>,
    pub fail_delete: Cell<bool>,
    pub fail_fetch: Cell<bool>,
    pub fail_item: Cell<bool>,
}

impl TestApi {
    pub fn with_layer(resource_id: i64, geometry_type: &str) -> Self {
        let api = Self::default();
        api.metadata
            .borrow_mut()
            .insert(resource_id, geometry_type.to_string());
        api
    }

    pub fn add_feature(&self, resource_id: i64, id: i64, geom: &str) {
        self.features
            .borrow_mut()
            .entry(resource_id)
            .or_default()
            .push(FeatureItem {
                id,
                geom: geom.to_string(),
            });
    }
}

impl FeatureApi for TestApi {
    fn layer_metadata(&self, resource_id: i64) -> anyhow::Result<GeomConfig> {
        let metadata = self.metadata.borrow();
        let type_string = metadata
            .get(&resource_id)
            .ok_or_else(|| anyhow::anyhow!("resource {} is not a feature layer", resource_id))?;
        GeomConfig::parse(type_string)
            .ok_or_else(|| anyhow::anyhow!("unknown geometry type {}", type_string))
    }

    fn fetch_features(&self, resource_id: i64) -> anyhow::Result<Vec<FeatureItem>> {
        if self.fail_fetch.get() {
            anyhow::bail!("feature listing unavailable");
        }
        Ok(self
            .features
            .borrow()
            .get(&resource_id)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_item(&self, resource_id: i64, feature_id: i64) -> anyhow::Result<AttrMap> {
        if self.fail_item.get() {
            anyhow::bail!("feature item unavailable");
        }
        Ok(self
            .items
            .borrow()
            .get(&(resource_id, feature_id))
            .cloned()
            .unwrap_or_default())
    }

    fn patch_features(&self, resource_id: i64, features: &[FeatureToSave]) -> anyhow::Result<()> {
        if self.fail_patch.get() {
            anyhow::bail!("patch rejected");
        }
        self.patches
            .borrow_mut()
            .push((resource_id, features.to_vec()));
        Ok(())
    }

    fn delete_features(&self, resource_id: i64, features: &[FeatureToSave]) -> anyhow::Result<()> {
        if self.fail_delete.get() {
            anyhow::bail!("delete rejected");
        }
        self.deletes
            .borrow_mut()
            .push((resource_id, features.to_vec()));
        Ok(())
    }
}

/// Scripted dialog host.
pub struct TestDialogs {
    pub form_outcome: RefCell<FormOutcome>,
    pub form_calls: RefCell<Vec<(i64, Option<AttrMap>)>>,
    pub stop_decision: Cell<StopDecision>,
    pub stop_calls: RefCell<Vec<Vec<i64>>>,
}

impl Default for TestDialogs {
    fn default() -> Self {
        Self {
            form_outcome: RefCell::new(FormOutcome::Unavailable),
            form_calls: RefCell::new(Vec::new()),
            stop_decision: Cell::new(StopDecision::Discard),
            stop_calls: RefCell::new(Vec::new()),
        }
    }
}

impl TestDialogs {
    pub fn submitting(fields: AttrMap) -> Self {
        let dialogs = Self::default();
        *dialogs.form_outcome.borrow_mut() = FormOutcome::Submitted(fields);
        dialogs
    }

    pub fn cancelling() -> Self {
        let dialogs = Self::default();
        *dialogs.form_outcome.borrow_mut() = FormOutcome::Cancelled;
        dialogs
    }
}

impl DialogHost for TestDialogs {
    fn feature_form(&self, layer_id: i64, prefill: Option<&AttrMap>) -> FormOutcome {
        self.form_calls
            .borrow_mut()
            .push((layer_id, prefill.cloned()));
        self.form_outcome.borrow().clone()
    }

    fn confirm_stop(&self, resource_ids: &[i64]) -> StopDecision {
        self.stop_calls.borrow_mut().push(resource_ids.to_vec());
        self.stop_decision.get()
    }
}

/// Collects transient user-facing messages.
#[derive(Default)]
pub struct TestMessages {
    pub warnings: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl MessageSink for TestMessages {
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

#[derive(Default)]
pub struct TestNotifier {
    pub refreshed: RefCell<Vec<i64>>,
}

impl Notifier for TestNotifier {
    fn feature_table_refresh(&self, resource_id: i64) {
        self.refreshed.borrow_mut().push(resource_id);
    }
}

/// The full set of mock collaborators wired for one test.
pub struct Rig {
    pub api: Rc<TestApi>,
    pub host: Rc<TestHost>,
    pub dialogs: Rc<TestDialogs>,
    pub messages: Rc<TestMessages>,
    pub notifier: Rc<TestNotifier>,
    pub config: EditorConfig,
}

impl Rig {
    pub fn new(api: TestApi) -> Self {
        Self {
            api: Rc::new(api),
            host: Rc::new(TestHost::default()),
            dialogs: Rc::new(TestDialogs::default()),
            messages: Rc::new(TestMessages::default()),
            notifier: Rc::new(TestNotifier::default()),
            config: EditorConfig::default(),
        }
    }

    pub fn with_dialogs(mut self, dialogs: TestDialogs) -> Self {
        self.dialogs = Rc::new(dialogs);
        self
    }

    /// Creates a session directly with its own private collection,
    /// loads its features, and enables it.
    pub fn session(&self, resource_id: i64) -> EditSession {
        let session = EditSession::create(
            resource_id,
            self.api.clone(),
            self.host.clone(),
            self.dialogs.clone(),
            self.messages.clone(),
            self.config.clone(),
            None,
        )
        .expect("session creation");
        let ticket = session.begin_feature_load();
        session
            .complete_feature_load(ticket, self.api.fetch_features(resource_id))
            .expect("feature load");
        session.set_enabled(true);
        session
    }

    pub fn coordinator(&self) -> SessionCoordinator {
        SessionCoordinator::new(
            self.api.clone(),
            self.host.clone(),
            self.dialogs.clone(),
            self.messages.clone(),
            self.notifier.clone(),
            self.config.clone(),
        )
    }
}
