//! MapQuill — an interactive vector feature editing engine.
//!
//! The engine lets a user create, modify, move, delete, and hole-cut
//! vector geometries on a live map, buffers every edit locally with
//! one-shot undo closures, and reconciles the buffer with a remote
//! feature store in create/patch/delete batches.
//!
//! The map renderer, the HTTP client, and the dialog UI are the
//! embedding application's; they plug in through the [`MapHost`],
//! [`FeatureApi`], [`DialogHost`], [`MessageSink`], and [`Notifier`]
//! traits. Everything runs single-threaded inside the host's event
//! loop — sharing is `Rc<RefCell<_>>`, and network suspension points
//! are modeled as begin/complete pairs guarded by load tickets.
//!
//! # Example
//!
//! ```no_run
//! use mapquill::config::EditorConfig;
//! use mapquill::editor::{ModeKey, SessionCoordinator};
//! # use mapquill::api::client::{FeatureApi, FeatureItem, FeatureToSave, GeomConfig, Notifier};
//! # use mapquill::editor::context::{DialogHost, FormOutcome, MessageSink, StopDecision};
//! # use mapquill::map::feature::AttrMap;
//! # use mapquill::map::host::MapHost;
//! # use mapquill::map::layer::SharedLayer;
//! # use mapquill::geometry::Coord;
//! # use std::rc::Rc;
//! # struct App;
//! # impl FeatureApi for App {
//! #     fn layer_metadata(&self, _: i64) -> anyhow::Result<GeomConfig> { unimplemented!() }
//! #     fn fetch_features(&self, _: i64) -> anyhow::Result<Vec<FeatureItem>> { unimplemented!() }
//! #     fn fetch_item(&self, _: i64, _: i64) -> anyhow::Result<AttrMap> { unimplemented!() }
//! #     fn patch_features(&self, _: i64, _: &[FeatureToSave]) -> anyhow::Result<()> { unimplemented!() }
//! #     fn delete_features(&self, _: i64, _: &[FeatureToSave]) -> anyhow::Result<()> { unimplemented!() }
//! # }
//! # impl MapHost for App {
//! #     fn add_layer(&self, _: &SharedLayer) {}
//! #     fn remove_layer(&self, _: i64) {}
//! #     fn reload_layer(&self, _: i64) {}
//! #     fn coord_to_pixel(&self, c: &Coord) -> (f64, f64) { (c.x, c.y) }
//! #     fn pixel_to_coord(&self, p: (f64, f64)) -> Coord { Coord::xy(p.0, p.1) }
//! # }
//! # impl DialogHost for App {
//! #     fn feature_form(&self, _: i64, _: Option<&AttrMap>) -> FormOutcome { FormOutcome::Unavailable }
//! #     fn confirm_stop(&self, _: &[i64]) -> StopDecision { StopDecision::Discard }
//! # }
//! # impl MessageSink for App {
//! #     fn warn(&self, _: &str) {}
//! #     fn error(&self, _: &str) {}
//! # }
//! # impl Notifier for App {
//! #     fn feature_table_refresh(&self, _: i64) {}
//! # }
//!
//! let app = Rc::new(App);
//! let mut coordinator = SessionCoordinator::new(
//!     app.clone(),
//!     app.clone(),
//!     app.clone(),
//!     app.clone(),
//!     app,
//!     EditorConfig::load(),
//! );
//!
//! // The layer tree marks resource 42 editable; a session appears.
//! coordinator.update_editable(&[42]);
//! coordinator.set_selected(Some(42));
//! if let Some(session) = coordinator.session(42) {
//!     session.set_mode(Some(ModeKey::Modify));
//! }
//! ```
//!
//! [`MapHost`]: map::host::MapHost
//! [`FeatureApi`]: api::client::FeatureApi
//! [`DialogHost`]: editor::context::DialogHost
//! [`MessageSink`]: editor::context::MessageSink
//! [`Notifier`]: api::client::Notifier

pub mod api;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod map;
pub mod style;
