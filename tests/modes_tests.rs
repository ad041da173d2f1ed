mod common;

use common::{Rig, TestApi, TestDialogs};
use mapquill::editor::modes::{translate, ModeKey};
use mapquill::geometry::{Coord, Geometry};
use mapquill::map::feature::AttrMap;

fn line_rig() -> Rig {
    let api = TestApi::with_layer(7, "LINESTRING");
    api.add_feature(7, 1, "LINESTRING (0 0, 10 0, 20 0)");
    Rig::new(api)
}

fn feature_geometry(session: &mapquill::editor::session::EditSession) -> Geometry {
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    feature.geometry.clone()
}

#[test]
fn test_modify_drags_a_vertex_and_undoes() {
    let rig = line_rig();
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Modify));
    let before = feature_geometry(&session);

    session.pointer_down(&Coord::xy(10.0, 1.0));
    session.pointer_move(&Coord::xy(10.0, 5.0));
    session.pointer_move(&Coord::xy(11.0, 8.0));
    session.pointer_up(&Coord::xy(11.0, 8.0));

    assert_eq!(
        feature_geometry(&session),
        Geometry::LineString(vec![
            Coord::xy(0.0, 0.0),
            Coord::xy(11.0, 8.0),
            Coord::xy(20.0, 0.0),
        ])
    );
    assert_eq!(session.undo_depth(), 1);

    session.undo_last();
    assert_eq!(feature_geometry(&session), before);
}

#[test]
fn test_modify_press_away_from_vertices_is_inert() {
    let rig = line_rig();
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Modify));

    session.pointer_down(&Coord::xy(100.0, 100.0));
    session.pointer_up(&Coord::xy(100.0, 100.0));
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn test_move_translates_whole_feature_and_undoes() {
    let rig = line_rig();
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Move));
    let before = feature_geometry(&session);

    session.pointer_down(&Coord::xy(10.0, 0.0));
    session.pointer_move(&Coord::xy(15.0, 3.0));
    session.pointer_up(&Coord::xy(15.0, 3.0));

    assert_eq!(
        feature_geometry(&session),
        Geometry::LineString(vec![
            Coord::xy(5.0, 3.0),
            Coord::xy(15.0, 3.0),
            Coord::xy(25.0, 3.0),
        ])
    );
    session.undo_last();
    assert_eq!(feature_geometry(&session), before);
}

#[test]
fn test_move_suppresses_hover_during_drag() {
    let rig = line_rig();
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Move));
    assert!(session
        .context()
        .registry
        .borrow()
        .is_active(translate::MOVE_HOVER));

    session.pointer_down(&Coord::xy(10.0, 0.0));
    assert!(!session
        .context()
        .registry
        .borrow()
        .is_active(translate::MOVE_HOVER));

    session.pointer_up(&Coord::xy(10.0, 0.0));
    assert!(session
        .context()
        .registry
        .borrow()
        .is_active(translate::MOVE_HOVER));
}

#[test]
fn test_delete_soft_flags_and_undoes() {
    let rig = line_rig();
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Delete));

    session.pointer_down(&Coord::xy(10.0, 0.0));
    {
        let source = session.source().borrow();
        let (_, feature) = source.iter().next().unwrap();
        assert!(feature.deleted);
        // Soft delete: still present in the collection
        assert_eq!(source.len(), 1);
    }
    assert_eq!(session.undo_depth(), 1);

    // A second click cannot hit a deleted feature
    session.pointer_down(&Coord::xy(10.0, 0.0));
    assert_eq!(session.undo_depth(), 1);

    session.undo_last();
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    assert!(!feature.deleted);
}

fn attribute_rig(outcome_fields: Option<&[(&str, &str)]>) -> Rig {
    let api = TestApi::with_layer(7, "LINESTRING");
    api.add_feature(7, 5, "LINESTRING (0 0, 10 0)");
    let mut stored = AttrMap::new();
    stored.insert("name".into(), serde_json::json!("old creek"));
    api.items.borrow_mut().insert((7, 5), stored);

    let dialogs = match outcome_fields {
        Some(pairs) => {
            let mut fields = AttrMap::new();
            for (name, value) in pairs {
                fields.insert(name.to_string(), serde_json::json!(value));
            }
            TestDialogs::submitting(fields)
        }
        None => TestDialogs::cancelling(),
    };
    Rig::new(api).with_dialogs(dialogs)
}

#[test]
fn test_attribute_edit_fetches_merges_and_undoes() {
    let rig = attribute_rig(Some(&[("name", "new creek"), ("basin", "north")]));
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Attribute));

    session.pointer_down(&Coord::xy(5.0, 0.0));

    // The form was pre-filled from the lazily fetched payload
    {
        let calls = rig.dialogs.form_calls.borrow();
        let prefill = calls[0].1.as_ref().unwrap();
        assert_eq!(prefill["name"], "old creek");
    }
    {
        let source = session.source().borrow();
        let (_, feature) = source.iter().next().unwrap();
        let attribution = feature.attribution.as_ref().unwrap();
        assert_eq!(attribution["name"], "new creek");
        assert_eq!(attribution["basin"], "north");
    }

    session.undo_last();
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    let attribution = feature.attribution.as_ref().unwrap();
    assert_eq!(attribution["name"], "old creek");
    assert!(attribution.get("basin").is_none());
}

#[test]
fn test_attribute_cancel_is_a_pure_noop() {
    let rig = attribute_rig(None);
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Attribute));

    session.pointer_down(&Coord::xy(5.0, 0.0));

    assert_eq!(session.undo_depth(), 0);
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    // The fetched payload stays cached for the next click
    assert_eq!(feature.attribution.as_ref().unwrap()["name"], "old creek");
}

#[test]
fn test_attribute_fetch_failure_aborts_the_edit() {
    let rig = attribute_rig(Some(&[("name", "x")]));
    rig.api.fail_item.set(true);
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Attribute));

    session.pointer_down(&Coord::xy(5.0, 0.0));

    assert!(rig.dialogs.form_calls.borrow().is_empty());
    assert_eq!(rig.messages.errors.borrow().len(), 1);
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn test_snap_toggle_is_orthogonal_to_modes() {
    let rig = line_rig();
    let session = rig.session(7);
    assert!(!session.snap_enabled());

    session.set_snap(true);
    assert!(session.snap_enabled());

    session.set_mode(Some(ModeKey::Modify));
    session.set_mode(Some(ModeKey::Delete));
    assert!(session.snap_enabled(), "mode switches leave snapping alone");

    session.set_snap(false);
    assert!(!session.snap_enabled());
}
