mod common;

use common::{Rig, TestApi};
use mapquill::editor::context::StopDecision;
use mapquill::geometry::Coord;

fn two_layer_rig() -> Rig {
    let api = TestApi::with_layer(1, "POINT");
    api.metadata.borrow_mut().insert(2, "POLYGON".to_string());
    Rig::new(api)
}

#[test]
fn test_editable_set_diff_creates_and_drops_sessions() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();

    let effective = coordinator.update_editable(&[1, 2]);
    assert_eq!(effective, vec![1, 2]);
    assert_eq!(coordinator.session_count(), 2);
    assert_eq!(*rig.host.added.borrow(), vec![1, 2]);

    let effective = coordinator.update_editable(&[2]);
    assert_eq!(effective, vec![2]);
    assert_eq!(*rig.host.removed.borrow(), vec![1]);
    // Clean removal needs no confirmation
    assert!(rig.dialogs.stop_calls.borrow().is_empty());
}

#[test]
fn test_failed_session_creation_is_reported_and_skipped() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();

    let effective = coordinator.update_editable(&[1, 99]);
    assert_eq!(effective, vec![1]);
    assert_eq!(rig.messages.errors.borrow().len(), 1);
    assert!(rig.host.added.borrow().contains(&1));
    assert!(!rig.host.added.borrow().contains(&99));
}

#[test]
fn test_feature_load_failure_unwinds_the_session() {
    let rig = two_layer_rig();
    rig.api.fail_fetch.set(true);
    let mut coordinator = rig.coordinator();

    let effective = coordinator.update_editable(&[1]);
    assert!(effective.is_empty());
    // The layer was mounted for the load attempt and unmounted again
    assert_eq!(*rig.host.added.borrow(), vec![1]);
    assert_eq!(*rig.host.removed.borrow(), vec![1]);
}

#[test]
fn test_at_most_one_session_is_enabled() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1, 2]);

    coordinator.set_selected(Some(1));
    assert!(coordinator.session(1).unwrap().is_enabled());
    assert!(!coordinator.session(2).unwrap().is_enabled());

    coordinator.set_selected(Some(2));
    assert!(!coordinator.session(1).unwrap().is_enabled());
    assert!(coordinator.session(2).unwrap().is_enabled());

    coordinator.set_selected(None);
    assert!(!coordinator.session(2).unwrap().is_enabled());
}

#[test]
fn test_disabled_sessions_keep_their_buffers() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1, 2]);
    coordinator.set_selected(Some(1));

    let session = coordinator.session(1).unwrap();
    session.pointer_down(&Coord::xy(1.0, 1.0));
    assert!(session.dirty());

    coordinator.set_selected(Some(2));
    let session = coordinator.session(1).unwrap();
    assert!(session.dirty());
    assert_eq!(session.undo_depth(), 1);
}

#[test]
fn test_dirty_stop_with_save_pushes_then_drops() {
    let rig = two_layer_rig();
    rig.dialogs.stop_decision.set(StopDecision::Save);
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(3.0, 4.0));

    let effective = coordinator.update_editable(&[]);
    assert!(effective.is_empty());
    assert_eq!(*rig.dialogs.stop_calls.borrow(), vec![vec![1]]);

    let patches = rig.api.patches.borrow();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].1[0].geom, "POINT (3 4)");
    assert_eq!(coordinator.session_count(), 0);
    assert_eq!(*rig.host.removed.borrow(), vec![1]);
}

#[test]
fn test_dirty_stop_with_discard_drops_without_saving() {
    let rig = two_layer_rig();
    rig.dialogs.stop_decision.set(StopDecision::Discard);
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(3.0, 4.0));

    coordinator.update_editable(&[]);
    assert!(rig.api.patches.borrow().is_empty());
    assert_eq!(coordinator.session_count(), 0);
}

#[test]
fn test_dirty_stop_with_continue_keeps_the_session_editable() {
    let rig = two_layer_rig();
    rig.dialogs.stop_decision.set(StopDecision::Continue);
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1, 2]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(3.0, 4.0));

    // Both stop; only the dirty one survives the refusal
    let effective = coordinator.update_editable(&[]);
    assert_eq!(effective, vec![1]);
    assert!(coordinator.session(1).is_some());
    assert!(coordinator.session(2).is_none());
    assert!(coordinator.session(1).unwrap().dirty());
}

#[test]
fn test_failed_save_on_stop_still_drops_the_session() {
    let rig = two_layer_rig();
    rig.dialogs.stop_decision.set(StopDecision::Save);
    rig.api.fail_patch.set(true);
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(3.0, 4.0));

    let effective = coordinator.update_editable(&[]);
    assert!(effective.is_empty());
    assert_eq!(coordinator.session_count(), 0);
    assert!(!rig.messages.errors.borrow().is_empty());
}

#[test]
fn test_selected_session_clears_when_dropped() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1]);
    coordinator.set_selected(Some(1));
    assert_eq!(coordinator.selected(), Some(1));

    coordinator.update_editable(&[]);
    assert_eq!(coordinator.selected(), None);
}

#[test]
fn test_explicit_save_reports_counts() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(1.0, 1.0));

    let report = coordinator.save(1).unwrap();
    assert_eq!(report.patched, 1);
    assert_eq!(report.deleted, 0);
    assert_eq!(*rig.notifier.refreshed.borrow(), vec![1]);
}

#[test]
fn test_teardown_all_unmounts_everything() {
    let rig = two_layer_rig();
    let mut coordinator = rig.coordinator();
    coordinator.update_editable(&[1, 2]);
    coordinator.set_selected(Some(1));
    coordinator
        .session(1)
        .unwrap()
        .pointer_down(&Coord::xy(1.0, 1.0));

    coordinator.teardown_all();
    assert_eq!(coordinator.session_count(), 0);
    assert_eq!(coordinator.selected(), None);
    assert_eq!(*rig.host.removed.borrow(), vec![1, 2]);
    // No confirmation on unmount
    assert!(rig.dialogs.stop_calls.borrow().is_empty());
}
