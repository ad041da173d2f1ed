mod common;

use common::{Rig, TestApi};
use mapquill::editor::modes::ModeKey;
use mapquill::geometry::{Coord, Geometry};
use mapquill::input::Key;

fn hole_rig(geometry_type: &str, features: &[(i64, &str)]) -> Rig {
    let api = TestApi::with_layer(7, geometry_type);
    for (id, geom) in features {
        api.add_feature(7, *id, geom);
    }
    Rig::new(api)
}

fn sketch_square(session: &mapquill::editor::session::EditSession, x0: f64, y0: f64, size: f64) {
    session.pointer_down(&Coord::xy(x0, y0));
    session.pointer_down(&Coord::xy(x0 + size, y0));
    session.pointer_down(&Coord::xy(x0 + size, y0 + size));
    session.pointer_down(&Coord::xy(x0, y0 + size));
    session.key(Key::Enter);
}

#[test]
fn test_hole_appends_interior_ring() {
    let rig = hole_rig("POLYGON", &[(1, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")]);
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Hole));

    session.pointer_move(&Coord::xy(2.0, 2.0));
    sketch_square(&session, 2.0, 2.0, 2.0);

    {
        let source = session.source().borrow();
        let (_, feature) = source.iter().next().unwrap();
        let Geometry::Polygon(rings) = &feature.geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(
            rings[1],
            vec![
                Coord::xy(2.0, 2.0),
                Coord::xy(4.0, 2.0),
                Coord::xy(4.0, 4.0),
                Coord::xy(2.0, 4.0),
                Coord::xy(2.0, 2.0),
            ]
        );
    }
    assert_eq!(session.undo_depth(), 1);

    session.undo_last();
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    let Geometry::Polygon(rings) = &feature.geometry else {
        panic!("expected a polygon");
    };
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0].len(), 5);
}

#[test]
fn test_hole_sketch_never_touches_the_real_collection() {
    let rig = hole_rig("POLYGON", &[(1, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")]);
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Hole));

    session.pointer_move(&Coord::xy(2.0, 2.0));
    session.pointer_down(&Coord::xy(2.0, 2.0));
    session.pointer_down(&Coord::xy(4.0, 2.0));

    // Mid-sketch: only the original polygon in the session's collection
    assert_eq!(session.source().borrow().len(), 1);
    session.key(Key::Esc);
    assert_eq!(session.source().borrow().len(), 1);
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn test_hole_outside_any_polygon_warns_and_aborts() {
    let rig = hole_rig("POLYGON", &[(1, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")]);
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Hole));

    session.pointer_move(&Coord::xy(50.0, 50.0));
    session.pointer_down(&Coord::xy(50.0, 50.0));

    assert_eq!(rig.messages.warnings.borrow().len(), 1);
    // The sketch was vetoed; finishing does nothing
    session.key(Key::Enter);
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    let Geometry::Polygon(rings) = &feature.geometry else {
        panic!("expected a polygon");
    };
    assert_eq!(rings.len(), 1);
}

#[test]
fn test_multipolygon_hole_goes_to_the_containing_member() {
    let rig = hole_rig(
        "MULTIPOLYGON",
        &[(
            1,
            "MULTIPOLYGON (((0 0, 10 0, 10 10, 0 10, 0 0)), ((20 0, 30 0, 30 10, 20 10, 20 0)))",
        )],
    );
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Hole));

    // The ring falls entirely inside the second member
    session.pointer_move(&Coord::xy(22.0, 2.0));
    sketch_square(&session, 22.0, 2.0, 2.0);

    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    let Geometry::MultiPolygon(polys) = &feature.geometry else {
        panic!("expected a multipolygon");
    };
    assert_eq!(polys[0].len(), 1, "first member must be untouched");
    assert_eq!(polys[1].len(), 2);
    assert_eq!(polys[1][1][0], Coord::xy(22.0, 2.0));
}

#[test]
fn test_multipolygon_hole_matching_no_member_is_discarded() {
    let rig = hole_rig(
        "MULTIPOLYGON",
        &[(
            1,
            "MULTIPOLYGON (((0 0, 10 0, 10 10, 0 10, 0 0)), ((20 0, 30 0, 30 10, 20 10, 20 0)))",
        )],
    );
    let session = rig.session(7);
    session.set_mode(Some(ModeKey::Hole));

    // Starts inside the first member but straddles into the gap
    session.pointer_move(&Coord::xy(8.0, 2.0));
    sketch_square(&session, 8.0, 2.0, 7.0);

    assert_eq!(rig.messages.warnings.borrow().len(), 1);
    assert_eq!(session.undo_depth(), 0);
    let source = session.source().borrow();
    let (_, feature) = source.iter().next().unwrap();
    let Geometry::MultiPolygon(polys) = &feature.geometry else {
        panic!("expected a multipolygon");
    };
    assert_eq!(polys[0].len(), 1);
    assert_eq!(polys[1].len(), 1);
}
