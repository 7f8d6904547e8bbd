//! Tests for the ModelBuilder workflow API.

use test_harness::{HarnessError, ModelBuilder};

#[test]
fn named_points_resolve() {
    let mut m = ModelBuilder::new();
    let id = m.point("a", 1.0, 2.0).unwrap();
    assert_eq!(m.id("a").unwrap(), id);
    assert_eq!(m.position("a").unwrap(), (1.0, 2.0));
    assert!(matches!(m.id("nope"), Err(HarnessError::UnknownName { .. })));
}

#[test]
fn duplicate_name_is_rejected_before_dispatch() {
    let mut m = ModelBuilder::new();
    m.point("a", 0.0, 0.0).unwrap();
    let sent = m.history().len();
    assert!(matches!(
        m.point("a", 5.0, 5.0),
        Err(HarnessError::DuplicateName { .. })
    ));
    assert_eq!(m.history().len(), sent);
    assert_eq!(m.view().unwrap().points.len(), 1);
}

#[test]
fn dispatch_errors_surface() {
    let mut m = ModelBuilder::new();
    m.point("a", 0.0, 0.0).unwrap();
    // A point is not a line.
    let err = m.horizontal("h", "a").unwrap_err();
    assert!(matches!(err, HarnessError::DispatchError { .. }));
    assert!(m.id("h").is_err());
}

#[test]
fn rect_outline_names_points_and_edges() {
    let mut m = ModelBuilder::new();
    let edges = m.rect_outline("r", 0.0, 0.0, 4.0, 3.0).unwrap();
    assert_eq!(edges, vec!["r.e0", "r.e1", "r.e2", "r.e3"]);
    assert_eq!(m.position("r.p2").unwrap(), (4.0, 3.0));

    let view = m.view().unwrap();
    assert_eq!(view.points.len(), 4);
    assert_eq!(view.lines.len(), 4);
}

#[test]
fn remove_forgets_the_name() {
    let mut m = ModelBuilder::new();
    m.point("a", 0.0, 0.0).unwrap();
    m.point("b", 1.0, 0.0).unwrap();
    m.distance("d", "a", "b", 2.0).unwrap();

    m.remove("d").unwrap();
    assert!(m.id("d").is_err());
    assert!(m.view().unwrap().constraints.is_empty());

    m.remove("a").unwrap();
    assert_eq!(m.view().unwrap().points.len(), 1);
}

#[test]
fn body_without_features_has_no_mesh() {
    let mut m = ModelBuilder::new();
    m.body("empty").unwrap();
    m.rebuild();
    assert!(matches!(m.mesh("empty"), Err(HarnessError::NoMesh { .. })));
}
