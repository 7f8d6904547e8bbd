use sketcher_types::*;

#[test]
fn entities_carry_type_tag() {
    let p = SketchEntity::point(1.5, -2.0);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["type"], "Point");

    let back: SketchEntity = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
}

#[test]
fn model_round_trips_mixed_variants() {
    let mut model = SketchModel::new();
    let a = model.add_entity(SketchEntity::point(0.0, 0.0)).unwrap();
    let b = model.add_entity(SketchEntity::point(4.0, 0.0)).unwrap();
    let l = model.add_entity(SketchEntity::line(a, b)).unwrap();
    model.add_entity(SketchEntity::circle(a, 2.0)).unwrap();
    model.add_entity(SketchEntity::rectangle(b, 3.0, 1.0)).unwrap();
    model.add_constraint(Constraint::horizontal(l)).unwrap();
    model.add_constraint(Constraint::distance(a, b, 4.0)).unwrap();
    model.add_constraint(Constraint::coincident(a, b)).unwrap();
    model.add_constraint(Constraint::vertical(l)).unwrap();

    let json = serde_json::to_string(&model).unwrap();
    let back: SketchModel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, model);
}

#[test]
fn constraint_entity_ids_are_ordered() {
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    assert_eq!(Constraint::distance(a, b, 1.0).entity_ids(), vec![a, b]);
    assert_eq!(Constraint::coincident(b, a).entity_ids(), vec![b, a]);
}
