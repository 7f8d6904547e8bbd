use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use sketch_solver::{
    rectangle_profile, ConstraintSolver, RelaxationSolver, SolveResult, SolverConfig,
    SolverErrorCode,
};
use sketcher_types::{Constraint, SketchEntity, SketchModel};
use uuid::Uuid;

fn add_point(model: &mut SketchModel, x: f64, y: f64) -> Uuid {
    model.add_entity(SketchEntity::point(x, y)).unwrap()
}

fn add_line(model: &mut SketchModel, a: Uuid, b: Uuid) -> Uuid {
    model.add_entity(SketchEntity::line(a, b)).unwrap()
}

fn solve(model: &mut SketchModel) -> SolveResult {
    RelaxationSolver::default().solve(model)
}

fn dist(model: &SketchModel, a: Uuid, b: Uuid) -> f64 {
    let (ax, ay) = model.point(a).unwrap();
    let (bx, by) = model.point(b).unwrap();
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

#[test]
fn horizontal_line_levels_out() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 0.0, 0.0);
    let b = add_point(&mut model, 10.0, 5.0);
    let l = add_line(&mut model, a, b);
    model.add_constraint(Constraint::horizontal(l)).unwrap();

    let result = solve(&mut model);
    assert!(result.success);
    assert!(result.errors.is_empty());
    assert!(result.iterations > 1 && result.iterations <= 100);

    let (ax, ay) = model.point(a).unwrap();
    let (bx, by) = model.point(b).unwrap();
    assert!((ay - by).abs() < 1e-3);
    // Horizontal only moves Y.
    assert_eq!(ax, 0.0);
    assert_eq!(bx, 10.0);
    // Both ends meet at the midpoint.
    assert_abs_diff_eq!(ay, 2.5, epsilon = 1e-3);
}

#[test]
fn vertical_line_aligns_x() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 0.0, 0.0);
    let b = add_point(&mut model, 4.0, 8.0);
    let l = add_line(&mut model, a, b);
    model.add_constraint(Constraint::vertical(l)).unwrap();

    let result = solve(&mut model);
    assert!(result.success);
    let (ax, _) = model.point(a).unwrap();
    let (bx, by) = model.point(b).unwrap();
    assert!((ax - bx).abs() < 1e-3);
    assert_eq!(by, 8.0);
}

#[test]
fn distance_constraint_reaches_target() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 0.0, 0.0);
    let b = add_point(&mut model, 3.0, 4.0);
    model
        .add_constraint(Constraint::distance(a, b, 10.0))
        .unwrap();

    let result = solve(&mut model);
    assert!(result.success);
    assert_abs_diff_eq!(dist(&model, a, b), 10.0, epsilon = 1e-3);
}

#[test]
fn coincident_points_meet_in_the_middle() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, -2.0, 0.0);
    let b = add_point(&mut model, 2.0, 6.0);
    model.add_constraint(Constraint::coincident(a, b)).unwrap();

    let result = solve(&mut model);
    assert!(result.success);
    let (ax, ay) = model.point(a).unwrap();
    let (bx, by) = model.point(b).unwrap();
    assert_abs_diff_eq!(ax, bx, epsilon = 1e-3);
    assert_abs_diff_eq!(ay, by, epsilon = 1e-3);
    assert_abs_diff_eq!(ax, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(ay, 3.0, epsilon = 1e-3);
}

#[test]
fn missing_entity_aborts_before_moving_anything() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 1.0, 1.0);
    let ghost = Uuid::new_v4();
    let c = Constraint::distance(a, ghost, 5.0);
    let cid = c.id();
    model.add_constraint(c).unwrap();
    let before = model.clone();

    let result = solve(&mut model);
    assert!(!result.success);
    assert_eq!(result.iterations, 0);
    assert!(result.final_error.is_infinite());
    assert!(result.has_error(SolverErrorCode::MissingEntity));
    assert_eq!(result.errors[0].constraint_id, Some(cid));
    assert_eq!(model, before);
}

#[test]
fn horizontal_on_a_point_is_a_reference_error() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 0.0, 0.0);
    model.add_constraint(Constraint::horizontal(a)).unwrap();

    let result = solve(&mut model);
    assert!(!result.success);
    assert!(result.has_error(SolverErrorCode::MissingEntity));
}

#[test]
fn conflicting_distances_do_not_converge() {
    let mut model = SketchModel::new();
    let a = add_point(&mut model, 0.0, 0.0);
    let b = add_point(&mut model, 1.0, 0.0);
    model.add_constraint(Constraint::distance(a, b, 5.0)).unwrap();
    model
        .add_constraint(Constraint::distance(a, b, 10.0))
        .unwrap();

    let result = solve(&mut model);
    assert!(!result.success);
    assert_eq!(result.iterations, SolverConfig::default().max_iterations);
    assert!(result.has_error(SolverErrorCode::NoConverge));
    assert!(result.final_error.is_finite());
}

#[test]
fn skewed_quad_squares_up_into_a_rectangle_profile() {
    let mut model = SketchModel::new();
    let p0 = add_point(&mut model, 0.0, 0.0);
    let p1 = add_point(&mut model, 10.0, 0.4);
    let p2 = add_point(&mut model, 10.3, 6.0);
    let p3 = add_point(&mut model, -0.2, 5.8);
    let bottom = add_line(&mut model, p0, p1);
    let right = add_line(&mut model, p1, p2);
    let top = add_line(&mut model, p2, p3);
    let left = add_line(&mut model, p3, p0);
    let edges = [bottom, right, top, left];

    assert!(rectangle_profile(&model, &edges, 1e-6).is_none());

    model.add_constraint(Constraint::horizontal(bottom)).unwrap();
    model.add_constraint(Constraint::horizontal(top)).unwrap();
    model.add_constraint(Constraint::vertical(left)).unwrap();
    model.add_constraint(Constraint::vertical(right)).unwrap();

    let result = solve(&mut model);
    assert!(result.success, "{result:?}");

    let rect = rectangle_profile(&model, &edges, 1e-3).expect("solved quad is a rectangle");
    assert!(rect.width() > 9.0);
    assert!(rect.height() > 5.0);
}

#[test]
fn tighter_epsilon_needs_more_iterations() {
    let build = || {
        let mut model = SketchModel::new();
        let a = add_point(&mut model, 0.0, 0.0);
        let b = add_point(&mut model, 10.0, 5.0);
        let l = add_line(&mut model, a, b);
        model.add_constraint(Constraint::horizontal(l)).unwrap();
        model
    };

    let loose = RelaxationSolver::new(SolverConfig::default().with_epsilon(1e-2));
    let tight = RelaxationSolver::new(SolverConfig::default().with_epsilon(1e-10));
    let loose_result = loose.solve(&mut build());
    let tight_result = tight.solve(&mut build());
    assert!(loose_result.success && tight_result.success);
    assert!(loose_result.iterations < tight_result.iterations);
}

#[test]
fn solve_result_serializes_infinite_error_as_null() {
    let mut model = SketchModel::new();
    model
        .add_constraint(Constraint::vertical(Uuid::new_v4()))
        .unwrap();
    let result = solve(&mut model);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["final_error"].is_null());
    let back: SolveResult = serde_json::from_value(json).unwrap();
    assert!(back.final_error.is_infinite());
}

proptest! {
    #[test]
    fn single_horizontal_always_converges(
        ax in -100.0f64..100.0,
        ay in -100.0f64..100.0,
        bx in -100.0f64..100.0,
        by in -100.0f64..100.0,
    ) {
        let mut model = SketchModel::new();
        let a = add_point(&mut model, ax, ay);
        let b = add_point(&mut model, bx, by);
        let l = add_line(&mut model, a, b);
        model.add_constraint(Constraint::horizontal(l)).unwrap();

        let result = solve(&mut model);
        prop_assert!(result.success);
        let (_, ya) = model.point(a).unwrap();
        let (_, yb) = model.point(b).unwrap();
        prop_assert!((ya - yb).abs() < 1e-3);
    }
}
