//! Per-constraint relaxation steps.
//!
//! Each step reads the current point values, returns the squared violation
//! measured before moving, and writes back new point values that move a
//! `step` fraction of the way toward satisfying the constraint.

use sketcher_types::{Constraint, SketchEntity, SketchModel};
use uuid::Uuid;

/// Distances below this are clamped to avoid dividing by zero.
const MIN_DISTANCE: f64 = 1e-12;

/// Verify that every id the constraint touches resolves to an entity of the
/// expected kind. Returns a human-readable reason on failure.
pub fn check_references(model: &SketchModel, constraint: &Constraint) -> Result<(), String> {
    match constraint {
        Constraint::Coincident {
            point_a, point_b, ..
        }
        | Constraint::Distance {
            point_a, point_b, ..
        } => {
            expect_point(model, *point_a)?;
            expect_point(model, *point_b)
        }
        Constraint::Horizontal { line, .. } | Constraint::Vertical { line, .. } => {
            let (start, end) = match model.entity(*line) {
                None => return Err(format!("constraint references missing entity {line}")),
                Some(SketchEntity::Line {
                    start_id, end_id, ..
                }) => (*start_id, *end_id),
                Some(other) => {
                    return Err(format!("entity {line} is a {}, not a line", other.kind_name()))
                }
            };
            expect_point(model, start)?;
            expect_point(model, end)
        }
    }
}

fn expect_point(model: &SketchModel, id: Uuid) -> Result<(), String> {
    match model.entity(id) {
        None => Err(format!("constraint references missing entity {id}")),
        Some(e) if e.is_point() => Ok(()),
        Some(e) => Err(format!("entity {id} is a {}, not a point", e.kind_name())),
    }
}

/// Apply one relaxation step for `constraint` and return its squared error.
pub fn apply(model: &mut SketchModel, constraint: &Constraint, step: f64) -> f64 {
    match constraint {
        Constraint::Coincident {
            point_a, point_b, ..
        } => coincident(model, *point_a, *point_b, step),
        Constraint::Distance {
            point_a,
            point_b,
            value,
            ..
        } => distance(model, *point_a, *point_b, *value, step),
        Constraint::Horizontal { line, .. } => horizontal(model, *line, step),
        Constraint::Vertical { line, .. } => vertical(model, *line, step),
    }
}

fn lerp(from: f64, to: f64, step: f64) -> f64 {
    from + (to - from) * step
}

fn coincident(model: &mut SketchModel, a: Uuid, b: Uuid, step: f64) -> f64 {
    let (Some((ax, ay)), Some((bx, by))) = (model.point(a), model.point(b)) else {
        return 0.0;
    };
    let (dx, dy) = (bx - ax, by - ay);
    let err = dx * dx + dy * dy;

    let mid_x = (ax + bx) / 2.0;
    let mid_y = (ay + by) / 2.0;
    model.set_point(a, lerp(ax, mid_x, step), lerp(ay, mid_y, step));
    model.set_point(b, lerp(bx, mid_x, step), lerp(by, mid_y, step));
    err
}

fn distance(model: &mut SketchModel, a: Uuid, b: Uuid, target: f64, step: f64) -> f64 {
    let (Some((ax, ay)), Some((bx, by))) = (model.point(a), model.point(b)) else {
        return 0.0;
    };
    let (dx, dy) = (bx - ax, by - ay);
    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

    let diff = dist - target;
    let err = diff * diff;

    let (nx, ny) = (dx / dist, dy / dist);
    let shift = diff * 0.5 * step;
    model.set_point(a, ax + nx * shift, ay + ny * shift);
    model.set_point(b, bx - nx * shift, by - ny * shift);
    err
}

fn line_points(model: &SketchModel, line: Uuid) -> Option<(Uuid, (f64, f64), Uuid, (f64, f64))> {
    let (start, end) = model.line_endpoints(line)?;
    Some((start, model.point(start)?, end, model.point(end)?))
}

fn horizontal(model: &mut SketchModel, line: Uuid, step: f64) -> f64 {
    let Some((a, (ax, ay), b, (bx, by))) = line_points(model, line) else {
        return 0.0;
    };
    let dy = by - ay;
    let mid_y = (ay + by) / 2.0;
    model.set_point(a, ax, lerp(ay, mid_y, step));
    model.set_point(b, bx, lerp(by, mid_y, step));
    dy * dy
}

fn vertical(model: &mut SketchModel, line: Uuid, step: f64) -> f64 {
    let Some((a, (ax, ay), b, (bx, by))) = line_points(model, line) else {
        return 0.0;
    };
    let dx = bx - ax;
    let mid_x = (ax + bx) / 2.0;
    model.set_point(a, lerp(ax, mid_x, step), ay);
    model.set_point(b, lerp(bx, mid_x, step), by);
    dx * dx
}
