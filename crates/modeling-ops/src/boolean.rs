use tracing::debug;

use crate::axis_box::AxisBox;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Subtract,
}

/// Combine `tool` into the running solid list.
pub fn apply_boolean(solids: Vec<AxisBox>, tool: AxisBox, kind: BooleanKind, eps: f64) -> Vec<AxisBox> {
    match kind {
        BooleanKind::Union => union(solids, tool),
        BooleanKind::Subtract => subtract(solids, tool, eps),
    }
}

/// Append `tool` without merging. Overlapping solids are allowed.
pub fn union(mut solids: Vec<AxisBox>, tool: AxisBox) -> Vec<AxisBox> {
    solids.push(tool);
    solids
}

/// Remove `tool` from every solid it intersects. Each hit solid is replaced
/// by up to six slabs surrounding the cut region; solids that miss the tool
/// pass through unchanged and in order.
pub fn subtract(solids: Vec<AxisBox>, tool: AxisBox, eps: f64) -> Vec<AxisBox> {
    let input = solids.len();
    let mut result = Vec::with_capacity(input);
    let (mut split, mut untouched) = (0usize, 0usize);
    for solid in solids {
        if !solid.intersects(&tool) {
            untouched += 1;
            result.push(solid);
            continue;
        }
        match solid.intersection(&tool, eps) {
            Some(cut) => {
                split += 1;
                split_around(&solid, &cut, eps, &mut result);
            }
            None => {
                untouched += 1;
                result.push(solid);
            }
        }
    }
    debug!(input, split, untouched, output = result.len(), "subtract");
    result
}

/// `cut` lies inside `src`. Emits the X slabs over the full Y/Z range, then
/// the Y slabs inside the X overlap, then the Z slabs inside the XY overlap.
/// Slabs thinner than `eps` are dropped.
fn split_around(src: &AxisBox, cut: &AxisBox, eps: f64, out: &mut Vec<AxisBox>) {
    let (s, c) = (src, cut);

    if c.min[0] - s.min[0] > eps {
        out.push(AxisBox::new(s.min[0], s.min[1], s.min[2], c.min[0], s.max[1], s.max[2]));
    }
    if s.max[0] - c.max[0] > eps {
        out.push(AxisBox::new(c.max[0], s.min[1], s.min[2], s.max[0], s.max[1], s.max[2]));
    }

    let x0 = s.min[0].max(c.min[0]);
    let x1 = s.max[0].min(c.max[0]);

    if c.min[1] - s.min[1] > eps {
        out.push(AxisBox::new(x0, s.min[1], s.min[2], x1, c.min[1], s.max[2]));
    }
    if s.max[1] - c.max[1] > eps {
        out.push(AxisBox::new(x0, c.max[1], s.min[2], x1, s.max[1], s.max[2]));
    }

    let y0 = s.min[1].max(c.min[1]);
    let y1 = s.max[1].min(c.max[1]);

    if c.min[2] - s.min[2] > eps {
        out.push(AxisBox::new(x0, y0, s.min[2], x1, y1, c.min[2]));
    }
    if s.max[2] - c.max[2] > eps {
        out.push(AxisBox::new(x0, y0, c.max[2], x1, y1, s.max[2]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_EPSILON;
    use approx::assert_abs_diff_eq;

    fn cube(size: f64) -> AxisBox {
        AxisBox::new(0.0, 0.0, 0.0, size, size, size)
    }

    #[test]
    fn union_appends_without_merging() {
        let solids = vec![cube(1.0)];
        let out = union(solids, cube(1.0));
        assert_eq!(out, vec![cube(1.0), cube(1.0)]);
    }

    #[test]
    fn centered_cut_leaves_six_slabs() {
        let out = subtract(
            vec![cube(10.0)],
            AxisBox::new(2.0, 2.0, 2.0, 8.0, 8.0, 8.0),
            DEFAULT_EPSILON,
        );
        assert_eq!(out.len(), 6);
        let volume: f64 = out.iter().map(AxisBox::volume).sum();
        assert_abs_diff_eq!(volume, 1000.0 - 216.0, epsilon = 1e-9);
    }

    #[test]
    fn through_cut_on_one_side_leaves_one_slab() {
        let out = subtract(
            vec![cube(10.0)],
            AxisBox::new(5.0, -1.0, -1.0, 11.0, 11.0, 11.0),
            DEFAULT_EPSILON,
        );
        assert_eq!(out, vec![AxisBox::new(0.0, 0.0, 0.0, 5.0, 10.0, 10.0)]);
    }

    #[test]
    fn full_cover_removes_the_solid() {
        let out = subtract(vec![cube(1.0)], cube(2.0), DEFAULT_EPSILON);
        assert!(out.is_empty());
    }

    #[test]
    fn tool_disjoint_in_one_axis_leaves_solid_alone() {
        let solid = AxisBox::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let tool = AxisBox::new(5.0, 0.0, 0.0, 6.0, 1.0, 1.0);
        assert_eq!(subtract(vec![solid], tool, DEFAULT_EPSILON), vec![solid]);
    }

    #[test]
    fn disjoint_solids_pass_through() {
        let far = AxisBox::new(20.0, 20.0, 20.0, 21.0, 21.0, 21.0);
        let out = subtract(vec![cube(1.0), far], AxisBox::new(0.5, 0.5, 0.5, 2.0, 2.0, 2.0), DEFAULT_EPSILON);
        assert_eq!(out.last(), Some(&far));
    }
}
