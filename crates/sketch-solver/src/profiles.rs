use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sketcher_types::SketchModel;
use uuid::Uuid;

/// Minimum number of distinct corner points and of selected edges.
const MIN_RECT_ELEMENTS: usize = 4;

/// XY extent of an axis-aligned rectangular profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectProfile {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl RectProfile {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Detect an axis-aligned rectangle described by the selected edges.
///
/// Only line entities contribute; missing ids and other entity kinds are
/// ignored. A selection qualifies when:
/// 1. it has at least four edges and at least four distinct endpoints,
/// 2. every endpoint lies on the bounding box boundary (within `eps`),
/// 3. every contributing line is horizontal or vertical (within `eps`),
/// 4. the bounding box has a non-degenerate area.
///
/// Anything else is "not yet a valid extrude shape" and yields `None`.
pub fn rectangle_profile(
    model: &SketchModel,
    selected_edge_ids: &[Uuid],
    eps: f64,
) -> Option<RectProfile> {
    if selected_edge_ids.len() < MIN_RECT_ELEMENTS {
        return None;
    }

    let mut points: BTreeMap<Uuid, (f64, f64)> = BTreeMap::new();
    for edge_id in selected_edge_ids {
        let Some((start, end)) = model.line_endpoints(*edge_id) else {
            continue;
        };
        let a = model.point(start);
        let b = model.point(end);
        if let Some(p) = a {
            points.insert(start, p);
        }
        if let Some(p) = b {
            points.insert(end, p);
        }
        if let (Some((ax, ay)), Some((bx, by))) = (a, b) {
            let axis_aligned = (ax - bx).abs() < eps || (ay - by).abs() < eps;
            if !axis_aligned {
                return None;
            }
        }
    }

    if points.len() < MIN_RECT_ELEMENTS {
        return None;
    }

    let xs = points.values().map(|p| p.0);
    let ys = points.values().map(|p| p.1);
    let profile = RectProfile {
        min_x: xs.clone().fold(f64::INFINITY, f64::min),
        max_x: xs.fold(f64::NEG_INFINITY, f64::max),
        min_y: ys.clone().fold(f64::INFINITY, f64::min),
        max_y: ys.fold(f64::NEG_INFINITY, f64::max),
    };

    let on_boundary = |&(x, y): &(f64, f64)| {
        (x - profile.min_x).abs() < eps
            || (x - profile.max_x).abs() < eps
            || (y - profile.min_y).abs() < eps
            || (y - profile.max_y).abs() < eps
    };
    if !points.values().all(on_boundary) {
        return None;
    }

    if profile.width() <= eps || profile.height() <= eps {
        return None;
    }

    Some(profile)
}
