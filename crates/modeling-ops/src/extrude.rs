use sketch_solver::RectProfile;

use crate::axis_box::AxisBox;
use crate::types::OpError;

/// Build the tool box for a rectangular extrude: the profile's XY extent,
/// from the sketch plane (z = 0) up to `height`.
pub fn extrude_tool(profile: &RectProfile, height: f64, eps: f64) -> Result<AxisBox, OpError> {
    if height < eps {
        return Err(OpError::HeightTooSmall { height });
    }
    let tool = AxisBox::new(
        profile.min_x,
        profile.min_y,
        0.0,
        profile.max_x,
        profile.max_y,
        height,
    );
    if !tool.is_valid(eps) {
        return Err(OpError::DegenerateTool);
    }
    Ok(tool)
}
