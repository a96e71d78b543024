//! Helmet-to-vehicle proximity matching

use crate::bbox::BoundingBox;

/// Decide whether a helmet box sits in the expected head region above a
/// vehicle box.
///
/// Both boxes are normalized before comparison. Image coordinates have
/// y growing downward, so "above" means smaller y: the head region
/// spans the vehicle's horizontal extent and the vehicle-height band
/// above the vehicle's top edge. Vehicle boxes from the detector
/// usually cover the whole bike below the rider, so the rider's head
/// lands in that band. `expanding_factor` widens every bound by that
/// fraction of the vehicle's width or height to absorb detection
/// jitter and perspective distortion.
pub fn is_match(vehicle: &BoundingBox, helmet: &BoundingBox, expanding_factor: f32) -> bool {
    let vehicle = vehicle.normalized();
    let helmet = helmet.normalized();

    let width = vehicle.x2 - vehicle.x1;
    if helmet.x1 < vehicle.x1 - width * expanding_factor
        || helmet.x2 > vehicle.x2 + width * expanding_factor
    {
        return false;
    }

    let height = vehicle.y2 - vehicle.y1;
    if helmet.y1 < vehicle.y1 - height - height * expanding_factor
        || helmet.y2 > vehicle.y1 + height * expanding_factor
    {
        return false;
    }

    true
}
