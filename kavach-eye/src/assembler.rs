//! Detection result assembly

use crate::config::DetectionConfig;
use crate::detector::Detection;
use kavach_core::BoundingBox;

/// Reduce the two raw detection streams to the box lists the counter
/// consumes.
///
/// Vehicle detections survive only if their label equals the configured
/// vehicle class; helmet detections only if their label equals the
/// positive helmet class. A model that emits a negative "no helmet"
/// label gets that label dropped here, not treated as evidence of
/// absence. Coordinates pass through as emitted; the matcher owns
/// normalization.
pub fn assemble(
    vehicle_detections: &[Detection],
    helmet_detections: &[Detection],
    config: &DetectionConfig,
) -> (Vec<BoundingBox>, Vec<BoundingBox>) {
    let vehicles = vehicle_detections
        .iter()
        .filter(|d| d.label == config.vehicle_class)
        .map(|d| d.bbox)
        .collect();
    let helmets = helmet_detections
        .iter()
        .filter(|d| d.label == config.helmet_class)
        .map(|d| d.bbox)
        .collect();
    (vehicles, helmets)
}
