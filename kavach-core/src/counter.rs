//! Greedy rider counting over vehicle and helmet detections

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::matcher::is_match;

/// Default tolerance applied to the helmet search region, as a fraction
/// of the vehicle box's width and height.
pub const DEFAULT_EXPANDING_FACTOR: f32 = 0.30;

/// Aggregate result of pairing helmets to vehicles in one image.
///
/// `count_helmet + count_no_helmet` always equals the number of vehicle
/// boxes that went in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderCounts {
    pub count_helmet: u32,
    pub count_no_helmet: u32,
}

impl RiderCounts {
    pub fn total(&self) -> u32 {
        self.count_helmet + self.count_no_helmet
    }
}

/// Pair helmet boxes to vehicle boxes and count helmeted vs unhelmeted
/// riders.
///
/// For each vehicle, in input order, the first remaining helmet (again
/// in input order) whose box passes [`is_match`] is consumed; a consumed
/// helmet can never be attributed to a second vehicle. Vehicles with no
/// matching helmet count as unhelmeted. Leftover helmets are discarded.
///
/// The pairing is greedy and first-match on purpose: there is no useful
/// distance metric between candidate helmets in this scheme, and the
/// deterministic order-dependent result is part of the contract. Helmet
/// consumption is tracked with a marker vector rather than by removing
/// entries from the list while scanning it.
pub fn count_riders(
    vehicles: &[BoundingBox],
    helmets: &[BoundingBox],
    expanding_factor: f32,
) -> RiderCounts {
    let mut consumed = vec![false; helmets.len()];
    let mut count_helmet = 0u32;
    let mut count_no_helmet = 0u32;

    for vehicle in vehicles {
        let matched = helmets.iter().enumerate().find(|(i, helmet)| {
            !consumed[*i] && is_match(vehicle, helmet, expanding_factor)
        });
        match matched {
            Some((i, _)) => {
                consumed[i] = true;
                count_helmet += 1;
            }
            None => count_no_helmet += 1,
        }
    }

    RiderCounts {
        count_helmet,
        count_no_helmet,
    }
}
