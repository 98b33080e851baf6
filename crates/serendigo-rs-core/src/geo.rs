//! Travel-time and great-circle helpers.
//!
//! One speed table is used everywhere: walking 4.8 km/h, driving 40 km/h.

use serendigo_rs_protocol::TravelMode;

pub const WALK_SPEED_KMH: f64 = 4.8;
pub const DRIVE_SPEED_KMH: f64 = 40.0;
/// Mean Earth radius (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
/// Below this distance the ETA shows meters only.
pub const DISTANCE_ONLY_THRESHOLD_M: u32 = 250;
const RATIO_SCALE: f64 = 1e9;

pub fn speed_kmh(mode: TravelMode) -> f64 {
    match mode {
        TravelMode::Walk => WALK_SPEED_KMH,
        TravelMode::Drive => DRIVE_SPEED_KMH,
    }
}

/// Distance covered in `minutes` at the mode's speed.
pub fn minutes_to_radius_km(minutes: u32, mode: TravelMode) -> f64 {
    speed_kmh(mode) * f64::from(minutes) / 60.0
}

/// Great-circle distance in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Minutes to cover `distance_km`, rounded and never below 1.
///
/// Missing, zero, negative, or non-finite distances yield 1.
pub fn travel_minutes(distance_km: Option<f64>, mode: TravelMode) -> u32 {
    match distance_km {
        Some(distance) if distance.is_finite() && distance > 0.0 => {
            let minutes = (distance / speed_kmh(mode) * 60.0).round();
            if minutes >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                (minutes as u32).max(1)
            }
        }
        _ => 1,
    }
}

/// Share of the time budget a candidate at `distance_km` consumes:
/// `ceil(distance / radius * minutes)`, or the full budget when the radius is
/// degenerate. Never below 1.
///
/// The ratio is snapped to nine decimals before the ceiling, so a candidate
/// sitting on the radius costs exactly the budget.
pub fn proportional_minutes(distance_km: f64, radius_km: f64, minutes: u32) -> u32 {
    if radius_km.is_nan() || radius_km <= 0.0 || !distance_km.is_finite() {
        return minutes.max(1);
    }
    let ratio = distance_km.max(0.0) / radius_km * f64::from(minutes);
    let scaled = ((ratio * RATIO_SCALE).round() / RATIO_SCALE).ceil();
    if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (scaled as u32).max(1)
    }
}

/// Rendering options for [`eta_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaFormat {
    pub distance_only_threshold_m: u32,
    pub force_distance_only: bool,
}

impl Default for EtaFormat {
    fn default() -> Self {
        Self {
            distance_only_threshold_m: DISTANCE_ONLY_THRESHOLD_M,
            force_distance_only: false,
        }
    }
}

/// Human-readable ETA such as `walking ~5min · 400m`.
///
/// Short distances, forced formatting, and an unknown mode render meters only.
pub fn eta_text(distance_km: f64, mode: Option<TravelMode>, format: EtaFormat) -> String {
    let meters = if distance_km.is_finite() {
        (distance_km.max(0.0) * 1000.0).round() as u64
    } else {
        0
    };
    let distance_only = format.force_distance_only
        || meters < u64::from(format.distance_only_threshold_m);
    match mode {
        Some(mode) if !distance_only => {
            let minutes = travel_minutes(Some(distance_km), mode);
            let verb = match mode {
                TravelMode::Walk => "walking",
                TravelMode::Drive => "driving",
            };
            format!("{verb} ~{minutes}min · {meters}m")
        }
        _ => format!("{meters}m"),
    }
}
