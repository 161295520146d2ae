//! Device Orientation Angles
//!
//! Extraction of yaw/pitch/roll from a rotation matrix, following the
//! device orientation event model: alpha about Z, beta about X, gamma
//! about Y, applied in Z-X'-Y'' order.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::rotation::RotationMatrix;

/// Orientation angles in radians.
///
/// alpha is in [0, 2*pi), beta in [-pi, pi], gamma in [-pi/2, pi/2].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Compute orientation angles from a row-major rotation matrix.
///
/// Pure and deterministic; the matrix is trusted to be orthonormal, no
/// validation happens here. The branch on the sign of R[8] (cos beta)
/// keeps beta continuous through the vertical: past 90 degrees of pitch
/// beta moves into (pi/2, pi] instead of folding back. When the device
/// camera points straight up or down, yaw and roll become one degree of
/// freedom; the lock branch solves for yaw and pins gamma to 0.
pub fn compute_orientation_angles(r: &RotationMatrix) -> OrientationAngles {
    let mut alpha;
    let beta;
    let gamma;

    if r[8] > 0.0 {
        alpha = (-r[1]).atan2(r[4]);
        beta = r[7].asin();
        gamma = (-r[6]).atan2(r[8]);
    } else if r[8] < 0.0 {
        alpha = r[1].atan2(-r[4]);
        beta = past_vertical(-r[7].asin());
        gamma = r[6].atan2(-r[8]);
    } else if r[6] > 0.0 {
        alpha = (-r[1]).atan2(r[4]);
        beta = r[7].asin();
        gamma = -FRAC_PI_2;
    } else if r[6] < 0.0 {
        alpha = r[1].atan2(-r[4]);
        beta = past_vertical(-r[7].asin());
        gamma = -FRAC_PI_2;
    } else {
        // Gimbal lock: solve for yaw, pin roll.
        alpha = r[3].atan2(r[0]);
        beta = if r[7] > 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
        gamma = 0.0;
    }

    if alpha < 0.0 {
        alpha += 2.0 * PI;
    }

    OrientationAngles { alpha, beta, gamma }
}

/// Shift a pitch angle into (pi/2, pi] or [-pi, -pi/2).
fn past_vertical(beta: f64) -> f64 {
    if beta >= 0.0 {
        beta - PI
    } else {
        beta + PI
    }
}
