//! Rotation Matrix
//!
//! 3x3 device attitude matrix derived from sensor readings.

use crate::vector::Vec3;

/// Gravity vectors shorter than this are treated as free fall (squared, ~1% of g^2).
const FREE_FALL_GRAVITY_SQUARED: f64 = 0.01 * 9.81 * 9.81;

/// Minimum length of the horizontal (east) axis before the field geometry
/// is considered degenerate.
const MIN_HORIZONTAL_NORM: f64 = 0.1;

/// Rotation matrix derivation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    #[error("gravity vector too short, device close to free fall")]
    FreeFall,

    #[error("magnetic field parallel to gravity")]
    DegenerateField,
}

/// Row-major 3x3 rotation matrix expressing device attitude relative to the
/// Earth frame. Element (row, col) is at index `3 * row + col`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [f64; 9]);

impl RotationMatrix {
    /// Identity rotation
    pub fn identity() -> Self {
        Self([
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ])
    }

    /// Derive the rotation matrix from a gravity vector and a magnetic field
    /// vector, both in the device frame.
    ///
    /// The rows of the result are the device-frame directions of east
    /// (field x gravity), magnetic north and up, so the matrix maps device
    /// coordinates onto the Earth frame. Fails when the device is close to
    /// free fall or the field has no usable horizontal component.
    pub fn from_gravity_magnetic(gravity: Vec3, magnetic: Vec3) -> Result<Self, RotationError> {
        let gravity_squared = gravity.length_squared();
        if gravity_squared < FREE_FALL_GRAVITY_SQUARED {
            return Err(RotationError::FreeFall);
        }

        let h = magnetic.cross(&gravity);
        let h_norm = h.length();
        if h_norm < MIN_HORIZONTAL_NORM {
            return Err(RotationError::DegenerateField);
        }

        let h = h.scaled(1.0 / h_norm);
        let a = gravity.scaled(1.0 / gravity_squared.sqrt());
        let m = a.cross(&h);

        Ok(Self([
            h.x, h.y, h.z,
            m.x, m.y, m.z,
            a.x, a.y, a.z,
        ]))
    }

    /// Derive the rotation matrix from a rotation vector as delivered by a
    /// rotation-vector style sensor: the vector part of a unit quaternion,
    /// optionally followed by the scalar part.
    ///
    /// When the scalar component is absent it is reconstructed from the unit
    /// norm. Components past the fourth (some sensors append a heading
    /// accuracy estimate) are ignored. Returns `None` for fewer than three
    /// components.
    pub fn from_rotation_vector(v: &[f64]) -> Option<Self> {
        if v.len() < 3 {
            return None;
        }

        let q1 = v[0];
        let q2 = v[1];
        let q3 = v[2];
        let q0 = if v.len() >= 4 {
            v[3]
        } else {
            let w_squared = 1.0 - q1 * q1 - q2 * q2 - q3 * q3;
            if w_squared > 0.0 { w_squared.sqrt() } else { 0.0 }
        };

        let sq_q1 = 2.0 * q1 * q1;
        let sq_q2 = 2.0 * q2 * q2;
        let sq_q3 = 2.0 * q3 * q3;
        let q1_q2 = 2.0 * q1 * q2;
        let q3_q0 = 2.0 * q3 * q0;
        let q1_q3 = 2.0 * q1 * q3;
        let q2_q0 = 2.0 * q2 * q0;
        let q2_q3 = 2.0 * q2 * q3;
        let q1_q0 = 2.0 * q1 * q0;

        Some(Self([
            1.0 - sq_q2 - sq_q3, q1_q2 - q3_q0,       q1_q3 + q2_q0,
            q1_q2 + q3_q0,       1.0 - sq_q1 - sq_q3, q2_q3 - q1_q0,
            q1_q3 - q2_q0,       q2_q3 + q1_q0,       1.0 - sq_q1 - sq_q2,
        ]))
    }
}

impl std::ops::Index<usize> for RotationMatrix {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}
