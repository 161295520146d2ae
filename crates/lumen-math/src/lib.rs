//! Lumen Math
//!
//! 3D rotation math for the Lumen sensor engine.
//!
//! Features:
//! - Rotation matrix derivation from gravity and magnetic field readings
//! - Rotation vector (quaternion) to matrix conversion
//! - Device orientation angle extraction with gimbal lock handling

pub mod vector;
pub mod rotation;
pub mod orientation;

pub use vector::Vec3;
pub use rotation::{RotationMatrix, RotationError};
pub use orientation::{OrientationAngles, compute_orientation_angles};
