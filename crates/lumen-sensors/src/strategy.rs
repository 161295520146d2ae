//! Orientation Strategies
//!
//! Alternative physical-channel combinations that can back the orientation
//! suite, in fixed preference order.

use crate::channel::ChannelType;

/// The channel combination chosen to satisfy an orientation request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrientationStrategy {
    /// Gyroscope-fused rotation vector, no magnetometer drift
    GameRotationVector,
    /// Magnetometer-referenced rotation vector
    RotationVector,
    /// Raw accelerometer + magnetometer pair, matrix derived per event
    AccelerometerMagnetometer,
    /// No usable hardware; the suite registers nothing
    #[default]
    Unavailable,
}

/// Strategies in the order they are probed at orientation start. The first
/// strategy whose full channel set registers wins.
pub const STRATEGY_PREFERENCE: &[(OrientationStrategy, &[ChannelType])] = &[
    (
        OrientationStrategy::GameRotationVector,
        &[ChannelType::GameRotationVector],
    ),
    (
        OrientationStrategy::RotationVector,
        &[ChannelType::RotationVector],
    ),
    (
        OrientationStrategy::AccelerometerMagnetometer,
        &[ChannelType::Accelerometer, ChannelType::Magnetometer],
    ),
];

impl OrientationStrategy {
    /// Channels this strategy holds while resolved
    pub fn channels(&self) -> &'static [ChannelType] {
        STRATEGY_PREFERENCE
            .iter()
            .find(|(strategy, _)| strategy == self)
            .map(|(_, channels)| *channels)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        let order: Vec<_> = STRATEGY_PREFERENCE.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            order,
            vec![
                OrientationStrategy::GameRotationVector,
                OrientationStrategy::RotationVector,
                OrientationStrategy::AccelerometerMagnetometer,
            ]
        );
    }

    #[test]
    fn test_strategy_channels() {
        assert_eq!(
            OrientationStrategy::GameRotationVector.channels(),
            &[ChannelType::GameRotationVector]
        );
        assert_eq!(
            OrientationStrategy::AccelerometerMagnetometer.channels(),
            &[ChannelType::Accelerometer, ChannelType::Magnetometer]
        );
        assert!(OrientationStrategy::Unavailable.channels().is_empty());
    }
}
