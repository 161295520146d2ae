//! Lumen Sensors
//!
//! Device sensor suite arbitration for the Lumen sensor engine.
//!
//! Features:
//! - Motion, orientation and ambient light suites over shared channels
//! - Reference-counted channel registration against an external registry
//! - Orientation strategy fallback (game rotation vector, rotation vector,
//!   accelerometer + magnetometer)
//! - Typed event fan-out to a caller-supplied sink
//!
//! The hub never owns the physical sensor driver; registration goes through
//! the [`SensorRegistry`] trait and readings come back through
//! [`DeviceSensorHub::on_channel_event`].

pub mod channel;
pub mod strategy;
pub mod registry;
pub mod sink;
pub mod hub;

pub use channel::{ChannelType, SensorSuite, MOTION_CHANNELS, LIGHT_CHANNELS};
pub use strategy::{OrientationStrategy, STRATEGY_PREFERENCE};
pub use registry::SensorRegistry;
pub use sink::SensorEventSink;
pub use hub::DeviceSensorHub;
