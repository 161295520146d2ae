//! Event Sink
//!
//! Typed callbacks the hub fans sensor readings out to.

/// Consumer of arbitrated sensor events.
///
/// All callbacks default to no-ops so a sink only implements what it
/// listens to. They are invoked synchronously from within
/// [`crate::DeviceSensorHub::on_channel_event`], after the hub has released
/// its internal lock, so a sink may call back into the hub.
pub trait SensorEventSink: Send + Sync {
    /// Ambient illuminance in lux
    fn on_light(&self, _illuminance: f64) {}

    /// Orientation angles in degrees: alpha about Z, beta about X,
    /// gamma about Y
    fn on_orientation(&self, _alpha: f64, _beta: f64, _gamma: f64) {}

    /// Gravity-compensated acceleration in m/s^2
    fn on_acceleration(&self, _x: f64, _y: f64, _z: f64) {}

    /// Raw accelerometer reading in m/s^2, gravity included
    fn on_acceleration_including_gravity(&self, _x: f64, _y: f64, _z: f64) {}

    /// Angular velocity in rad/s
    fn on_rotation_rate(&self, _x: f64, _y: f64, _z: f64) {}
}
