//! Device Sensor Hub
//!
//! Reference-counted arbitration of logical sensing suites over a shared,
//! limited set of physical channels, plus typed fan-out of the readings
//! that flow back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lumen_math::{compute_orientation_angles, OrientationAngles, RotationMatrix, Vec3};

use crate::channel::{ChannelType, SensorSuite, LIGHT_CHANNELS, MOTION_CHANNELS};
use crate::registry::SensorRegistry;
use crate::sink::SensorEventSink;
use crate::strategy::{OrientationStrategy, STRATEGY_PREFERENCE};

/// Arbitrates suite start/stop requests over shared physical channels.
///
/// Starting a suite acquires its channels against the external registry,
/// reference-counted so that suites sharing a channel register it once.
/// The orientation suite resolves which channel combination backs it at
/// start time, probing [`STRATEGY_PREFERENCE`] top-down and taking the
/// first combination that registers completely.
///
/// All mutable state lives behind one mutex, so start/stop from a control
/// thread and in-flight event delivery never observe half-updated counts
/// or a strategy mid-transition. Sink callbacks are dispatched after the
/// lock is released.
pub struct DeviceSensorHub {
    registry: Arc<dyn SensorRegistry>,
    sink: Arc<dyn SensorEventSink>,
    state: Mutex<HubState>,
}

#[derive(Default)]
struct HubState {
    /// Channel -> outstanding holds. Registered with the registry iff > 0.
    counts: HashMap<ChannelType, u32>,
    /// Outstanding starts per suite; events are gated on these.
    motion_starts: u32,
    orientation_starts: u32,
    light_starts: u32,
    strategy: OrientationStrategy,
    /// Latest readings buffered for the accelerometer + magnetometer strategy.
    gravity: Option<Vec3>,
    magnetic: Option<Vec3>,
}

/// A sink call decided under the lock, delivered after it is released.
enum Dispatch {
    Light(f64),
    Orientation(OrientationAngles),
    Acceleration(Vec3),
    AccelerationIncludingGravity(Vec3),
    RotationRate(Vec3),
}

impl DeviceSensorHub {
    pub fn new(registry: Arc<dyn SensorRegistry>, sink: Arc<dyn SensorEventSink>) -> Self {
        Self {
            registry,
            sink,
            state: Mutex::new(HubState::default()),
        }
    }

    /// Start a suite with a sampling-period hint.
    ///
    /// Returns true iff the suite ended up backed by hardware: the full
    /// fixed set for motion and light, a resolved strategy for
    /// orientation. A failed start leaves no net registration behind.
    /// Starting an already-active suite is additive: every start holds the
    /// suite's channels once more and must be balanced by its own stop.
    pub fn start(&self, suite: SensorSuite, period_hint: Duration) -> bool {
        let mut state = self.state.lock().unwrap();
        match suite {
            SensorSuite::Motion => {
                if !self.acquire_channels(&mut state, MOTION_CHANNELS, period_hint) {
                    return false;
                }
                state.motion_starts += 1;
                true
            }
            SensorSuite::Light => {
                if !self.acquire_channels(&mut state, LIGHT_CHANNELS, period_hint) {
                    return false;
                }
                state.light_starts += 1;
                true
            }
            SensorSuite::Orientation => self.start_orientation(&mut state, period_hint),
        }
    }

    /// Stop a suite, releasing one hold on each channel of its currently
    /// resolved set. A channel whose count reaches zero is unregistered
    /// exactly once. Stopping a suite with no outstanding start is a no-op.
    pub fn stop(&self, suite: SensorSuite) {
        let mut state = self.state.lock().unwrap();
        match suite {
            SensorSuite::Motion => {
                if state.motion_starts == 0 {
                    return;
                }
                state.motion_starts -= 1;
                self.release_channels(&mut state, MOTION_CHANNELS);
            }
            SensorSuite::Light => {
                if state.light_starts == 0 {
                    return;
                }
                state.light_starts -= 1;
                self.release_channels(&mut state, LIGHT_CHANNELS);
            }
            SensorSuite::Orientation => {
                if state.orientation_starts == 0 {
                    return;
                }
                state.orientation_starts -= 1;
                let channels = state.strategy.channels();
                self.release_channels(&mut state, channels);
                if state.orientation_starts == 0 {
                    tracing::debug!("orientation suite stopped: {:?}", state.strategy);
                    state.strategy = OrientationStrategy::Unavailable;
                    state.gravity = None;
                    state.magnetic = None;
                }
            }
        }
    }

    /// Deliver one raw reading from the external registry.
    ///
    /// Readings for channels that do not currently back an active suite
    /// are dropped silently. A single reading can fan out to more than one
    /// callback when suites share the channel.
    pub fn on_channel_event(&self, channel: ChannelType, values: &[f64]) {
        let mut dispatches: Vec<Dispatch> = Vec::new();
        {
            let mut state = self.state.lock().unwrap();
            match channel {
                ChannelType::AmbientLight => {
                    if state.light_starts > 0 {
                        if let Some(&lux) = values.first() {
                            dispatches.push(Dispatch::Light(lux));
                        }
                    }
                }
                ChannelType::Accelerometer => {
                    if let Some(reading) = read_vec3(values) {
                        if state.motion_starts > 0 {
                            dispatches.push(Dispatch::AccelerationIncludingGravity(reading));
                        }
                        if state.orientation_starts > 0
                            && state.strategy == OrientationStrategy::AccelerometerMagnetometer
                        {
                            state.gravity = Some(reading);
                            if let Some(angles) = derive_buffered_orientation(&state) {
                                dispatches.push(Dispatch::Orientation(angles));
                            }
                        }
                    }
                }
                ChannelType::LinearAcceleration => {
                    if state.motion_starts > 0 {
                        if let Some(reading) = read_vec3(values) {
                            dispatches.push(Dispatch::Acceleration(reading));
                        }
                    }
                }
                ChannelType::Gyroscope => {
                    if state.motion_starts > 0 {
                        if let Some(reading) = read_vec3(values) {
                            dispatches.push(Dispatch::RotationRate(reading));
                        }
                    }
                }
                ChannelType::Magnetometer => {
                    if state.orientation_starts > 0
                        && state.strategy == OrientationStrategy::AccelerometerMagnetometer
                    {
                        if let Some(reading) = read_vec3(values) {
                            state.magnetic = Some(reading);
                            if let Some(angles) = derive_buffered_orientation(&state) {
                                dispatches.push(Dispatch::Orientation(angles));
                            }
                        }
                    }
                }
                ChannelType::RotationVector | ChannelType::GameRotationVector => {
                    // Only the vector channel the resolved strategy selected
                    // drives orientation; the other one is dropped.
                    let resolved = match state.strategy {
                        OrientationStrategy::RotationVector => {
                            channel == ChannelType::RotationVector
                        }
                        OrientationStrategy::GameRotationVector => {
                            channel == ChannelType::GameRotationVector
                        }
                        _ => false,
                    };
                    if state.orientation_starts > 0 && resolved {
                        if let Some(matrix) = RotationMatrix::from_rotation_vector(values) {
                            dispatches.push(Dispatch::Orientation(compute_orientation_angles(
                                &matrix,
                            )));
                        }
                    }
                }
            }
        }

        for dispatch in dispatches {
            match dispatch {
                Dispatch::Light(lux) => self.sink.on_light(lux),
                Dispatch::Orientation(angles) => self.sink.on_orientation(
                    angles.alpha.to_degrees(),
                    angles.beta.to_degrees(),
                    angles.gamma.to_degrees(),
                ),
                Dispatch::Acceleration(v) => self.sink.on_acceleration(v.x, v.y, v.z),
                Dispatch::AccelerationIncludingGravity(v) => {
                    self.sink.on_acceleration_including_gravity(v.x, v.y, v.z)
                }
                Dispatch::RotationRate(v) => self.sink.on_rotation_rate(v.x, v.y, v.z),
            }
        }
    }

    /// Strategy currently backing the orientation suite;
    /// [`OrientationStrategy::Unavailable`] while the suite is inactive.
    pub fn resolved_orientation_strategy(&self) -> OrientationStrategy {
        self.state.lock().unwrap().strategy
    }

    /// Number of channels currently registered with the external registry.
    pub fn active_channel_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.counts.values().filter(|&&count| count > 0).count()
    }

    /// Number of motion channels currently held by the motion suite.
    pub fn active_motion_channel_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        if state.motion_starts == 0 {
            return 0;
        }
        MOTION_CHANNELS
            .iter()
            .filter(|&channel| state.counts.get(channel).copied().unwrap_or(0) > 0)
            .count()
    }

    fn start_orientation(&self, state: &mut HubState, period_hint: Duration) -> bool {
        // Already resolved: take one more hold on the same strategy, the
        // selection never changes without an explicit stop.
        if state.orientation_starts > 0 {
            let channels = state.strategy.channels();
            if !self.acquire_channels(state, channels, period_hint) {
                return false;
            }
            state.orientation_starts += 1;
            return true;
        }

        for (strategy, channels) in STRATEGY_PREFERENCE {
            if self.acquire_channels(state, channels, period_hint) {
                tracing::debug!("orientation strategy resolved: {:?}", strategy);
                state.strategy = *strategy;
                state.orientation_starts = 1;
                return true;
            }
        }

        tracing::warn!("no orientation strategy available");
        state.strategy = OrientationStrategy::Unavailable;
        false
    }

    /// Take one hold on every channel in `channels`, registering those not
    /// yet held. All-or-nothing: if any registration fails, the holds taken
    /// by this call are released again and the previous state is restored.
    fn acquire_channels(
        &self,
        state: &mut HubState,
        channels: &[ChannelType],
        period_hint: Duration,
    ) -> bool {
        for (index, &channel) in channels.iter().enumerate() {
            let held = state.counts.get(&channel).copied().unwrap_or(0);
            if held > 0 {
                state.counts.insert(channel, held + 1);
                continue;
            }
            if self.registry.register_channel(channel, period_hint) {
                tracing::debug!("channel registered: {:?}", channel);
                state.counts.insert(channel, 1);
            } else {
                self.release_channels(state, &channels[..index]);
                return false;
            }
        }
        true
    }

    /// Release one hold on every channel in `channels`, unregistering those
    /// whose count reaches zero. Counts never go below zero.
    fn release_channels(&self, state: &mut HubState, channels: &[ChannelType]) {
        for channel in channels {
            let Some(count) = state.counts.get_mut(channel) else {
                continue;
            };
            if *count == 0 {
                continue;
            }
            *count -= 1;
            if *count == 0 {
                state.counts.remove(channel);
                self.registry.unregister_channel(*channel);
                tracing::debug!("channel unregistered: {:?}", channel);
            }
        }
    }
}

fn read_vec3(values: &[f64]) -> Option<Vec3> {
    if values.len() < 3 {
        return None;
    }
    Some(Vec3::new(values[0], values[1], values[2]))
}

/// Derive orientation angles from the buffered accelerometer and
/// magnetometer readings. Degenerate geometry (free fall, field parallel
/// to gravity) skips the event rather than reporting garbage.
fn derive_buffered_orientation(state: &HubState) -> Option<OrientationAngles> {
    let gravity = state.gravity?;
    let magnetic = state.magnetic?;
    let matrix = RotationMatrix::from_gravity_magnetic(gravity, magnetic).ok()?;
    Some(compute_orientation_angles(&matrix))
}
