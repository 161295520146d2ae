//! Sensor Registry
//!
//! Boundary to the platform layer that owns the physical sensor driver.

use std::time::Duration;

use crate::channel::ChannelType;

/// External sensor registration capability.
///
/// Calls are synchronous and non-blocking; timeouts, batching and delivery
/// threads are the registry's concern. Registration may fail at any time
/// (hardware absent, driver refused) and the hub never assumes success.
pub trait SensorRegistry: Send + Sync {
    /// Register for a channel at the given sampling-period hint.
    ///
    /// The hint is passed through uninterpreted; the registry is free to
    /// deliver at a different rate. Returns false when the channel cannot
    /// be backed.
    fn register_channel(&self, channel: ChannelType, period_hint: Duration) -> bool;

    /// Unregister from a channel previously registered.
    fn unregister_channel(&self, channel: ChannelType);
}
