use std::time::Duration;

use super::types::StreamId;

/// The media subsystem the controller drives.
///
/// Calls are fire-and-forget; outcomes come back asynchronously as
/// [`MediaEvent`](super::MediaEvent)s tagged with the stream they concern.
pub trait MediaElement {
    /// Drop whatever is loaded and start loading `url` as `stream`.
    fn load(&mut self, stream: StreamId, url: &str);
    /// Start or resume output. Restarts from the beginning after the end.
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    /// Live output level, 0.0 - 1.0.
    fn set_volume(&mut self, level: f32);
    /// Stop output and free the loaded stream.
    fn release(&mut self);
}
