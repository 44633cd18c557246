#[cfg(feature = "diagnostics")]
mod serial;

#[cfg(feature = "diagnostics")]
pub use self::serial::{
    send_until_accepted, send_until_accepted_async, AsyncDiagnostics, DebugPort, PortBusy,
    RetryPolicy, SendError, SerialDiagnostics, Spin, Yield,
};

/// A tick delta above the configured threshold was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeDelta {
    /// The counter value just sampled.
    pub current: u32,
    /// The baseline the delta was measured from.
    pub last: u32,
    /// The ticks from `last` to `current`, wrapped at the counter period.
    pub delta: u32,
}

/// The diagnostics collaborator of the accumulator.
pub trait Diagnostics {
    /// Report a suspicious delta. Must not fail.
    fn emit(&mut self, event: &LargeDelta);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    #[inline]
    fn emit(&mut self, event: &LargeDelta) {
        (**self).emit(event)
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    #[inline]
    fn emit(&mut self, _event: &LargeDelta) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn emit(&mut self, event: &LargeDelta) {
        log::warn!(
            "Suspicious tick delta {}: current={} last={}",
            event.delta,
            event.current,
            event.last
        );
    }
}

/// Records all events.
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Default)]
pub struct Capture {
    pub events: alloc::vec::Vec<LargeDelta>,
}

#[cfg(any(test, feature = "std"))]
impl Diagnostics for Capture {
    fn emit(&mut self, event: &LargeDelta) {
        self.events.push(*event);
    }
}
