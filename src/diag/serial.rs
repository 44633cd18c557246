//! The serial debug channel.
//!
//! The port may report itself busy while a previous transfer is still in
//! flight, so every send is retried, yielding to the scheduler in between.

use alloc::{boxed::Box, string::ToString};
use async_trait::async_trait;
use core::{fmt, task::Poll};
use futures::future::poll_fn;

use super::{Diagnostics, LargeDelta};

/// Returned by [`DebugPort::try_send`] when the transport is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBusy;

/// A character oriented debug output.
pub trait DebugPort {
    /// Send `s`, or report that the port is busy. Nothing is sent when busy.
    fn try_send(&mut self, s: &str) -> Result<(), PortBusy>;
}

impl<P: DebugPort + ?Sized> DebugPort for &mut P {
    #[inline]
    fn try_send(&mut self, s: &str) -> Result<(), PortBusy> {
        (**self).try_send(s)
    }
}

/// A zero duration cooperative sleep, letting other tasks run.
pub trait Yield {
    fn yield_now(&mut self);
}

impl<F: FnMut()> Yield for F {
    #[inline]
    fn yield_now(&mut self) {
        self()
    }
}

/// Busy waits. For hosts without a cooperative scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spin;

impl Yield for Spin {
    #[inline]
    fn yield_now(&mut self) {
        core::hint::spin_loop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry until the port accepts.
    Cooperative,
    /// Give up after this many attempts. At least one attempt is always made.
    Bounded(u32),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Cooperative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// The port stayed busy for every attempt allowed by [`RetryPolicy::Bounded`].
    Exhausted { attempts: u32 },
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Exhausted { attempts } => {
                write!(f, "debug port busy after {} attempts", attempts)
            }
        }
    }
}

#[inline]
fn exhausted(policy: RetryPolicy, attempts: u32) -> bool {
    match policy {
        RetryPolicy::Cooperative => false,
        RetryPolicy::Bounded(max) => attempts >= max,
    }
}

/// Send `s`, yielding between attempts while the port is busy.
pub fn send_until_accepted<P, Y>(
    port: &mut P,
    yielder: &mut Y,
    policy: RetryPolicy,
    s: &str,
) -> Result<(), SendError>
where
    P: DebugPort + ?Sized,
    Y: Yield + ?Sized,
{
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match port.try_send(s) {
            Ok(()) => return Ok(()),
            Err(PortBusy) if exhausted(policy, attempts) => {
                return Err(SendError::Exhausted { attempts })
            }
            Err(PortBusy) => yielder.yield_now(),
        }
    }
}

/// Send `s`, returning `Pending` to the executor while the port is busy.
pub async fn send_until_accepted_async<P>(
    port: &mut P,
    policy: RetryPolicy,
    s: &str,
) -> Result<(), SendError>
where
    P: DebugPort + ?Sized,
{
    let mut attempts = 0u32;
    poll_fn(|cx| {
        attempts = attempts.saturating_add(1);
        match port.try_send(s) {
            Ok(()) => Poll::Ready(Ok(())),
            Err(PortBusy) if exhausted(policy, attempts) => {
                Poll::Ready(Err(SendError::Exhausted { attempts }))
            }
            Err(PortBusy) => {
                // Ask to be polled again right away.
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    })
    .await
}

/// Diagnostics written to a [`DebugPort`].
///
/// An event is written as `Oops\nCurrent=<current>\nlast=<last>\n`, one send per piece.
#[derive(Debug)]
pub struct SerialDiagnostics<P: DebugPort, Y: Yield> {
    port: P,
    yielder: Y,
    policy: RetryPolicy,
}

impl<P: DebugPort, Y: Yield> SerialDiagnostics<P, Y> {
    pub fn new(port: P, yielder: Y, policy: RetryPolicy) -> Self {
        Self {
            port,
            yielder,
            policy,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn release(self) -> P {
        self.port
    }

    /// Write `event`, stopping at the first piece that could not be sent.
    pub fn write(&mut self, event: &LargeDelta) -> Result<(), SendError> {
        let current = event.current.to_string();
        let last = event.last.to_string();
        for piece in ["Oops\nCurrent=", current.as_str(), "\nlast=", last.as_str(), "\n"] {
            send_until_accepted(&mut self.port, &mut self.yielder, self.policy, piece)?;
        }
        Ok(())
    }
}

impl<P: DebugPort, Y: Yield> Diagnostics for SerialDiagnostics<P, Y> {
    fn emit(&mut self, event: &LargeDelta) {
        if let Err(err) = self.write(event) {
            log::debug!("Dropped large delta report: {}", err);
        }
    }
}

/// Diagnostics that suspend instead of yielding in place.
#[async_trait]
pub trait AsyncDiagnostics: Send {
    /// Report a suspicious delta. Must not fail.
    async fn emit_async(&mut self, event: &LargeDelta);
}

#[async_trait]
impl<P: DebugPort + Send, Y: Yield + Send> AsyncDiagnostics for SerialDiagnostics<P, Y> {
    async fn emit_async(&mut self, event: &LargeDelta) {
        let current = event.current.to_string();
        let last = event.last.to_string();
        for piece in ["Oops\nCurrent=", current.as_str(), "\nlast=", last.as_str(), "\n"] {
            if let Err(err) = send_until_accepted_async(&mut self.port, self.policy, piece).await {
                log::debug!("Dropped large delta report: {}", err);
                return;
            }
        }
    }
}
