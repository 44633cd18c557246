//! Elapsed seconds from a wrapping microsecond ticker.
//!
//! The [`Accumulator`] samples a free running 32 bit [`TickCounter`] and adds the
//! wrapped delta since the previous sample to a 64 bit total. Deltas close to a full
//! counter period are reported to an injected [`Diagnostics`] collaborator.
//!
//! The shipped `cpuTimeInSeconds` firmware never added the delta to its total, so it
//! always returned 0. [`Config::new`] restores the accumulation, [`Config::shipped`]
//! reproduces the shipped behaviour.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod accumulator;
pub mod binding;
mod config;
pub mod counter;
mod diag;
pub mod drivers;
mod tick;
mod timespan;

#[cfg(any(test, feature = "std"))]
pub use self::diag::Capture;
#[cfg(feature = "diagnostics")]
pub use self::diag::{
    send_until_accepted, send_until_accepted_async, AsyncDiagnostics, DebugPort, PortBusy,
    RetryPolicy, SendError, SerialDiagnostics, Spin, Yield,
};
pub use self::{
    accumulator::Accumulator,
    config::{Accumulation, Config, SuspiciousPolicy},
    counter::{wrapping_delta, TickCounter},
    diag::{Diagnostics, LargeDelta, LogDiagnostics, NoDiagnostics},
    tick::{Micros, Tick},
    timespan::{TimeSpan, TimeSpanParts},
};
