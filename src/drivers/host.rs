use std::time::Instant;

use crate::{Micros, TickCounter};

/// A microsecond counter for desktop hosts.
/// The value is truncated to 32 bits, so it wraps like the hardware ticker.
#[derive(Debug, Clone, Copy)]
pub struct HostCounter {
    epoch: Instant,
    offset: u32,
}

impl HostCounter {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Start the counter at `offset` rather than 0, e.g. to exercise a wrap early.
    pub fn with_offset(offset: u32) -> Self {
        Self {
            epoch: Instant::now(),
            offset,
        }
    }
}

impl Default for HostCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter<Micros> for HostCounter {
    fn value(&self) -> u32 {
        let micros = self.epoch.elapsed().as_micros() as u32;
        micros.wrapping_add(self.offset)
    }
}
