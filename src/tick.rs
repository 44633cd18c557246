pub trait Tick: Send {
    /// The tick frequency, i.e. the number of ticks per second.
    const FREQ: u32;
}

/// A one-megahertz tick, as produced by the microsecond ticker.
#[derive(Debug, Clone, Copy)]
pub struct Micros;

impl Tick for Micros {
    const FREQ: u32 = 1_000_000;
}
