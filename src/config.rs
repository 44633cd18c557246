/// Whether measured deltas are added to the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Add every delta to the total. The total is a real elapsed time clock.
    Enabled,
    /// Never add to the total, as the shipped `cpuTimeInSeconds` firmware
    /// does. Every sample returns 0.
    Shipped,
}

/// What to do with a delta above [`Config::suspicious_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspiciousPolicy {
    /// Report it and add it to the total anyway.
    Accept,
    /// Report it and leave the total as is.
    /// The tick is still adopted as the new baseline.
    Skip,
}

/// Accumulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub accumulation: Accumulation,
    /// Deltas strictly above this value are reported as suspicious.
    pub suspicious_delta: u32,
    pub on_suspicious: SuspiciousPolicy,
}

impl Config {
    /// The delta threshold used by the firmware, just under one second short of a full 32 bit period.
    pub const SUSPICIOUS_DELTA: u32 = 4_294_000_000;

    pub const fn new() -> Self {
        Self {
            accumulation: Accumulation::Enabled,
            suspicious_delta: Self::SUSPICIOUS_DELTA,
            on_suspicious: SuspiciousPolicy::Accept,
        }
    }

    /// The configuration reproducing the shipped firmware bit for bit.
    pub const fn shipped() -> Self {
        Self::new().accumulation(Accumulation::Shipped)
    }

    pub const fn accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub const fn suspicious_delta(mut self, suspicious_delta: u32) -> Self {
        self.suspicious_delta = suspicious_delta;
        self
    }

    pub const fn on_suspicious(mut self, on_suspicious: SuspiciousPolicy) -> Self {
        self.on_suspicious = on_suspicious;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
