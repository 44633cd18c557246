use crate::Tick;

/// The free running tick counter backing the accumulator.
/// The counter must count up, and wrap from `MAX` to 0.
pub trait TickCounter<T: Tick> {
    /// The maximum counter value.
    const MAX: u32 = u32::MAX;

    /// The counter period.
    const PERIOD: u64 = Self::MAX as u64 + 1;

    /// Get the current counter value.
    fn value(&self) -> u32;
}

impl<T: Tick, C: TickCounter<T> + ?Sized> TickCounter<T> for &C {
    const MAX: u32 = C::MAX;

    #[inline]
    fn value(&self) -> u32 {
        (**self).value()
    }
}

/// The number of ticks from `last` to `current`, modulo the counter period.
///
/// Both values must be in `0..=C::MAX`.
pub fn wrapping_delta<T: Tick, C: TickCounter<T>>(last: u32, current: u32) -> u32 {
    let delta = if current >= last {
        current as u64 - last as u64
    } else {
        // The counter wrapped between the two samples.
        C::PERIOD - last as u64 + current as u64
    };
    (delta % C::PERIOD) as u32
}
