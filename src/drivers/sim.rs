use core::cell::Cell;

use crate::{Tick, TickCounter};

/// A counter that only moves when told to.
#[derive(Debug, Default)]
pub struct SimCounter(Cell<u32>);

impl SimCounter {
    pub const fn new(value: u32) -> Self {
        Self(Cell::new(value))
    }

    pub fn set(&self, value: u32) {
        self.0.set(value);
    }

    /// Advance the counter by `ticks`, wrapping at 2^32.
    pub fn advance(&self, ticks: u32) {
        self.0.set(self.0.get().wrapping_add(ticks));
    }
}

impl<T: Tick> TickCounter<T> for SimCounter {
    fn value(&self) -> u32 {
        self.0.get()
    }
}
