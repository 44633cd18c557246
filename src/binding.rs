use crate::{Accumulator, Diagnostics, Tick, TickCounter};

/// A function callable from block code.
pub trait HostFunction {
    /// The name the function is registered under, `<namespace>.<function>`.
    const NAME: &'static str;

    fn invoke(&mut self) -> u32;
}

/// `timeAndDate.cpuTimeInSeconds`: the whole seconds elapsed since the accumulator was created.
pub struct CpuTimeInSeconds<'a, T: Tick, C: TickCounter<T>, D: Diagnostics> {
    accumulator: &'a mut Accumulator<T, C, D>,
}

impl<'a, T: Tick, C: TickCounter<T>, D: Diagnostics> CpuTimeInSeconds<'a, T, C, D> {
    pub fn new(accumulator: &'a mut Accumulator<T, C, D>) -> Self {
        Self { accumulator }
    }
}

impl<'a, T: Tick, C: TickCounter<T>, D: Diagnostics> HostFunction
    for CpuTimeInSeconds<'a, T, C, D>
{
    const NAME: &'static str = "timeAndDate.cpuTimeInSeconds";

    fn invoke(&mut self) -> u32 {
        self.accumulator.sample_elapsed_seconds()
    }
}
