use core::marker::PhantomData;

use crate::{
    counter::wrapping_delta, Accumulation, Config, Diagnostics, LargeDelta, SuspiciousPolicy,
    Tick, TickCounter, TimeSpan,
};

/// Elapsed time accumulated from a wrapping tick counter.
///
/// The counter must be sampled at least once per counter period, otherwise whole
/// periods are lost.
pub struct Accumulator<T: Tick, C: TickCounter<T>, D: Diagnostics> {
    tick: PhantomData<T>,
    counter: C,
    diagnostics: D,
    config: Config,
    /// The last sampled counter value.
    last_tick: u32,
    /// The accumulated number of ticks.
    total: u64,
}

impl<T, C, D> Accumulator<T, C, D>
where
    T: Tick,
    C: TickCounter<T>,
    D: Diagnostics,
{
    /// Create an accumulator with a zero baseline,
    /// so the first sample counts the ticks since the counter itself was started.
    pub fn new(counter: C, diagnostics: D, config: Config) -> Self {
        Self {
            tick: PhantomData,
            counter,
            diagnostics,
            config,
            last_tick: 0,
            total: 0,
        }
    }

    /// Create an accumulator measuring from the current counter value.
    pub fn start(counter: C, diagnostics: D, config: Config) -> Self {
        let mut accumulator = Self::new(counter, diagnostics, config);
        accumulator.last_tick = accumulator.counter.value();
        accumulator
    }

    /// Sample the counter and get the whole seconds elapsed.
    pub fn sample_elapsed_seconds(&mut self) -> u32 {
        self.sample().total_seconds()
    }

    /// Sample the counter and get the elapsed time.
    pub fn sample(&mut self) -> TimeSpan<T> {
        if let Some(event) = self.advance() {
            self.diagnostics.emit(&event);
        }
        self.elapsed()
    }

    /// The elapsed time as of the last sample.
    pub fn elapsed(&self) -> TimeSpan<T> {
        TimeSpan::from_ticks(self.total)
    }

    pub fn last_tick(&self) -> u32 {
        self.last_tick
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Take in a new counter value, returning the event to report if the delta is suspicious.
    fn advance(&mut self) -> Option<LargeDelta> {
        let current = self.counter.value();
        let last = self.last_tick;
        let delta = wrapping_delta::<T, C>(last, current);

        // The new value is the baseline no matter what the delta looks like.
        self.last_tick = current;

        let suspicious = delta > self.config.suspicious_delta;
        let add = match (self.config.accumulation, self.config.on_suspicious) {
            (Accumulation::Shipped, _) => false,
            (Accumulation::Enabled, SuspiciousPolicy::Skip) => !suspicious,
            (Accumulation::Enabled, SuspiciousPolicy::Accept) => true,
        };
        if add {
            self.total = self.total.saturating_add(delta as u64);
        }

        log::trace!(
            "Tick sample current={} delta={} total={}",
            current,
            delta,
            self.total
        );

        if suspicious {
            Some(LargeDelta {
                current,
                last,
                delta,
            })
        } else {
            None
        }
    }
}

#[cfg(feature = "diagnostics")]
impl<T, C, D> Accumulator<T, C, D>
where
    T: Tick,
    C: TickCounter<T>,
    D: Diagnostics + crate::AsyncDiagnostics,
{
    /// Sample the counter, awaiting the report of a suspicious delta.
    pub async fn sample_async(&mut self) -> TimeSpan<T> {
        if let Some(event) = self.advance() {
            self.diagnostics.emit_async(&event).await;
        }
        self.elapsed()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{drivers::sim::SimCounter, Capture, Micros, NoDiagnostics};

    fn accumulator(config: Config) -> Accumulator<Micros, &'static SimCounter, Capture> {
        let counter: &'static SimCounter = Box::leak(Box::new(SimCounter::new(0)));
        Accumulator::new(counter, Capture::default(), config)
    }

    #[test]
    fn increasing_ticks() {
        let mut acc = accumulator(Config::new());
        let counter = acc.counter;

        let mut last_seconds = 0;
        for tick in (0..30).map(|i| 250_000 * i + i * i) {
            counter.set(tick);
            let seconds = acc.sample_elapsed_seconds();
            assert!(seconds >= last_seconds);
            last_seconds = seconds;
        }
        let last_tick = 250_000 * 29 + 29 * 29;
        assert_eq!(last_tick / 1_000_000, last_seconds);
        assert_eq!(last_tick as u64, acc.elapsed().ticks());
        assert!(acc.diagnostics().events.is_empty());
    }

    #[test]
    fn wraparound_delta() {
        let mut acc = accumulator(Config::new());
        let counter = acc.counter;

        counter.set(4294967200);
        acc.sample();
        let before = acc.elapsed().ticks();

        counter.set(100);
        acc.sample();
        assert_eq!(196, acc.elapsed().ticks() - before);
        assert_eq!(100, acc.last_tick());
    }

    #[test]
    fn same_tick_twice() {
        let mut acc = accumulator(Config::new());
        acc.counter.set(3_500_000);

        let first = acc.sample_elapsed_seconds();
        let total = acc.elapsed();
        let second = acc.sample_elapsed_seconds();
        assert_eq!(3, first);
        assert_eq!(first, second);
        assert_eq!(total, acc.elapsed());
    }

    #[test]
    fn large_delta_is_reported() {
        let mut acc = accumulator(Config::new());
        let counter = acc.counter;

        counter.set(10);
        acc.sample();
        counter.set(10u32.wrapping_add(4294000001));
        let seconds = acc.sample_elapsed_seconds();

        assert_eq!(
            vec![LargeDelta {
                current: 4294000011,
                last: 10,
                delta: 4294000001,
            }],
            acc.diagnostics().events
        );
        assert_eq!(4294000011, acc.last_tick());
        assert_eq!(4294, seconds);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut acc = accumulator(Config::new());
        acc.counter.set(Config::SUSPICIOUS_DELTA);
        acc.sample();
        assert!(acc.diagnostics().events.is_empty());
    }

    #[test]
    fn narrow_counter_reports_its_own_delta() {
        use core::cell::Cell;

        struct SysTick(Cell<u32>);

        impl TickCounter<Micros> for SysTick {
            const MAX: u32 = 0xFFFFFF;

            fn value(&self) -> u32 {
                self.0.get()
            }
        }

        let counter = SysTick(Cell::new(0xFFFFF0));
        let config = Config::new().suspicious_delta(0x10);
        let mut acc = Accumulator::<Micros, _, _>::start(&counter, Capture::default(), config);

        counter.0.set(1);
        acc.sample();

        assert_eq!(0x11, acc.elapsed().ticks());
        assert_eq!(
            vec![LargeDelta {
                current: 1,
                last: 0xFFFFF0,
                delta: 0x11,
            }],
            acc.diagnostics().events
        );
    }

    #[test]
    fn default_config() {
        let acc = accumulator(Config::default());
        assert_eq!(&Config::new(), acc.config());
        assert_eq!(Accumulation::Enabled, acc.config().accumulation);
        assert_eq!(Config::SUSPICIOUS_DELTA, acc.config().suspicious_delta);
        assert_eq!(SuspiciousPolicy::Accept, acc.config().on_suspicious);
        assert_eq!(
            Accumulation::Shipped,
            accumulator(Config::shipped()).config().accumulation
        );
    }

    #[test]
    fn large_delta_skipped() {
        let mut acc = accumulator(Config::new().on_suspicious(SuspiciousPolicy::Skip));
        let counter = acc.counter;

        counter.set(2_000_000);
        acc.sample();
        counter.set(1_999_999);
        let seconds = acc.sample_elapsed_seconds();

        assert_eq!(2, seconds);
        assert_eq!(1, acc.diagnostics().events.len());
        assert_eq!(1_999_999, acc.last_tick());

        counter.set(3_999_999);
        assert_eq!(4, acc.sample_elapsed_seconds());
    }

    #[test]
    fn one_second_delta() {
        let mut acc = accumulator(Config::new());
        let counter = acc.counter;

        counter.set(123_456);
        let before = acc.sample_elapsed_seconds();
        counter.set(1_123_456);
        assert_eq!(before + 1, acc.sample_elapsed_seconds());
    }

    #[test]
    fn shipped_always_zero() {
        let mut acc = accumulator(Config::shipped());
        let counter = acc.counter;

        for tick in [0, 1_000_000, 5_000_000, u32::MAX, 7, 4_000_000_000] {
            counter.set(tick);
            assert_eq!(0, acc.sample_elapsed_seconds());
            assert_eq!(tick, acc.last_tick());
        }
        assert_eq!(TimeSpan::ZERO, acc.elapsed());
    }

    #[test]
    fn shipped_still_reports() {
        let mut acc = accumulator(Config::shipped());
        acc.counter.set(u32::MAX);
        acc.sample();
        assert_eq!(1, acc.diagnostics().events.len());
    }

    #[test]
    fn start_adopts_baseline() {
        let counter = SimCounter::new(4_000_000_000);
        let mut acc = Accumulator::<Micros, _, _>::start(&counter, NoDiagnostics, Config::new());
        assert_eq!(0, acc.sample_elapsed_seconds());

        counter.set(4_000_000_000u32.wrapping_add(61_000_000));
        assert_eq!(61, acc.sample_elapsed_seconds());
    }

    #[test]
    fn many_periods() {
        let counter = SimCounter::new(0);
        let mut acc = Accumulator::<Micros, _, _>::new(&counter, NoDiagnostics, Config::new());

        // Four samples per period for ten periods.
        let step = 1u32 << 30;
        for i in 1..=40u32 {
            counter.set(i.wrapping_mul(step));
            acc.sample();
        }
        assert_eq!(10 * (1u64 << 32), acc.elapsed().ticks());
        assert_eq!(42949, acc.sample_elapsed_seconds());
    }

    #[cfg(feature = "diagnostics")]
    #[futures_await_test::async_test]
    async fn sample_async_reports() {
        use crate::{DebugPort, PortBusy, RetryPolicy, SerialDiagnostics, Spin};

        #[derive(Default)]
        struct Port(alloc::string::String);

        impl DebugPort for Port {
            fn try_send(&mut self, s: &str) -> Result<(), PortBusy> {
                self.0.push_str(s);
                Ok(())
            }
        }

        let counter = SimCounter::new(0);
        let diag = SerialDiagnostics::new(Port::default(), Spin, RetryPolicy::Cooperative);
        let mut acc = Accumulator::<Micros, _, _>::new(&counter, diag, Config::new());

        counter.set(u32::MAX);
        let elapsed = acc.sample_async().await;
        assert_eq!(u32::MAX as u64, elapsed.ticks());
        assert_eq!("Oops\nCurrent=4294967295\nlast=0\n", acc.diagnostics().port().0);
    }
}
