use core::{
    fmt::Debug,
    marker::PhantomData,
    ops::{Add, Sub},
};

use crate::Tick;

/// A span of time measured in ticks of `T`.
pub struct TimeSpan<T: Tick>(u64, PhantomData<T>);

impl<T: Tick> Copy for TimeSpan<T> {}

impl<T: Tick> Clone for TimeSpan<T> {
    fn clone(&self) -> Self {
        *self
    }
}

#[derive(Debug, PartialEq)]
pub struct TimeSpanParts {
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub milliseconds: u16,
}

impl<T: Tick> TimeSpan<T> {
    pub const ZERO: Self = Self(0, PhantomData);
    const TICKS_PER_SECOND: u64 = T::FREQ as u64;
    const TICKS_PER_MINUTE: u64 = Self::TICKS_PER_SECOND * 60;
    const TICKS_PER_HOUR: u64 = Self::TICKS_PER_MINUTE * 60;
    const TICKS_PER_DAY: u64 = Self::TICKS_PER_HOUR * 24;

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks, PhantomData)
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self::from_ticks(seconds as u64 * Self::TICKS_PER_SECOND)
    }

    pub const fn from_milliseconds(milliseconds: u64) -> Self {
        let seconds = milliseconds / 1000;
        let sub_seconds = milliseconds % 1000;
        // Saturates at `u64::MAX` ticks.
        Self::from_ticks(
            seconds
                .saturating_mul(Self::TICKS_PER_SECOND)
                .saturating_add((sub_seconds * Self::TICKS_PER_SECOND) / 1000),
        )
    }

    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// The number of whole seconds, truncated.
    /// Saturates at `u32::MAX` which is more than 136 years.
    pub fn total_seconds(&self) -> u32 {
        let seconds = self.0 / Self::TICKS_PER_SECOND;
        if seconds > u32::MAX as u64 {
            u32::MAX
        } else {
            seconds as u32
        }
    }

    /// The number of whole milliseconds, truncated. Saturates at `u64::MAX`.
    pub fn total_milliseconds(&self) -> u64 {
        let seconds = self.0 / Self::TICKS_PER_SECOND;
        let sub_seconds = self.0 % Self::TICKS_PER_SECOND;
        seconds
            .saturating_mul(1000)
            .saturating_add((sub_seconds * 1000) / Self::TICKS_PER_SECOND)
    }

    pub fn parts(&self) -> TimeSpanParts {
        let mut ticks = self.0;

        let days = ticks / Self::TICKS_PER_DAY;
        ticks -= days * Self::TICKS_PER_DAY;

        let hours = ticks / Self::TICKS_PER_HOUR;
        ticks -= hours * Self::TICKS_PER_HOUR;

        let minutes = ticks / Self::TICKS_PER_MINUTE;
        ticks -= minutes * Self::TICKS_PER_MINUTE;

        let seconds = ticks / Self::TICKS_PER_SECOND;
        ticks -= seconds * Self::TICKS_PER_SECOND;

        TimeSpanParts {
            days: if days > u32::MAX as u64 {
                u32::MAX
            } else {
                days as u32
            },
            hours: hours as u8,
            minutes: minutes as u8,
            seconds: seconds as u8,
            milliseconds: ((ticks * 1000) / Self::TICKS_PER_SECOND) as u16,
        }
    }
}

impl<T: Tick> Default for TimeSpan<T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T: Tick> From<TimeSpan<T>> for u64 {
    fn from(span: TimeSpan<T>) -> u64 {
        span.0
    }
}

impl<T: Tick> PartialEq for TimeSpan<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Tick> Eq for TimeSpan<T> {}

impl<T: Tick> PartialOrd for TimeSpan<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Tick> Ord for TimeSpan<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: Tick> Add for TimeSpan<T> {
    type Output = TimeSpan<T>;

    fn add(self, rhs: Self) -> Self::Output {
        TimeSpan::from_ticks(self.0.saturating_add(rhs.0))
    }
}

impl<T: Tick> Sub for TimeSpan<T> {
    type Output = TimeSpan<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeSpan::from_ticks(self.0.saturating_sub(rhs.0))
    }
}

impl<T: Tick> Debug for TimeSpan<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let parts = self.parts();
        write!(
            f,
            "{}d{:02}:{:02}:{:02}.{:03}",
            parts.days, parts.hours, parts.minutes, parts.seconds, parts.milliseconds
        )
    }
}
