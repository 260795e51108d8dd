// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! Every timestamp an event carries comes from an injected [`Clock`], never
//! from a process-global `SystemTime::now()` call scattered through the
//! core — this is what lets tests pin deterministic times.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A clock that provides the current time as an RFC-3339 string with
/// millisecond precision, monotonic within a single process.
pub trait Clock: Send + Sync {
    /// Returns `now` formatted as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    ///
    /// Real clocks must guarantee monotonicity within one command: if the OS
    /// clock has not advanced since the previous call, the implementation
    /// returns `previous + 1ms` instead of repeating it.
    fn now_rfc3339_ms(&self) -> String;
}

/// Real system clock, monotonic via a remembered last-issued timestamp.
#[derive(Default)]
pub struct SystemClock {
    last_ms: Mutex<Option<i64>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn epoch_ms_now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

impl Clock for SystemClock {
    fn now_rfc3339_ms(&self) -> String {
        let mut last = self.last_ms.lock();
        let observed = Self::epoch_ms_now();
        let ms = match *last {
            Some(prev) if observed <= prev => prev + 1,
            _ => observed,
        };
        *last = Some(ms);
        format_epoch_ms(ms)
    }
}

/// Fake clock for testing with controllable, settable time.
#[derive(Clone)]
pub struct FakeClock {
    epoch_ms: Arc<Mutex<i64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self { epoch_ms: Arc::new(Mutex::new(1_700_000_000_000)) }
    }

    pub fn at(epoch_ms: i64) -> Self {
        Self { epoch_ms: Arc::new(Mutex::new(epoch_ms)) }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        *self.epoch_ms.lock() += ms;
    }

    pub fn set_epoch_ms(&self, ms: i64) {
        *self.epoch_ms.lock() = ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_rfc3339_ms(&self) -> String {
        let mut ms = self.epoch_ms.lock();
        let out = format_epoch_ms(*ms);
        *ms += 1;
        out
    }
}

fn format_epoch_ms(epoch_ms: i64) -> String {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_ms).unwrap_or_else(|| {
        if epoch_ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }
    });
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
