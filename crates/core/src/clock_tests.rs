// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_formats_epoch() {
    let clock = FakeClock::at(1_700_000_000_000);
    let ts = clock.now_rfc3339_ms();
    assert_eq!(ts, "2023-11-14T22:13:20.000Z");
}

#[test]
fn fake_clock_advances_on_each_call() {
    let clock = FakeClock::at(0);
    let a = clock.now_rfc3339_ms();
    let b = clock.now_rfc3339_ms();
    assert_ne!(a, b);
    assert!(b > a);
}

#[test]
fn fake_clock_advance_ms_moves_forward() {
    let clock = FakeClock::at(0);
    clock.advance_ms(5_000);
    let ts = clock.now_rfc3339_ms();
    assert_eq!(ts, "1970-01-01T00:00:05.000Z");
}

#[test]
fn system_clock_is_monotonic_even_if_os_clock_repeats() {
    let clock = SystemClock::new();
    let a = clock.now_rfc3339_ms();
    let b = clock.now_rfc3339_ms();
    assert!(b >= a);
}
