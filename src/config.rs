//! This module contains constants and default parameters for configuring converters.

/// Default nesting depth a conversion may reach before it is aborted with
/// [`RecursionLimit`](crate::AvroCastErr::RecursionLimit).
pub const MAX_DEPTH: usize = 256;
/// Date/time values are stored in a `long` as ticks of 100 nanoseconds since the Unix epoch.
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Nanoseconds per tick.
pub const NANOS_PER_TICK: i64 = 100;
