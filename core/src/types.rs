//! Shared primitive types used across the metrics pipeline.

/// A plain currency amount. Formatting happens at the presentation boundary.
pub type Currency = f64;

/// A marketing channel label, e.g. "Facebook".
pub type ChannelName = String;

/// A derived ratio. `None` means the denominator was exactly zero.
pub type Ratio = Option<f64>;
