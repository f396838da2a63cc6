/// Minutes since local midnight. Valid values are `0..=1439`.
pub type MinuteOffset = u32;

/// Number of minutes in a day; every valid [`MinuteOffset`] is below this.
pub const MINUTES_PER_DAY: MinuteOffset = 24 * 60;

/// All timestamps exchanged with upstream services carry their own offset.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;
