use std::time::SystemTime;

/// The three fields of an ID, with the timestamp resolved to an absolute
/// instant. Returned by [`Generator::decompose`].
///
/// [`Generator::decompose`]: crate::Generator::decompose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decomposed {
    /// Epoch plus the timestamp field, at millisecond precision.
    pub time: SystemTime,
    /// The 10-bit machine ID.
    pub machine_id: u16,
    /// Position within the millisecond, `0..=4095`.
    pub sequence: u16,
}
