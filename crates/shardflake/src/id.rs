use core::fmt;

/// A 64-bit Snowflake-style identifier.
///
/// - 1 bit reserved (always zero, keeps the value positive as an `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits machine ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// The timestamp is relative, so turning it back into an absolute instant
/// needs the epoch; see [`Generator::extract_time`].
///
/// # Example
///
/// ```
/// use shardflake::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 123, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.machine_id(), 123);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(SnowflakeId::from_raw(id.to_raw()), id);
/// ```
///
/// [`Generator::extract_time`]: crate::Generator::extract_time
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const MACHINE_ID_BITS: u32 = 10;
    pub const SEQUENCE_BITS: u32 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Number of bits to shift the machine ID to its correct position (bit 12).
    pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

    /// Bitmask for the 41-bit timestamp field, before shifting.
    pub const TIMESTAMP_MASK: i64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 10-bit machine ID field, before shifting.
    pub const MACHINE_ID_MASK: i64 = (1 << Self::MACHINE_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field, before shifting.
    pub const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Largest representable timestamp: 2^41 - 1 ms, roughly 69.7 years.
    pub const MAX_TIMESTAMP: i64 = Self::TIMESTAMP_MASK;

    /// Largest machine ID (1023).
    pub const MAX_MACHINE_ID: u16 = Self::MACHINE_ID_MASK as u16;

    /// Largest sequence within one millisecond (4095).
    pub const MAX_SEQUENCE: u16 = Self::SEQUENCE_MASK as u16;

    /// Packs the three fields into an ID, masking each to its width.
    pub const fn from(timestamp: i64, machine_id: u16, sequence: u16) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id as i64 & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence as i64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Packs the three fields into an ID.
    ///
    /// Out-of-range fields trip a debug assertion; release builds mask them
    /// like [`Self::from`].
    pub fn from_components(timestamp: i64, machine_id: u16, sequence: u16) -> Self {
        debug_assert!(
            (0..=Self::MAX_TIMESTAMP).contains(&timestamp),
            "timestamp overflow"
        );
        debug_assert!(machine_id <= Self::MAX_MACHINE_ID, "machine_id overflow");
        debug_assert!(sequence <= Self::MAX_SEQUENCE, "sequence overflow");
        Self::from(timestamp, machine_id, sequence)
    }

    /// Wraps a raw integer without validation.
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns the plain integer form used on the wire.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Extracts the timestamp (ms since epoch) from the packed ID.
    pub const fn timestamp(&self) -> i64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u16 {
        ((self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK) as u16
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts
    /// lexicographically in the same order as the integers.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl From<i64> for SnowflakeId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_twitter_bit_positions() {
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(SnowflakeId::MACHINE_ID_SHIFT, 12);
        assert_eq!(SnowflakeId::MAX_TIMESTAMP, (1_i64 << 41) - 1);
        assert_eq!(SnowflakeId::MAX_MACHINE_ID, 1023);
        assert_eq!(SnowflakeId::MAX_SEQUENCE, 4095);
    }

    #[test]
    fn fields_and_bounds() {
        let ts = SnowflakeId::MAX_TIMESTAMP;
        let mid = SnowflakeId::MAX_MACHINE_ID;
        let seq = SnowflakeId::MAX_SEQUENCE;

        let id = SnowflakeId::from_components(ts, mid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.machine_id(), mid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(id.to_raw(), i64::MAX);
        assert!(id.to_raw() >= 0, "sign bit must stay clear");
    }

    #[test]
    fn low_bit_fields() {
        let id = SnowflakeId::from_components(0, 0, 0);
        assert_eq!(id.to_raw(), 0);

        let id = SnowflakeId::from_components(5, 123, 1);
        assert_eq!(id.to_raw(), (5 << 22) | (123 << 12) | 1);
        assert_eq!(id.timestamp(), 5);
        assert_eq!(id.machine_id(), 123);
        assert_eq!(id.sequence(), 1);
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 7, 4095);
        let b = SnowflakeId::from_components(11, 7, 0);
        let c = SnowflakeId::from_components(11, 7, 1);
        assert!(a < b && b < c);
        assert!(a.to_padded_string() < b.to_padded_string());
    }

    #[test]
    fn padded_string_has_fixed_width() {
        let id = SnowflakeId::from_components(1, 0, 0);
        assert_eq!(id.to_padded_string(), "0000000000004194304");
        assert_eq!(id.to_padded_string().len(), 19);
        assert_eq!(id.to_string(), "4194304");
    }

    #[test]
    fn from_raw_decodes_without_validation() {
        let id: SnowflakeId = (-1_i64).into();
        assert_eq!(id.machine_id(), 1023);
        assert_eq!(id.sequence(), 4095);
        assert_eq!(i64::from(id), -1);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    #[cfg(debug_assertions)]
    fn timestamp_overflow_panics() {
        SnowflakeId::from_components(SnowflakeId::MAX_TIMESTAMP + 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "machine_id overflow")]
    #[cfg(debug_assertions)]
    fn machine_id_overflow_panics() {
        SnowflakeId::from_components(0, SnowflakeId::MAX_MACHINE_ID + 1, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    #[cfg(debug_assertions)]
    fn sequence_overflow_panics() {
        SnowflakeId::from_components(0, 0, SnowflakeId::MAX_SEQUENCE + 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_the_plain_integer() {
        let id = SnowflakeId::from_components(5, 123, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
