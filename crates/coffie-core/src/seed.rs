//! Seed derivation for the selection lottery.
//!
//! The seed is the CRC-32 of the current UTC time at microsecond
//! precision plus the CRC-32 of a caller-supplied client string (the
//! request's `User-Agent` in the session API). Both inputs are passed in,
//! so tests can pin the seed without touching the clock or the network.
//!
//! Two requests from the same client within the same microsecond get the
//! same seed.

use chrono::{DateTime, Utc};

/// `strftime` pattern applied to the timestamp before hashing.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Render `now` the way it is fed into the checksum.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Combine a timestamp and a client string into a lottery seed.
///
/// The sum of two 32-bit checksums always fits in a `u64`.
pub fn derive_seed(now: DateTime<Utc>, client: &str) -> u64 {
    let time_sum = crc32fast::hash(format_timestamp(now).as_bytes());
    let client_sum = crc32fast::hash(client.as_bytes());
    u64::from(time_sum).saturating_add(u64::from(client_sum))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |t| t + Duration::microseconds(7))
    }

    #[test]
    fn timestamp_has_microsecond_precision() {
        assert_eq!(format_timestamp(fixed_instant()), "20240102030405000007");
    }

    #[test]
    fn client_checksum_is_added() {
        let now = fixed_instant();
        let bare = derive_seed(now, "");
        let with_client = derive_seed(now, "123456789");
        // CRC-32 of "" is 0 and of "123456789" is the standard check value.
        assert_eq!(bare, u64::from(crc32fast::hash(b"20240102030405000007")));
        assert_eq!(with_client.checked_sub(bare), Some(0xCBF4_3926));
    }

    #[test]
    fn same_inputs_same_seed() {
        let now = fixed_instant();
        assert_eq!(derive_seed(now, "curl/8.0"), derive_seed(now, "curl/8.0"));
    }

    #[test]
    fn microsecond_apart_changes_seed() {
        let now = fixed_instant();
        let later = now + Duration::microseconds(1);
        assert_ne!(derive_seed(now, "curl/8.0"), derive_seed(later, "curl/8.0"));
    }
}
