//! Timestamp identifiers (TIDs) for new record keys.
//!
//! A TID is a 64-bit integer, microseconds since the Unix epoch shifted left
//! by 10 bits plus a 10-bit clock id, written as 13 characters of a base32
//! alphabet whose byte order matches numeric order. Later keys therefore sort
//! after earlier ones.

use chrono::Utc;

const ALPHABET: &[u8; 32] = b"234567abcdefghijklmnopqrstuvwxyz";
const TID_LEN: usize = 13;
const CLOCK_ID_MASK: u64 = 0x3ff;

/// Issues strictly increasing TIDs for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct TidClock {
    last_micros: u64,
    clock_id: u64,
}

impl TidClock {
    /// Clock id taken from the sub-microsecond part of the start time.
    pub fn new() -> Self {
        let nanos = u64::from(Utc::now().timestamp_subsec_nanos());
        Self::with_clock_id((nanos % 1000) ^ u64::from(std::process::id()))
    }

    pub fn with_clock_id(clock_id: u64) -> Self {
        Self {
            last_micros: 0,
            clock_id: clock_id & CLOCK_ID_MASK,
        }
    }

    /// Next key. Never repeats and never goes backwards, even if the wall
    /// clock does.
    pub fn next_tid(&mut self) -> String {
        let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        let micros = now.max(self.last_micros + 1);
        self.last_micros = micros;
        encode((micros << 10) | self.clock_id)
    }
}

impl Default for TidClock {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(value: u64) -> String {
    // 13 * 5 = 65 bits; the leading character only ever carries 4.
    (0..TID_LEN)
        .map(|i| {
            let shift = 5 * (TID_LEN - 1 - i);
            ALPHABET[((value >> shift) & 0x1f) as usize] as char
        })
        .collect()
}

/// Whether `s` has the shape of a TID.
pub fn is_tid(s: &str) -> bool {
    s.len() == TID_LEN
        && s.bytes().all(|b| ALPHABET.contains(&b))
        && s.as_bytes()[0] < b'k'
}
