//! TSID Generator
//!
//! Generates time-sorted IDs as Crockford Base32 strings. Task records use
//! these as their storage keys so that insertion order is roughly preserved
//! when sorting lexically.

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (excludes I, L, O, U)
const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

static COUNTER: AtomicU16 = AtomicU16::new(0);

/// Generator for unique, time-sorted identifiers.
pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID as a 13-character Crockford Base32 string,
    /// e.g. `"0HZXEQ5Y8JY5Z"`.
    ///
    /// Layout (64 bits): 42-bit millisecond timestamp, 10-bit random
    /// component, 12-bit rolling counter (4096 IDs per millisecond).
    pub fn generate() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as u64;

        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) as u64;
        let random = (rand::random::<u16>() as u64) & 0x3FF;

        let tsid = ((now & 0x3FF_FFFF_FFFF) << 22) | (random << 12) | (counter & 0xFFF);

        encode_crockford(tsid)
    }
}

fn encode_crockford(mut value: u64) -> String {
    let mut result = [b'0'; 13];

    for slot in result.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1F) as usize];
        value >>= 5;
    }

    String::from_utf8(result.to_vec()).expect("alphabet is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), 13);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| TsidGenerator::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_roughly_time_sorted() {
        let first = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TsidGenerator::generate();
        assert!(first < second);
    }

    #[test]
    fn test_encode_crockford_zero() {
        assert_eq!(encode_crockford(0), "0000000000000");
    }
}
