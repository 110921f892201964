//! Shareable link generators.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use formsmith_core::traits::LinkGenerator;

/// Shortest and longest token [`RandomLinks`] will produce.
pub const MIN_LINK_LENGTH: usize = 8;
pub const MAX_LINK_LENGTH: usize = 32;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase base-36 tokens drawn from random v4 UUIDs.
#[derive(Debug, Clone)]
pub struct RandomLinks {
    length: usize,
}

impl RandomLinks {
    /// `length` is clamped to `MIN_LINK_LENGTH..=MAX_LINK_LENGTH`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_LINK_LENGTH, MAX_LINK_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomLinks {
    fn default() -> Self {
        Self::new(26)
    }
}

impl LinkGenerator for RandomLinks {
    fn generate(&self) -> String {
        let mut token = String::with_capacity(self.length);
        while token.len() < self.length {
            // 36^23 < 2^122
            let mut bits = random_bits(Uuid::new_v4());
            for _ in 0..23 {
                if token.len() == self.length {
                    break;
                }
                token.push(ALPHABET[(bits % 36) as usize] as char);
                bits /= 36;
            }
        }
        token
    }
}

/// The 122 random bits of a v4 UUID, packed down with the 4 version bits
/// and 2 variant bits removed.
fn random_bits(uuid: Uuid) -> u128 {
    let raw = uuid.as_u128();
    let high = raw >> 80;
    let mid = (raw >> 64) & 0xfff;
    let low = raw & ((1u128 << 62) - 1);
    (high << 74) | (mid << 62) | low
}

/// Predictable tokens `{prefix}-1`, `{prefix}-2`, ... for tests and demos.
#[derive(Debug)]
pub struct SequentialLinks {
    prefix: String,
    next: AtomicU64,
}

impl SequentialLinks {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(first),
        }
    }
}

impl LinkGenerator for SequentialLinks {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
