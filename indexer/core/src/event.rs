use std::fmt;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Metadata shared by every log delivered to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    /// Hash of the transaction that emitted the log.
    pub transaction_hash: B256,
    /// Position of the log in the block.
    pub log_index: u32,
    pub block_number: u64,
    /// Block timestamp, in seconds.
    pub block_timestamp: u64,
    /// Address of the contract that emitted the log.
    pub address: Address,
}

/// Position of a log in the chain. Orders logs the way they were emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u32,
}

/// Storage key of an entity derived from a single log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub transaction_hash: B256,
    pub log_index: u32,
}

impl EntityKey {
    pub const LEN: usize = 36;

    pub fn new(transaction_hash: B256, log_index: u32) -> Self {
        Self {
            transaction_hash,
            log_index,
        }
    }

    /// Returns the 36 bytes of the key: the transaction hash followed by the log index as a
    /// little endian `u32`.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut bytes = [0u8; Self::LEN];
        bytes[..32].copy_from_slice(self.transaction_hash.as_slice());
        bytes[32..].copy_from_slice(&self.log_index.to_le_bytes());
        bytes
    }

    /// Returns the key in its `0x<hash>-<log index>` form, used as entity id.
    pub fn to_id(&self) -> String {
        self.to_string()
    }
}

impl EventMeta {
    pub fn entity_key(&self) -> EntityKey {
        EntityKey::new(self.transaction_hash, self.log_index)
    }

    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}-{}",
            hex::encode(self.transaction_hash),
            self.log_index
        )
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use quickcheck_macros::quickcheck;

    use super::{EntityKey, EventPosition};

    fn hash_from_seed(seed: u64) -> B256 {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&seed.to_be_bytes());
        bytes[24..].copy_from_slice(&seed.to_le_bytes());
        B256::from(bytes)
    }

    #[quickcheck]
    fn test_same_log_same_key(seed: u64, log_index: u32) {
        let a = EntityKey::new(hash_from_seed(seed), log_index);
        let b = EntityKey::new(hash_from_seed(seed), log_index);
        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_eq!(a.to_id(), b.to_id());
    }

    #[quickcheck]
    fn test_different_log_index_different_key(seed: u64, first: u32, second: u32) {
        if first == second {
            return;
        }
        let hash = hash_from_seed(seed);
        let a = EntityKey::new(hash, first);
        let b = EntityKey::new(hash, second);
        assert_ne!(a.to_bytes(), b.to_bytes());
        assert_ne!(a.to_id(), b.to_id());
    }

    #[test]
    fn test_key_layout() {
        let key = EntityKey::new(B256::repeat_byte(0xaa), 1);
        let bytes = key.to_bytes();
        assert_eq!(bytes[..32], [0xaa; 32]);
        assert_eq!(bytes[32..], [1, 0, 0, 0]);
        assert_eq!(
            key.to_id(),
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa-1"
        );
    }

    #[quickcheck]
    fn test_position_orders_by_block_then_log(block: u32, first: u32, second: u32) {
        let block = block as u64;
        let a = EventPosition {
            block_number: block,
            log_index: first,
        };
        let b = EventPosition {
            block_number: block,
            log_index: second,
        };
        let next_block = EventPosition {
            block_number: block + 1,
            log_index: 0,
        };
        assert_eq!(a.cmp(&b), first.cmp(&second));
        assert!(a < next_block);
        assert!(b < next_block);
    }
}
