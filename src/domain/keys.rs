//! Key generation for cloned subtrees.

use uuid::Uuid;

use crate::domain::entities::ContentKey;

/// Source of fresh identifiers for nodes created by Copy.
pub trait KeyGenerator {
    fn next_key(&mut self) -> ContentKey;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn next_key(&mut self) -> ContentKey {
        Uuid::new_v4()
    }
}

/// Deterministic keys counting up from a seed. Useful where copied keys
/// must be predictable.
#[derive(Debug, Clone)]
pub struct SequentialKeyGenerator {
    next: u128,
}

impl SequentialKeyGenerator {
    pub fn starting_at(seed: u128) -> Self {
        Self { next: seed }
    }
}

impl KeyGenerator for SequentialKeyGenerator {
    fn next_key(&mut self) -> ContentKey {
        let key = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        key
    }
}
