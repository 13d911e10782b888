//! Task id generation.

use ulid::{Generator, Ulid};

/// Produces fresh task id tokens.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Lowercase ULIDs, monotonic within a millisecond.
pub struct UlidIdGenerator {
    generator: Generator,
}

impl UlidIdGenerator {
    pub fn new() -> Self {
        Self {
            generator: Generator::new(),
        }
    }
}

impl Default for UlidIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UlidIdGenerator {
    fn next_id(&mut self) -> String {
        // Fails only on random-part overflow within one millisecond.
        let id = self.generator.generate().unwrap_or_else(|_| Ulid::new());
        id.to_string().to_lowercase()
    }
}

/// Deterministic `<prefix>-<n>` ids.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}
