use uuid::Uuid;

/// Source of fresh entity ids, injectable so tests and host applications
/// can supply deterministic ids.
pub trait IdSource {
    /// Returns a new id carrying the given prefix (`track`, `obj`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Default source: random v4 UUIDs. Collision-free in practice, no
/// coordination required.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}_{}", Uuid::new_v4().simple())
    }
}

/// Monotonic counter source producing `prefix_1`, `prefix_2`, ...
/// for deterministic fixtures.
#[derive(Clone, Debug, Default)]
pub struct SequentialIdSource {
    next: u64,
}

impl SequentialIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}_{}", self.next)
    }
}
