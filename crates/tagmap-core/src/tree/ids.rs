/// Source of fresh node and map ids.
///
/// Implementations do not need to guarantee uniqueness; the editor re-draws on collision.
pub trait IdGenerator {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// `prefix-1`, `prefix-2`, ... with one counter shared by every prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let n = self.next;
        self.next = self.next.wrapping_add(1);
        format!("{prefix}-{n}")
    }
}

/// `prefix-<uuid v4, simple form>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
    }
}
