//! Navigation generations.

use std::cell::Cell;
use std::rc::Rc;

/// Shared, monotonically increasing navigation counter.
///
/// Every navigation advances it; a page holding an older value is stale and
/// its writes are dropped.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    value: Rc<Cell<u64>>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.value.get()
    }

    pub(crate) fn advance(&self) -> u64 {
        let next = self.value.get() + 1;
        self.value.set(next);
        next
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.value.get() == generation
    }
}
