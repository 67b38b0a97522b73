use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_GLOBAL_ID: AtomicU64 = AtomicU64::new(1);

/// Source of ids for generated script class names.
///
/// `Global` is shared by the whole process so that independent compilations
/// never mint the same name. `Seeded` is an isolated counter, handy for
/// deterministic tests.
#[derive(Debug, Clone, Default)]
pub enum GeneratedClassIds {
    #[default]
    Global,
    Seeded(Arc<AtomicU64>),
}

impl GeneratedClassIds {
    pub fn global() -> Self {
        GeneratedClassIds::Global
    }

    pub fn seeded(first: u64) -> Self {
        GeneratedClassIds::Seeded(Arc::new(AtomicU64::new(first)))
    }

    pub fn next(&self) -> u64 {
        self.counter().fetch_add(1, Ordering::SeqCst)
    }

    /// Restart numbering at `value`
    pub fn reset(&self, value: u64) {
        self.counter().store(value, Ordering::SeqCst);
    }

    fn counter(&self) -> &AtomicU64 {
        match self {
            GeneratedClassIds::Global => &NEXT_GLOBAL_ID,
            GeneratedClassIds::Seeded(counter) => counter,
        }
    }
}
