use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::knowledge::base::KnowledgeBase;

/// Holder of the current knowledge-base snapshot.
///
/// Readers take an `Arc` with [`snapshot`](Self::snapshot) and keep using it for the
/// whole analysis. [`publish`](Self::publish) swaps in a new table without touching
/// snapshots already handed out.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    current: RwLock<Arc<KnowledgeBase>>,
    generation: AtomicU64,
}

impl KnowledgeStore {
    pub fn new(initial: KnowledgeBase) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            generation: AtomicU64::new(1),
        }
    }

    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the current table; returns the new generation number.
    pub fn publish(&self, next: KnowledgeBase) -> u64 {
        let records = next.len();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(next);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, records, "published knowledge base snapshot");
        generation
    }

    /// Number of snapshots published so far (0 for an empty default store).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> KnowledgeBase {
        KnowledgeBase::from_json_str(&format!(
            r#"[{{"id": "1", "name": "{}", "risk_level": "seguro"}}]"#,
            name
        ))
        .unwrap()
    }

    #[test]
    fn test_in_flight_snapshot_survives_publish() {
        let store = KnowledgeStore::new(table("Azucar"));
        let before = store.snapshot();

        let generation = store.publish(table("Sal"));
        assert_eq!(generation, 2);

        assert_eq!(before.records()[0].name, "Azucar");
        assert_eq!(store.snapshot().records()[0].name, "Sal");
    }

    #[test]
    fn test_default_store_is_empty() {
        let store = KnowledgeStore::default();
        assert_eq!(store.generation(), 0);
        assert!(store.snapshot().is_empty());
        store.publish(table("Sal"));
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn test_snapshots_shared_across_threads() {
        let store = Arc::new(KnowledgeStore::new(table("Azucar")));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.snapshot().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
