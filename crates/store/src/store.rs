use std::sync::Arc;

use dashmap::DashMap;

use lixeira_api::TrashItem;

/// Snapshot corrente dos itens com expiração opcional, indexado por caminho.
/// Cada load substitui o conteúdo por inteiro; não há merge incremental.
#[derive(Clone)]
pub struct ExpiryStore {
    items: Arc<DashMap<String, TrashItem>>,
}

impl ExpiryStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(DashMap::new()),
        }
    }

    /// Substitui o snapshot incondicionalmente. Caminhos duplicados: o último vence.
    pub fn set_snapshot(&self, items: Vec<TrashItem>) {
        self.items.clear();
        for item in items {
            self.items.insert(item.path.clone(), item);
        }
    }

    /// Menor `expire_at` estritamente maior que `now_ms`, ignorando perpétuos.
    pub fn earliest_future_expiry(&self, now_ms: i64) -> Option<i64> {
        self.items
            .iter()
            .map(|entry| entry.expire_at)
            .filter(|&exp| exp > 0 && exp > now_ms)
            .min()
    }

    /// Itens já vencidos: `0 < expire_at <= now_ms`.
    pub fn expired_now(&self, now_ms: i64) -> Vec<TrashItem> {
        self.items
            .iter()
            .filter(|entry| entry.is_expired(now_ms))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn get(&self, path: &str) -> Option<TrashItem> {
        self.items.get(path).map(|entry| entry.value().clone())
    }

    /// Cópia dos itens, ordenada por caminho.
    pub fn items(&self) -> Vec<TrashItem> {
        let mut all: Vec<TrashItem> = self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.path.cmp(&b.path));
        all
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&self) {
        self.items.clear();
    }
}

impl Default for ExpiryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_replaces_previous() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/a", 0),
            TrashItem::with_expiry("/b", 100),
        ]);
        assert_eq!(store.len(), 2);

        store.set_snapshot(vec![TrashItem::with_expiry("/c", 200)]);
        assert_eq!(store.len(), 1);
        assert!(store.get("/a").is_none());
        assert!(store.get("/c").is_some());
    }

    #[test]
    fn duplicate_paths_last_wins() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/a", 100),
            TrashItem::with_expiry("/a", 900),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/a").unwrap().expire_at, 900);
    }

    #[test]
    fn earliest_ignores_perpetual_and_past() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/perpetuo", 0),
            TrashItem::with_expiry("/passado", 500),
            TrashItem::with_expiry("/cedo", 1500),
            TrashItem::with_expiry("/tarde", 9000),
        ]);
        assert_eq!(store.earliest_future_expiry(1000), Some(1500));
    }

    #[test]
    fn earliest_is_strictly_greater_than_now() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![TrashItem::with_expiry("/a", 1000)]);
        assert_eq!(store.earliest_future_expiry(999), Some(1000));
        assert_eq!(store.earliest_future_expiry(1000), None);
    }

    #[test]
    fn earliest_none_when_nothing_expires() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/a", 0),
            TrashItem::with_expiry("/b", 0),
        ]);
        assert_eq!(store.earliest_future_expiry(42), None);
    }

    #[test]
    fn expired_now_excludes_perpetual() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/perpetuo", 0),
            TrashItem::with_expiry("/vencido", 900),
            TrashItem::with_expiry("/futuro", 2000),
        ]);
        let expired = store.expired_now(1000);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].path, "/vencido");
    }

    #[test]
    fn expired_now_includes_exact_boundary() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![TrashItem::with_expiry("/a", 1000)]);
        assert_eq!(store.expired_now(1000).len(), 1);
        assert!(store.expired_now(999).is_empty());
    }

    #[test]
    fn items_sorted_by_path() {
        let store = ExpiryStore::new();
        store.set_snapshot(vec![
            TrashItem::with_expiry("/z", 0),
            TrashItem::with_expiry("/a", 0),
            TrashItem::with_expiry("/m", 0),
        ]);
        let items = store.items();
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/m", "/z"]);
    }
}
