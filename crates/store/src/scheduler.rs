use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::debug;

use lixeira_common::PURGE_GRACE_MS;

use crate::ExpiryStore;

/// Timer one-shot mirando o próximo instante de expiração conhecido.
/// Invariante: no máximo um timer armado por vez; armar cancela o anterior.
pub struct PurgeScheduler {
    armed: Arc<Mutex<Option<Armed>>>,
    generation: AtomicU64,
}

struct Armed {
    target_ms: i64,
    generation: u64,
    handle: JoinHandle<()>,
}

impl PurgeScheduler {
    pub fn new() -> Self {
        Self {
            armed: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Cancela o timer anterior e, se o snapshot tem expiração futura, arma um
    /// único disparo para `(expiração - now) + graça`. O disparo desarma o
    /// próprio slot antes de invocar `on_fire`, então um `rearm` reentrante
    /// dentro do callback se comporta corretamente.
    pub fn rearm<F, Fut>(&self, now_ms: i64, store: &ExpiryStore, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = lock(&self.armed);
        if let Some(prev) = slot.take() {
            prev.handle.abort();
        }

        let Some(target_ms) = store.earliest_future_expiry(now_ms) else {
            return; // nada expira no futuro, nada fica armado
        };

        // clamp contra skew de clock; a desigualdade estrita já deveria impedir
        let delay_ms = (target_ms - now_ms).max(0) + PURGE_GRACE_MS;
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        debug!("timer de purga armado: alvo {target_ms}, delay {delay_ms}ms");

        let armed = Arc::clone(&self.armed);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms as u64)).await;
            {
                let mut slot = lock(&armed);
                match slot.as_ref() {
                    Some(current) if current.generation == generation => {
                        *slot = None;
                    }
                    // um rearm mais novo substituiu este timer enquanto acordava
                    _ => return,
                }
            }
            on_fire().await;
        });

        *slot = Some(Armed {
            target_ms,
            generation,
            handle,
        });
    }

    /// Cancela o timer armado, se houver. Sempre seguro, mesmo desarmado.
    pub fn cancel(&self) {
        if let Some(prev) = lock(&self.armed).take() {
            prev.handle.abort();
            debug!("timer de purga cancelado");
        }
    }

    /// Instante de expiração que o timer armado mira, se houver.
    pub fn armed_target(&self) -> Option<i64> {
        lock(&self.armed).as_ref().map(|armed| armed.target_ms)
    }

    pub fn is_armed(&self) -> bool {
        lock(&self.armed).is_some()
    }
}

impl Default for PurgeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PurgeScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
