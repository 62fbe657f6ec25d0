use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};
use tracing::{debug, info, warn};

use lixeira_api::{ApiClient, PurgeOutcome, TrashItem};
use lixeira_common::{ApiError, EVENT_CHANNEL_CAPACITY, PURGE_INTERVAL_SECS, now_ms};
use lixeira_store::{ExpiryStore, PurgeScheduler};

use crate::event::PurgeEvent;

/// Sessão da view de lixeira: dispara a purga autoritativa do backend por
/// três gatilhos independentes — periódico, timer exato na próxima expiração
/// e sob demanda. Os gatilhos podem se sobrepor; a purga é idempotente e o
/// backend decide sozinho o que remover.
#[derive(Clone)]
pub struct TrashWatcher {
    shared: Arc<Shared>,
}

struct Shared {
    api: ApiClient,
    store: ExpiryStore,
    scheduler: PurgeScheduler,
    events: broadcast::Sender<PurgeEvent>,
    periodic: Mutex<Option<JoinHandle<()>>>,
    active: AtomicBool,
}

impl TrashWatcher {
    pub fn new(api: ApiClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                api,
                store: ExpiryStore::new(),
                scheduler: PurgeScheduler::new(),
                events,
                periodic: Mutex::new(None),
                active: AtomicBool::new(false),
            }),
        }
    }

    /// Snapshot compartilhado; o host consulta para countdowns.
    pub fn store(&self) -> &ExpiryStore {
        &self.shared.store
    }

    /// Eventos de purga com remoção efetiva.
    pub fn events(&self) -> broadcast::Receiver<PurgeEvent> {
        self.shared.events.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Instante de expiração mirado pelo timer exato, se armado.
    pub fn next_purge_at(&self) -> Option<i64> {
        self.shared.scheduler.armed_target()
    }

    /// Inactive → Active: liga a purga periódica. O primeiro tick do intervalo
    /// é imediato e serve de purga de entrada. No-op se já ativo.
    pub fn enter_view(&self) {
        let mut slot = lock(&self.shared.periodic);
        if slot.is_some() {
            return;
        }
        self.shared.active.store(true, Ordering::SeqCst);
        info!("view de lixeira ativa, purga periódica a cada {PURGE_INTERVAL_SECS}s");

        let shared = self.shared.clone();
        *slot = Some(tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(PURGE_INTERVAL_SECS));
            loop {
                tick.tick().await;
                purge_and_publish(&shared).await;
            }
        }));
    }

    /// Active → Inactive: para a purga periódica e cancela o timer exato.
    /// Reentrar depois recomeça os dois mecanismos do zero.
    pub fn exit_view(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
        if let Some(handle) = lock(&self.shared.periodic).take() {
            handle.abort();
            info!("view de lixeira inativa");
        }
        self.shared.scheduler.cancel();
    }

    /// Alimenta um snapshot recém-carregado. Com a view ativa: se já chegou
    /// com itens vencidos, purga antes de rearmar — expirado não deve aparecer
    /// nem de passagem. Se essa purga removeu algo, o refresh do host trará um
    /// snapshot novo e o rearm acontece nele.
    pub async fn snapshot_loaded(&self, items: Vec<TrashItem>) {
        self.shared.store.set_snapshot(items);

        if !self.is_active() {
            self.shared.scheduler.cancel();
            return;
        }

        let now = now_ms();
        if !self.shared.store.expired_now(now).is_empty() {
            debug!("snapshot chegou com itens vencidos, purga imediata");
            if purge_and_publish(&self.shared).await > 0 {
                return;
            }
        }
        rearm_exact(&self.shared, now);
    }

    /// Purga manual (refresh do usuário). Emite evento se removeu itens;
    /// erros vão para o chamador em vez do log.
    pub async fn force_purge(&self) -> Result<PurgeOutcome, ApiError> {
        let outcome = self.shared.api.purge().await?;
        if !outcome.is_empty() {
            publish(&self.shared, &outcome);
        }
        Ok(outcome)
    }
}

/// Chama a purga do backend e publica o resultado. Falha de rede ou resposta
/// malformada é logada e fica para o próximo ciclo; nada aqui é fatal.
async fn purge_and_publish(shared: &Shared) -> usize {
    match shared.api.purge().await {
        Ok(outcome) => {
            if !outcome.is_empty() {
                publish(shared, &outcome);
            }
            outcome.purged.len()
        }
        Err(e) => {
            warn!("purga falhou: {e}");
            0
        }
    }
}

fn publish(shared: &Shared, outcome: &PurgeOutcome) {
    debug!("purga removeu {} itens", outcome.purged.len());
    // sem receivers não é erro; o host pode não estar ouvindo
    let _ = shared.events.send(PurgeEvent {
        purged: outcome.purged.clone(),
    });
}

/// Arma o timer exato para a próxima expiração do snapshot corrente.
fn rearm_exact(shared: &Arc<Shared>, now: i64) {
    let fire_shared = shared.clone();
    shared
        .scheduler
        .rearm(now, &shared.store, move || exact_fire(fire_shared));
}

/// Disparo do timer exato: purga uma vez. Se nada foi removido, não haverá
/// refresh do host; rearma a partir do snapshot corrente para que expirações
/// posteriores ainda ganhem timer.
async fn exact_fire(shared: Arc<Shared>) {
    let purged = purge_and_publish(&shared).await;
    if purged == 0 && shared.active.load(Ordering::SeqCst) {
        rearm_exact(&shared, now_ms());
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Ok(slot) = self.periodic.get_mut()
            && let Some(handle) = slot.take()
        {
            handle.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
