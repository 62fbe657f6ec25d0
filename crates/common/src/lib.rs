#![forbid(unsafe_code)]

mod error;

pub use error::*;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const TRASH_ROOT: &str = "/.trash";
pub const DEFAULT_RETENTION_DAYS: u32 = 7;
pub const PURGE_INTERVAL_SECS: u64 = 30;
pub const PURGE_GRACE_MS: i64 = 500; // margem após a expiração, evita corrida com o relógio do backend
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Relógio de parede em milissegundos desde o epoch.
/// Mesmo domínio de clock dos `expire_at` emitidos pelo servidor.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
