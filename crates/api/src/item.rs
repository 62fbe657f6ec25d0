use serde::Deserialize;
use serde_json::Value;

/// Item conhecido pelo cliente: arquivo ou diretório do listing, já normalizado.
/// O `path` é o identificador único dentro de um snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashItem {
    pub path: String,
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub modification_time: i64,
    /// Caminho original, quando o item veio da lixeira.
    pub original_path: Option<String>,
    /// Milissegundos desde o epoch; 0 significa "nunca expira".
    pub expire_at: i64,
}

impl TrashItem {
    /// Item mínimo com expiração, útil para hosts e testes.
    pub fn with_expiry(path: impl Into<String>, expire_at: i64) -> Self {
        let path = path.into();
        let name = basename(&path);
        Self {
            path,
            name,
            is_directory: false,
            size: 0,
            modification_time: 0,
            original_path: None,
            expire_at,
        }
    }

    pub fn expires(&self) -> bool {
        self.expire_at > 0
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expire_at > 0 && self.expire_at <= now_ms
    }

    /// Tempo restante até expirar. None para itens perpétuos.
    pub fn remaining_ms(&self, now_ms: i64) -> Option<i64> {
        self.expires().then(|| self.expire_at - now_ms)
    }
}

/// Entrada crua do listing, antes da normalização. Backends antigos devolvem
/// strings de caminho; os atuais devolvem objetos com nomes de campo variados.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Path(String),
    Entry(Box<RawItem>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    path: Option<String>,
    full_path: Option<String>,
    name: Option<String>,
    is_directory: Option<bool>,
    #[serde(rename = "type")]
    kind: Option<String>,
    size: Option<u64>,
    length: Option<u64>,
    modification_time: Option<i64>,
    mtime: Option<i64>,
    last_modified: Option<i64>,
    original_path: Option<String>,
    orig_path: Option<String>,
    source_path: Option<String>,
    expire_at: Option<Value>,
}

impl From<RawEntry> for TrashItem {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Path(path) => TrashItem::with_expiry(path, 0),
            RawEntry::Entry(entry) => {
                let it = *entry;
                let path = it
                    .path
                    .or(it.full_path)
                    .or_else(|| it.name.clone())
                    .unwrap_or_default();
                let name = it.name.unwrap_or_else(|| basename(&path));
                let is_directory = it
                    .is_directory
                    .unwrap_or_else(|| matches!(it.kind.as_deref(), Some("directory") | Some("dir")));
                TrashItem {
                    name,
                    path,
                    is_directory,
                    size: it.size.or(it.length).unwrap_or(0),
                    modification_time: it
                        .modification_time
                        .or(it.mtime)
                        .or(it.last_modified)
                        .unwrap_or(0),
                    original_path: it.original_path.or(it.orig_path).or(it.source_path),
                    expire_at: coerce_expire_at(it.expire_at),
                }
            }
        }
    }
}

/// `expireAt` chega como número, string numérica, null ou ausente.
/// Qualquer coisa não interpretável vira 0 (perpétuo).
fn coerce_expire_at(value: Option<Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
