use serde::Deserialize;

use crate::item::RawEntry;

/// Resposta do listing (`action=list`). Formatos antigos usam `results`
/// no lugar de `items`.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "results")]
    pub items: Vec<RawEntry>,
}

/// Resposta da purga (`action=purge`). Campos ausentes valem como
/// "nada purgado" — o backend é a autoridade, o cliente só pergunta.
#[derive(Debug, Default, Deserialize)]
pub struct PurgeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub purged: Vec<String>,
}

/// Resposta genérica de operações de arquivo (delete/restore).
#[derive(Debug, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Caminhos que o backend efetivamente removeu em uma purga.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub purged: Vec<String>,
}

impl PurgeOutcome {
    pub fn is_empty(&self) -> bool {
        self.purged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TrashItem;

    #[test]
    fn list_response_items_field() {
        let json = r#"{"success": true, "items": [{"path": "/a"}, {"path": "/b"}]}"#;
        let resp: ListResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.items.len(), 2);
    }

    #[test]
    fn list_response_results_alias() {
        let json = r#"{"success": true, "results": ["/a", "/b", "/c"]}"#;
        let resp: ListResponse = serde_json::from_str(json).unwrap();
        let items: Vec<TrashItem> = resp.items.into_iter().map(TrashItem::from).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].path, "/a");
    }

    #[test]
    fn list_response_failure_with_message() {
        let json = r#"{"success": false, "message": "Invalid action"}"#;
        let resp: ListResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Invalid action"));
        assert!(resp.items.is_empty());
    }

    #[test]
    fn purge_response_full() {
        let json = r#"{"success": true, "purged": ["/.trash/a", "/.trash/b"]}"#;
        let resp: PurgeResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.purged.len(), 2);
    }

    #[test]
    fn purge_response_missing_fields_mean_nothing_purged() {
        let resp: PurgeResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
        assert!(resp.purged.is_empty());
    }

    #[test]
    fn purge_response_ignores_unknown_fields() {
        let json = r#"{"success": true, "purged": [], "elapsedMs": 12}"#;
        let resp: PurgeResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
    }
}
