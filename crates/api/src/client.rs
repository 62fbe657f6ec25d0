use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use lixeira_common::{ApiError, HTTP_TIMEOUT_SECS};

use crate::item::TrashItem;
use crate::response::{AckResponse, ListResponse, PurgeOutcome, PurgeResponse};

/// Cliente HTTP para os servlets do storage (`/api/directory` e `/api/file`).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        let base = base.into().trim_end_matches('/').to_string();
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Lista um diretório e devolve os itens já normalizados.
    pub async fn list(&self, path: &str) -> Result<Vec<TrashItem>, ApiError> {
        let resp = self
            .http
            .get(format!("{}/api/directory", self.base))
            .query(&[("action", "list"), ("path", path)])
            .send()
            .await?;
        let body: ListResponse = read_json(resp).await?;
        if !body.success {
            return Err(ApiError::Backend(
                body.message.unwrap_or_else(|| "list falhou".into()),
            ));
        }
        Ok(body.items.into_iter().map(TrashItem::from).collect())
    }

    /// Pede ao backend que purgue itens expirados. O backend decide sozinho
    /// o que remover; chamar sem nada expirado é um no-op correto.
    pub async fn purge(&self) -> Result<PurgeOutcome, ApiError> {
        let resp = self
            .http
            .get(format!("{}/api/directory", self.base))
            .query(&[("action", "purge")])
            .send()
            .await?;
        let body: PurgeResponse = read_json(resp).await?;
        if !body.success {
            debug!("backend reportou purga sem sucesso, tratando como vazia");
            return Ok(PurgeOutcome::default());
        }
        Ok(PurgeOutcome { purged: body.purged })
    }

    /// Move para a lixeira com retenção em dias, ou exclui permanentemente.
    pub async fn delete(
        &self,
        path: &str,
        permanent: bool,
        recursive: bool,
        retention_days: Option<u32>,
    ) -> Result<(), ApiError> {
        let mut req = self
            .http
            .delete(format!("{}/api/file", self.base))
            .query(&[("action", "delete"), ("path", path)])
            .query(&[("permanent", permanent), ("recursive", recursive)]);
        if let Some(days) = retention_days {
            req = req.query(&[("days", days)]);
        }
        let resp = req.send().await?;
        ack(resp, "delete falhou").await
    }

    /// Restaura um item da lixeira para o caminho original.
    pub async fn restore(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(format!("{}/api/file", self.base))
            .query(&[("action", "restore"), ("path", path)])
            .send()
            .await?;
        ack(resp, "restore falhou").await
    }
}

async fn ack(resp: reqwest::Response, fallback: &str) -> Result<(), ApiError> {
    let body: AckResponse = read_json(resp).await?;
    if !body.success {
        return Err(ApiError::Backend(
            body.message.unwrap_or_else(|| fallback.into()),
        ));
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::UnexpectedStatus(status.as_u16()));
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}
