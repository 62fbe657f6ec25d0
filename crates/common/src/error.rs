/// Erros de comunicação com o backend HTTP.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("resposta não é JSON válido: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("status HTTP inesperado: {0}")]
    UnexpectedStatus(u16),
    #[error("backend recusou a operação: {0}")]
    Backend(String),
}

/// Erro top-level do Lixeira.
#[derive(Debug, thiserror::Error)]
pub enum LixeiraError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias.
pub type LixeiraResult<T> = Result<T, LixeiraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Backend("Directory not found".into());
        assert_eq!(
            err.to_string(),
            "backend recusou a operação: Directory not found"
        );
    }

    #[test]
    fn api_error_status_display() {
        let err = ApiError::UnexpectedStatus(502);
        assert_eq!(err.to_string(), "status HTTP inesperado: 502");
    }

    #[test]
    fn lixeira_error_from_api() {
        let err: LixeiraError = ApiError::UnexpectedStatus(500).into();
        assert!(matches!(
            err,
            LixeiraError::Api(ApiError::UnexpectedStatus(500))
        ));
    }

    #[test]
    fn lixeira_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken");
        let err: LixeiraError = io_err.into();
        assert!(matches!(err, LixeiraError::Io(_)));
    }
}
