//! Tipos de erro para o cliente da API de chat completions.
//!
//! Define [`OpenAiError`] com variantes para rate limiting, erros HTTP,
//! erros de rede e respostas com formato inesperado. O cliente apenas
//! classifica a resposta; a decisão de retentar fica com o pipeline.

use std::time::Duration;

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Erros que podem ocorrer em uma única chamada ao endpoint de completions.
///
/// - [`RateLimited`](OpenAiError::RateLimited): o servidor retornou HTTP 429
/// - [`ApiError`](OpenAiError::ApiError): qualquer outro status fora de 2xx
/// - [`NetworkError`](OpenAiError::NetworkError): falha na camada de rede
/// - [`InvalidResponse`](OpenAiError::InvalidResponse): 2xx sem `choices[0].message`
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// O servidor retornou HTTP 429.
    /// `retry_after` é o valor do cabeçalho `retry-after`, se presente e válido.
    #[error("rate limited (status 429)")]
    RateLimited {
        retry_after: Option<Duration>,
        headers: HeaderMap,
    },

    /// Status HTTP fora de 2xx (ex.: 401 chave inválida, 500 erro interno).
    /// Os cabeçalhos da resposta são preservados para inspeção.
    #[error("API error (status {status}): {message}")]
    ApiError {
        status: u16,
        headers: HeaderMap,
        message: String,
    },

    /// Falha de rede subjacente (DNS, conexão recusada, corpo interrompido).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Resposta 2xx cujo corpo não tem o formato `choices[0].message.content`.
    #[error("invalid response from completions API: {0}")]
    InvalidResponse(String),
}

impl OpenAiError {
    /// Código de status HTTP, quando a falha veio de uma resposta.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAiError::RateLimited { .. } => Some(429),
            OpenAiError::ApiError { status, .. } => Some(*status),
            OpenAiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            OpenAiError::InvalidResponse(_) => None,
        }
    }

    /// Cabeçalhos da resposta HTTP, quando disponíveis.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            OpenAiError::RateLimited { headers, .. } | OpenAiError::ApiError { headers, .. } => {
                Some(headers)
            }
            _ => None,
        }
    }
}

/// Lê o cabeçalho `retry-after` como segundos decimais não negativos.
///
/// Datas HTTP, valores negativos e valores grandes demais para um
/// [`Duration`] resultam em `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
