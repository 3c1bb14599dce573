//! Configuração do jobparse carregada a partir de `jobparse.toml`.
//!
//! A struct [`JobparseConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `OPENAI_API_KEY` tem precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::extraction::DEFAULT_RETRIES;
use crate::extraction::prompt::DEFAULT_MODEL;
use crate::openai::API_URL;

pub const CONFIG_FILE: &str = "jobparse.toml";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuração de nível superior carregada de `jobparse.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobparseConfig {
    /// Chave da API de completions.
    #[serde(default)]
    pub api_key: String,

    /// Modelo usado na extração.
    #[serde(default = "default_model")]
    pub model: String,

    /// Número máximo de tentativas por extração.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// URL completa do endpoint de chat completions.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_endpoint() -> String {
    API_URL.to_string()
}

impl Default for JobparseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_retries: default_max_retries(),
            endpoint: default_endpoint(),
        }
    }
}

impl JobparseConfig {
    /// Carrega a configuração de `jobparse.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;

        // Variável de ambiente tem precedência sobre o arquivo para a chave API.
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.api_key = key;
            }
        }

        Ok(config)
    }

    /// Carrega a configuração de um caminho específico, sem consultar o ambiente.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<JobparseConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = JobparseConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.endpoint, "https://api.openai.com/v1/chat/completions");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "sk-test-123"
            max_retries = 3
        "#;
        let config: JobparseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-test-123");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.model, "gpt-3.5-turbo");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"gpt-4o-mini\"").unwrap();
        writeln!(file, "endpoint = \"http://localhost:8080/v1/chat/completions\"").unwrap();

        let config = JobparseConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = JobparseConfig::load_from(&dir.path().join("jobparse.toml")).unwrap();
        assert_eq!(config, JobparseConfig::default());
    }

    #[test]
    fn load_from_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_retries = \"many\"").unwrap();
        assert!(JobparseConfig::load_from(file.path()).is_err());
    }
}
