//! Interface de linha de comando do jobparse baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (extract, prompt)
//! e a flag global `--verbose`.

use clap::{Parser, Subcommand};

/// jobparse: extrai dados estruturados de vagas de emprego a partir do link.
#[derive(Debug, Parser)]
#[command(name = "jobparse", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Habilita saída detalhada (logs de cada tentativa).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extrai os dados de uma vaga e imprime a candidatura em JSON.
    Extract {
        /// Link da vaga.
        url: String,

        /// Chave da API (tem precedência sobre OPENAI_API_KEY e jobparse.toml).
        #[arg(long)]
        api_key: Option<String>,

        /// Número máximo de tentativas.
        #[arg(long)]
        retries: Option<u32>,

        /// Modelo a usar nesta execução.
        #[arg(long)]
        model: Option<String>,
    },

    /// Mostra a requisição que seria enviada para o link, sem chamar a API.
    Prompt {
        /// Link da vaga.
        url: String,

        /// Modelo a usar nesta execução.
        #[arg(long)]
        model: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_extract_subcommand() {
        let cli = Cli::parse_from(["jobparse", "extract", "https://jobs.example.com/1"]);
        match cli.command {
            Command::Extract {
                url,
                api_key,
                retries,
                model,
            } => {
                assert_eq!(url, "https://jobs.example.com/1");
                assert!(api_key.is_none());
                assert!(retries.is_none());
                assert!(model.is_none());
            }
            _ => panic!("expected Extract command"),
        }
    }

    #[test]
    fn cli_parses_extract_flags() {
        let cli = Cli::parse_from([
            "jobparse",
            "--verbose",
            "extract",
            "https://jobs.example.com/1",
            "--api-key",
            "sk-test",
            "--retries",
            "3",
            "--model",
            "gpt-4o-mini",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Extract {
                api_key,
                retries,
                model,
                ..
            } => {
                assert_eq!(api_key.as_deref(), Some("sk-test"));
                assert_eq!(retries, Some(3));
                assert_eq!(model.as_deref(), Some("gpt-4o-mini"));
            }
            _ => panic!("expected Extract command"),
        }
    }

    #[test]
    fn cli_parses_prompt_subcommand() {
        let cli = Cli::parse_from(["jobparse", "prompt", "https://jobs.example.com/1", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Prompt { .. }));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
