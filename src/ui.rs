//! Interface de terminal do jobparse: spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner de progresso e `console` para cores.
//! O [`ExtractionProgress`] também é um [`ExtractionObserver`]: repassa
//! os eventos ao `tracing` e mostra as retentativas no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use jobparse::application::JobApplication;
use jobparse::extraction::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};
use jobparse::{ExtractError, FailureKind};

/// Indicador visual de progresso para uma extração.
pub struct ExtractionProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl ExtractionProgress {
    /// Inicia o spinner com o link da vaga.
    pub fn start(job_link: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Processing {job_link}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finaliza o spinner e imprime a candidatura em JSON.
    pub fn succeed(&self, application: &JobApplication) -> serde_json::Result<()> {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} {} at {}",
            self.green.apply_to("✓"),
            application.position,
            application.company
        );
        println!("{}", serde_json::to_string_pretty(application)?);
        Ok(())
    }

    /// Finaliza o spinner com a mensagem genérica e o erro detalhado.
    pub fn fail(&self, err: &ExtractError) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} Failed to parse job posting. Please try again or add it manually.",
            self.red.apply_to("✗")
        );
        eprintln!("    {err}");
        if err.kind() == FailureKind::Precondition {
            eprintln!("    Set an API key with --api-key, OPENAI_API_KEY or jobparse.toml.");
        }
    }
}

impl ExtractionObserver for ExtractionProgress {
    fn on_event(&self, event: &ExtractionEvent) {
        TracingObserver.on_event(event);
        match event {
            ExtractionEvent::AttemptStarted {
                attempt,
                max_attempts,
            } if *attempt > 1 => {
                self.pb
                    .set_message(format!("Attempt {attempt}/{max_attempts}"));
            }
            ExtractionEvent::BackoffScheduled { attempt, delay } => {
                self.pb.println(format!(
                    "  {} Rate limited on attempt {attempt}, retrying in {:.1}s",
                    self.yellow.apply_to("↻"),
                    delay.as_secs_f64()
                ));
            }
            _ => {}
        }
    }
}
