use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use triage::EngineConfig;

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct DaemonArgs {
    /// JSON array of finished chat sessions to turn into tickets
    #[arg(long, env = "TRIAGE_SESSIONS_PATH")]
    pub sessions: PathBuf,

    /// JSON array of support agents
    #[arg(long, env = "TRIAGE_AGENTS_PATH")]
    pub agents: PathBuf,

    /// JSON array of knowledge-base entries (built-in samples when omitted)
    #[arg(long, env = "TRIAGE_KNOWLEDGE_PATH")]
    pub knowledge: Option<PathBuf>,

    /// TOML engine configuration; TRIAGE_* env vars still override it
    #[arg(long, env = "TRIAGE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Seconds between escalation sweeps
    #[arg(long, env = "TRIAGE_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub interval_secs: u64,

    /// Actor recorded on sweep escalations
    #[arg(long, env = "TRIAGE_ESCALATED_BY", default_value = "system")]
    pub escalated_by: String,

    /// Run a single sweep and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Write the resulting tickets here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub sessions_path: PathBuf,
    pub agents_path: PathBuf,
    pub knowledge_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub sweep_interval: Duration,
    pub escalated_by: String,
    pub once: bool,
    pub engine: EngineConfig,
}

impl DaemonConfig {
    /// Resolve args into a config: engine defaults, then the TOML file,
    /// then `TRIAGE_*` environment overrides.
    pub fn from_args(args: DaemonArgs) -> Result<Self> {
        let mut engine = match &args.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("Failed to load engine config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        engine
            .apply_env()
            .context("Invalid TRIAGE_* environment override")?;

        if args.interval_secs == 0 {
            bail!("--interval-secs must be at least 1");
        }
        if args.escalated_by.trim().is_empty() {
            bail!("--escalated-by must not be blank");
        }

        Ok(Self {
            sessions_path: args.sessions,
            agents_path: args.agents,
            knowledge_path: args.knowledge,
            output_path: args.output,
            sweep_interval: Duration::from_secs(args.interval_secs),
            escalated_by: args.escalated_by,
            once: args.once,
            engine,
        })
    }
}
