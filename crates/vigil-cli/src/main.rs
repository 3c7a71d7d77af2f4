//! vigil - run sample activities through the monitoring interceptor.
//!
//! Reports to Sentry when a DSN is configured (`--config` file or
//! `SENTRY_DSN`), and to the log otherwise.

mod activities;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ulid::Ulid;
use vigil_core::impls::{FixedActivityContext, SentryMonitor, TracingMonitor, sentry_monitor};
use vigil_core::typed::{Activity, ActivityRegistry};
use vigil_core::{
    ActivityArg, ActivityInbound, ActivityInfo, ExecuteActivityInput, InterceptorChain, Monitor,
    MonitorConfig, MonitoringInterceptor,
};

use crate::activities::{Divide, Greet};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Run activities with failure reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one sample activity through the interceptor chain
    Run {
        /// Activity to execute
        #[arg(long, value_enum, default_value_t = SampleActivity::Greet)]
        activity: SampleActivity,
        /// JSON argument; an object is passed as a record
        #[arg(long, default_value = r#"{"name": "world"}"#)]
        arg: String,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Attempt number reported in the activity info
        #[arg(long, default_value = "1")]
        attempt: u32,
        /// Workflow namespace
        #[arg(long, default_value = "default")]
        namespace: String,
        /// Task queue
        #[arg(long, default_value = "vigil-demo")]
        task_queue: String,
    },
    /// Print the effective configuration
    CheckConfig {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SampleActivity {
    Greet,
    Divide,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            activity,
            arg,
            config,
            attempt,
            namespace,
            task_queue,
        } => {
            let config = load_config(config)?;
            let guard = sentry_monitor::init(&config)?;
            let monitor: Arc<dyn Monitor> = if guard.is_some() {
                info!("reporting failures to sentry");
                Arc::new(SentryMonitor)
            } else {
                warn!("no SENTRY_DSN configured, reporting failures to the log");
                Arc::new(TracingMonitor)
            };

            let mut registry = ActivityRegistry::new();
            registry.register(Greet)?;
            registry.register(Divide)?;

            let inbound = InterceptorChain::new()
                .with(MonitoringInterceptor::from_config(monitor, &config))
                .build(Arc::new(registry));

            let function = match activity {
                SampleActivity::Greet => Greet::function_ref(),
                SampleActivity::Divide => Divide::function_ref(),
            };
            let info = demo_info(&function.qualname, attempt, namespace, task_queue);
            let value: Value = serde_json::from_str(&arg).context("--arg must be valid JSON")?;
            let arg = match value {
                Value::Object(fields) => ActivityArg::Record(fields),
                other => ActivityArg::Value(other),
            };

            let input = ExecuteActivityInput::new(function, Arc::new(FixedActivityContext::new(info)))
                .with_arg(arg);
            let output = inbound.execute_activity(&input).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::CheckConfig { config } => {
            let config = load_config(config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(path) => Ok(MonitorConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?
            .with_env_overrides(|key| std::env::var(key).ok())?),
        None => Ok(MonitorConfig::from_env()?),
    }
}

/// Info for a single demo invocation; ids are fresh ULIDs.
fn demo_info(activity_type: &str, attempt: u32, namespace: String, task_queue: String) -> ActivityInfo {
    let now = Utc::now();
    ActivityInfo {
        activity_id: Ulid::new().to_string(),
        activity_type: activity_type.to_string(),
        attempt,
        is_local: false,
        task_queue,
        workflow_id: format!("demo-{}", Ulid::new()),
        workflow_namespace: namespace,
        workflow_run_id: Ulid::new().to_string(),
        workflow_type: "DemoWorkflow".to_string(),
        scheduled_time: now,
        started_time: now,
        heartbeat_timeout_ms: None,
        start_to_close_timeout_ms: Some(60_000),
    }
}
