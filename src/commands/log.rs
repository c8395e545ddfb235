use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Subcommand};

use glucolog_core::{
    ApiClient, Confirmation, CreateOutcome, DeleteOutcome, FetchOutcome, FileStore, LogForm,
    LogSync, ReadingContext, SyncError, DEFAULT_VALUE,
};

use super::config_cmd::OutputFormat;
use super::{confirm, log_sync};
use crate::config::Config;

const NOT_LOGGED_IN: &str = "Not logged in. Run 'gl auth login' first.";

#[derive(Args)]
pub struct LogCommand {
    #[command(subcommand)]
    pub command: LogSubcommand,
}

#[derive(Subcommand)]
pub enum LogSubcommand {
    /// Record a glucose reading
    Add {
        /// Reading in mg/dL
        #[arg(long, default_value = DEFAULT_VALUE)]
        value: String,

        /// When the reading was taken (fasting, before_breakfast, after_lunch, ...)
        #[arg(long)]
        context: ReadingContext,

        /// Time of the reading (RFC 3339 or "YYYY-MM-DD HH:MM" local), default now
        #[arg(long)]
        at: Option<String>,
    },

    /// Fetch and list your glucose logs, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Re-fetch logs from the server
    Refresh,

    /// Delete a glucose log
    Delete {
        /// Log ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

impl LogCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let sync = log_sync(config);

        match &self.command {
            LogSubcommand::Add { value, context, at } => {
                let mut form = LogForm::new().with_on_saved(|| {
                    tracing::debug!("Glucose log saved, form reset");
                });
                form.value = value.clone();
                form.context = Some(*context);
                if let Some(at) = at {
                    form.taken_at = parse_taken_at(at)?;
                }

                let outcome = form
                    .submit(&sync)
                    .await
                    .map_err(|e| alert(&e, "Failed to save glucose reading. Please try again."))?;

                match outcome {
                    CreateOutcome::Applied(log) => {
                        println!("✓ Saved glucose log:");
                        println!("{}", log);
                    }
                    CreateOutcome::Dropped => {
                        println!("✓ Saved");
                        println!("Run 'gl log list' to see it.");
                    }
                    CreateOutcome::Incomplete => {
                        return Err("A value and a context are required".into());
                    }
                    CreateOutcome::NotAuthenticated => return Err(NOT_LOGGED_IN.into()),
                }
                Ok(())
            }

            LogSubcommand::List { format } => {
                match sync.focus().await {
                    Ok(FetchOutcome::NotAuthenticated) => return Err(NOT_LOGGED_IN.into()),
                    Ok(_) => {}
                    // The stale list is still shown after the alert.
                    Err(e) => eprintln!("{}", alert(&e, "Failed to fetch logs")),
                }
                print_logs(&sync, format)
            }

            LogSubcommand::Refresh => match sync.refresh().await {
                Ok(FetchOutcome::Applied(count)) => {
                    println!("Fetched {} glucose log(s).", count);
                    Ok(())
                }
                Ok(FetchOutcome::NotAuthenticated) => Err(NOT_LOGGED_IN.into()),
                Ok(FetchOutcome::Superseded) => Ok(()),
                Err(e) => Err(alert(&e, "Failed to fetch logs").into()),
            },

            LogSubcommand::Delete { id, yes } => {
                // Load the list so the prompt can show the reading.
                match sync.focus().await {
                    Ok(FetchOutcome::NotAuthenticated) => return Err(NOT_LOGGED_IN.into()),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Could not load logs before delete: {}", e),
                }
                if let Some(log) = sync.store().snapshot().into_iter().find(|l| &l.id == id) {
                    println!("{}", log.summary());
                }

                let confirmation =
                    if *yes || confirm("Are you sure you want to delete this glucose log?")? {
                        Confirmation::Confirm
                    } else {
                        Confirmation::Cancel
                    };

                match sync
                    .delete(id, confirmation)
                    .await
                    .map_err(|e| alert(&e, "Failed to delete glucose log"))?
                {
                    DeleteOutcome::Deleted { .. } => {
                        println!("Deleted glucose log {}", id);
                        println!("{} log(s) remaining.", sync.store().len());
                    }
                    DeleteOutcome::Cancelled => println!("Deletion cancelled."),
                    DeleteOutcome::NotAuthenticated => return Err(NOT_LOGGED_IN.into()),
                }
                Ok(())
            }
        }
    }
}

fn alert(e: &SyncError, fallback: &str) -> String {
    tracing::debug!("{}", e);
    e.user_message(fallback)
}

fn print_logs(
    sync: &LogSync<ApiClient, FileStore>,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let logs = sync.store().snapshot();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
        OutputFormat::Text => {
            if logs.is_empty() {
                println!("No glucose logs yet");
                println!("Start tracking your glucose levels to see your logs here");
                return Ok(());
            }
            for log in &logs {
                println!("{}  [{}]", log.summary(), log.id);
            }
        }
    }
    Ok(())
}

/// Accepts RFC 3339, or `YYYY-MM-DD HH:MM` in local time.
fn parse_taken_at(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|_| format!("Invalid time '{}'. Use RFC 3339 or YYYY-MM-DD HH:MM", s))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("Ambiguous local time '{}'", s))
}
