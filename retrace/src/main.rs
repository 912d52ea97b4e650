//! retrace - CLI for session event replay reconstruction
//!
//! Lists a user's recorded browsing sessions, reconstructs a session's
//! replay timeline and narrative, and imports raw event records into the
//! local store.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Store: $XDG_DATA_HOME/retrace/events.db (~/.local/share/retrace/events.db)
//! - Logs: $XDG_STATE_HOME/retrace/retrace.log (~/.local/state/retrace/retrace.log)
//! - Config: $XDG_CONFIG_HOME/retrace/config.toml (~/.config/retrace/config.toml)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use retrace_core::config::StoreBackend;
use retrace_core::{Config, RawEventRecord, SessionAssembler, SqliteEventStore};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "Reconstruct recorded browsing sessions for replay")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a user's recorded sessions
    Sessions {
        /// User identifier the sessions belong to
        user: String,
    },
    /// Reconstruct one session's replay timeline and narrative
    Timeline {
        /// User identifier the session belongs to
        user: String,
        /// Session identifier
        session: String,
        /// Emit replay frames and narrative as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append raw event records from a JSONL file into the local store
    Import {
        /// User identifier to record the events under
        user: String,
        /// Path to a JSONL file, one raw record per line
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        retrace_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("retrace starting");

    match args.command {
        Command::Sessions { user } => cmd_sessions(&config, &user),
        Command::Timeline {
            user,
            session,
            json,
        } => cmd_timeline(&config, &user, &session, json),
        Command::Import { user, file } => cmd_import(&config, &user, &file),
    }
}

fn cmd_sessions(config: &Config, user: &str) -> Result<()> {
    let assembler = SessionAssembler::from_config(config).context("failed to open event store")?;
    let sessions = assembler
        .list_sessions(user)
        .context("failed to list sessions")?;

    if sessions.is_empty() {
        println!("No recorded sessions for {}", user);
        return Ok(());
    }

    println!("Sessions for {}:", user);
    for session in &sessions {
        let task = if session.task_name.is_empty() {
            "(no task label)"
        } else {
            session.task_name.as_str()
        };
        println!("  {}  {}", session.session_id, task);
    }

    tracing::info!(user, count = sessions.len(), "Listed sessions");
    Ok(())
}

fn cmd_timeline(config: &Config, user: &str, session: &str, json: bool) -> Result<()> {
    let assembler = SessionAssembler::from_config(config).context("failed to open event store")?;
    let timeline = assembler
        .build_timeline(user, session)
        .context("failed to reconstruct session")?;

    if json {
        let output = serde_json::json!({
            "events": timeline.frames,
            "narrative": timeline.narrative,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if timeline.events.is_empty() {
        println!("No events recorded for session {}", session);
        return Ok(());
    }

    if timeline.narrative.is_empty() {
        println!("(no narrated interactions)");
    } else {
        for line in &timeline.narrative {
            println!("{}", line);
        }
    }

    let d = &timeline.diagnostics;
    println!("\nReplay events: {}", timeline.events.len());
    println!("  Records fetched:   {}", d.records_fetched);
    println!("  Records skipped:   {}", d.records_skipped);
    println!("  Collapsed away:    {}", d.collapsed_away);
    if d.unknown_events > 0 {
        println!("  Unknown types:     {}", d.unknown_events);
    }
    if d.missing_viewports > 0 {
        println!("  Missing viewports: {}", d.missing_viewports);
    }

    Ok(())
}

fn cmd_import(config: &Config, user: &str, file: &Path) -> Result<()> {
    if config.store.backend != StoreBackend::Sqlite {
        bail!("import writes to the local store; set store.backend = \"sqlite\"");
    }

    let store_path = config.store_path();
    let store = SqliteEventStore::open(&store_path)
        .with_context(|| format!("failed to open store at {}", store_path.display()))?;

    let input = File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let reader = BufReader::new(input);

    let mut imported = 0usize;
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", file.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RawEventRecord>(&line) {
            Ok(record) => {
                store
                    .append_event(user, &record)
                    .context("failed to append record")?;
                imported += 1;
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = line_no + 1, error = %e, "Skipping malformed line");
                eprintln!("  line {}: skipped ({})", line_no + 1, e);
            }
        }
    }

    println!("Imported {} record(s) into {}", imported, store_path.display());
    if skipped > 0 {
        println!("Skipped {} malformed line(s)", skipped);
    }

    tracing::info!(user, imported, skipped, "Import complete");
    Ok(())
}
