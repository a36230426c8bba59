use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};

use refkit_core::{
    config::Config,
    domain::{Category, Snowflake},
    pagination::{
        collector::{await_component, await_messages, EventFilter, DEFAULT_MAX_MESSAGES},
        page,
        port::PageView,
        PagePosition, Paginator,
    },
    ports::GuildScope,
    utils::{capitalize, format_bytes, media_attachments, trim_list, DEFAULT_TRIM_LEN},
};

mod snapshot;
mod terminal;

use snapshot::Snapshot;
use terminal::TerminalView;

#[derive(Parser)]
#[command(name = "refkit", about = "Resolve entity references and page through listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an ID, mention or name against a cache snapshot.
    Resolve {
        /// channel, user, role or member.
        #[arg(long)]
        category: Category,
        /// Guild ID; required for roles and members.
        #[arg(long)]
        guild: Option<Snowflake>,
        /// Snapshot JSON (defaults to REFKIT_SNAPSHOT).
        #[arg(long)]
        snapshot: Option<PathBuf>,
        identifier: String,
    },
    /// Page through a text file; type p / s / n and Enter to press buttons.
    Page {
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long, default_value_t = 1)]
        start: usize,
        /// Guild ID the session belongs to; presses come from the same guild.
        #[arg(long)]
        guild: Snowflake,
        file: PathBuf,
    },
    /// Wait for a single button press read from stdin.
    Wait {
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        guild: Snowflake,
    },
    /// Collect chat messages (stdin lines) and list their media links.
    Collect {
        #[arg(long, default_value_t = DEFAULT_MAX_MESSAGES)]
        max: usize,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    refkit_core::logging::init("refkit")?;

    let cfg = Config::load()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            category,
            guild,
            snapshot,
            identifier,
        } => {
            let path = snapshot
                .or_else(|| cfg.snapshot_path.clone())
                .context("no snapshot given (use --snapshot or REFKIT_SNAPSHOT)")?;
            resolve(&path, category, guild, &identifier).await
        }
        Command::Page {
            timeout_secs,
            page_size,
            start,
            guild,
            file,
        } => {
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(cfg.pagination_timeout);
            let page_size = page_size.unwrap_or(cfg.page_size).max(1);
            run_pages(&cfg, &file, page_size, start, timeout, guild).await
        }
        Command::Wait {
            timeout_secs,
            guild,
        } => {
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(cfg.component_timeout);
            wait_for_press(&cfg, timeout, guild).await
        }
        Command::Collect { max, timeout_secs } => {
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(cfg.component_timeout);
            collect_messages(max, timeout).await
        }
    }
}

async fn resolve(
    path: &std::path::Path,
    category: Category,
    guild_id: Option<Snowflake>,
    identifier: &str,
) -> anyhow::Result<()> {
    let snap = Snapshot::load(path)
        .await
        .with_context(|| format!("loading snapshot {}", path.display()))?;

    let guild = guild_id.and_then(|id| snap.guild(id));
    match guild {
        Some(g) => eprintln!("Guild {} ({})", g.name(), g.id()),
        None if category.requires_guild() => {
            tracing::warn!(%category, "no matching guild in snapshot; lookup will be empty");
        }
        None => {}
    }

    let scope = guild.map(|g| g as &dyn GuildScope);
    match snap.resolvers().resolve(category, identifier, scope).await {
        Some(entity) => {
            println!("{} {entity}", capitalize(category.as_str()));
            println!("{}", serde_json::to_string_pretty(&entity)?);
        }
        None => {
            println!("not found");
            let names = snap.cached_names(category, guild);
            if !names.is_empty() {
                println!("cached: {}", trim_list(&names, DEFAULT_TRIM_LEN).join(", "));
            }
        }
    }
    Ok(())
}

async fn run_pages(
    cfg: &Config,
    file: &std::path::Path,
    page_size: usize,
    start: usize,
    timeout: Duration,
    guild_id: Snowflake,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let lines: Vec<&str> = raw.lines().collect();
    let pages = page::chunk_lines(&lines, page_size);

    eprintln!(
        "Loaded {} lines ({}) into {} pages",
        lines.len(),
        format_bytes(raw.len() as u64),
        page::total_pages(lines.len(), page_size)
    );

    let view = TerminalView::new(cfg.footer_template.clone(), cfg.controls.clone());

    // The session only renders on transitions, so show the opening page here.
    if let Some(first) = pages.get(start.wrapping_sub(1)) {
        let position = PagePosition {
            page: start,
            total: pages.len(),
        };
        view.render(first, position, true).await?;
    }

    let handle = Paginator::new(pages, cfg.controls.clone(), view)
        .with_config(cfg)
        .timeout(timeout)
        .start_page(start)
        .guild(Some(guild_id))
        .start()?;

    terminal::drive_from_stdin(&handle, &cfg.controls, Some(guild_id)).await?;

    let outcome = if handle.is_finished() {
        handle.join().await?
    } else {
        handle.close().await?
    };

    eprintln!(
        "Session closed ({}) on page {}/{}",
        outcome.reason, outcome.last.page, outcome.last.total
    );
    Ok(())
}

async fn wait_for_press(
    cfg: &Config,
    timeout: Duration,
    guild_id: Snowflake,
) -> anyhow::Result<()> {
    let mut events = terminal::stdin_events(cfg.controls.clone(), Some(guild_id));
    let filter = EventFilter::new(cfg.controls.clone(), Some(guild_id));

    eprintln!("Waiting up to {}s for a button press", timeout.as_secs());
    match await_component(&mut events, |ev| filter.accepts(ev).is_some(), timeout).await {
        Some(event) => {
            event.acknowledge().await;
            println!("pressed {}", event.control_id);
        }
        None => println!("timed out"),
    }
    Ok(())
}

async fn collect_messages(max: usize, timeout: Duration) -> anyhow::Result<()> {
    let mut messages = terminal::stdin_messages();

    eprintln!("Waiting up to {}s for {max} message(s)", timeout.as_secs());
    let batch = await_messages(&mut messages, |m| !m.trim().is_empty(), max, timeout).await;
    if batch.is_empty() {
        println!("no messages");
        return Ok(());
    }

    for message in &batch {
        println!("> {message}");
    }

    let links: Vec<&str> = batch.iter().flat_map(|m| m.split_whitespace()).collect();
    let media = media_attachments(&links);
    if !media.is_empty() {
        println!("media: {}", trim_list(&media, DEFAULT_TRIM_LEN).join(", "));
    }
    Ok(())
}
