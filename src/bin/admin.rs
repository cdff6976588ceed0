//! CLI administration tool for link-rotator.
//!
//! Manages the link collection, shows usage statistics and flips the geo
//! gate directly against the configured store, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List configured links
//! cargo run --bin admin -- link list
//!
//! # Add a link (prompts for anything not given)
//! cargo run --bin admin -- link add --target "https://wa.me/15551234567"
//!
//! # Disable a link
//! cargo run --bin admin -- link update Xk3p9QaZ1bYt --disable
//!
//! # Remove a link without confirmation
//! cargo run --bin admin -- link remove Xk3p9QaZ1bYt -y
//!
//! # Usage report
//! cargo run --bin admin -- stats
//!
//! # Check the store connection
//! cargo run --bin admin -- store check
//!
//! # Geo gate
//! cargo run --bin admin -- gate on
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `link_rotator::config`. Without Redis the tool
//! operates on an empty in-process store, which is only useful for trying
//! commands out.

use link_rotator::application::services::stats_service::RemainingQuota;
use link_rotator::config::{self, Config};
use link_rotator::domain::clock::SystemClock;
use link_rotator::domain::entities::{LinkEntry, LinkEntryPatch, NewLinkEntry};
use link_rotator::domain::random::ThreadRandom;
use link_rotator::server::connect_store;
use link_rotator::state::{AppState, StateOptions};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use std::sync::Arc;

/// CLI tool for managing link-rotator.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage rotation links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show usage statistics
    Stats,

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Geo gate switch
    Gate {
        #[command(subcommand)]
        action: GateAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links
    List,

    /// Add a link
    Add {
        /// Target URL
        #[arg(short, long)]
        target: Option<String>,

        /// Display label
        #[arg(short, long)]
        label: Option<String>,

        /// Relative weight for weighted_random
        #[arg(short, long)]
        weight: Option<u32>,

        /// Daily selection quota
        #[arg(short, long)]
        quota: Option<u32>,

        /// Specialization tag (e.g. US_STOCKS)
        #[arg(short, long)]
        specialization: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Update a link
    Update {
        /// Link id
        id: String,

        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        weight: Option<u32>,

        /// Enable the link
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Disable the link
        #[arg(long)]
        disable: bool,

        /// Daily quota; 0 removes the quota
        #[arg(long)]
        quota: Option<u32>,
    },

    /// Remove a link
    Remove {
        /// Link id
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Store operation subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

/// Geo gate subcommands.
#[derive(Subcommand)]
enum GateAction {
    /// Turn the gate on (only US visitors see the site)
    On,
    /// Turn the gate off
    Off,
    /// Show the gate state
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    let state = build_state(&config).await;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &state).await?,
        Commands::Stats => handle_stats(&state).await?,
        Commands::Store { action } => handle_store_action(action, &state).await?,
        Commands::Gate { action } => handle_gate_action(action, &state).await?,
    }

    Ok(())
}

async fn build_state(config: &Config) -> AppState {
    if !config.is_redis_enabled() {
        println!(
            "{}",
            "⚠️  Redis not configured, changes will not be persisted".yellow()
        );
    }

    let store = connect_store(config).await;

    AppState::new(
        store,
        Arc::new(SystemClock),
        Arc::new(ThreadRandom),
        config.rotation_tables.clone(),
        StateOptions::from(config),
    )
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, state: &AppState) -> Result<()> {
    match action {
        LinkAction::List => list_links(state).await?,
        LinkAction::Add {
            target,
            label,
            weight,
            quota,
            specialization,
            yes,
        } => {
            add_link(state, target, label, weight, quota, specialization, yes).await?;
        }
        LinkAction::Update {
            id,
            target,
            label,
            weight,
            enable,
            disable,
            quota,
        } => {
            let patch = LinkEntryPatch {
                target,
                label: label.map(Some),
                weight,
                enabled: match (enable, disable) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                max_daily_quota: quota.map(|q| (q > 0).then_some(q)),
                ..Default::default()
            };
            update_link(state, id, patch).await?;
        }
        LinkAction::Remove { id, yes } => remove_link(state, id, yes).await?,
    }

    Ok(())
}

/// Lists all links with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID            Label                Weight  Quota     Status
///   ───────────────────────────────────────────────────────────────
///   1             Desk 1               2       200       ENABLED
///   Xk3p9QaZ1bYt  Night shift          1       -         DISABLED
/// ```
async fn list_links(state: &AppState) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = state
        .registry
        .try_list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links configured".yellow());
        println!();
        println!(
            "  Add one with: {} admin link add",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<14} {:<20} {:<7} {:<9} {:<10}",
        "ID".bright_white().bold(),
        "Label".bright_white().bold(),
        "Weight".bright_white().bold(),
        "Quota".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(65).bright_black());

    for link in &links {
        print_link_row(link);
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_link_row(link: &LinkEntry) {
    let status = if link.enabled {
        "ENABLED".green()
    } else {
        "DISABLED".red()
    };
    let quota = link
        .max_daily_quota
        .map(|q| q.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  {:<14} {:<20} {:<7} {:<9} {}",
        link.id.bright_black(),
        link.label.as_deref().unwrap_or("-").cyan(),
        link.weight,
        quota,
        status
    );
    println!("  {:<14} {}", "", link.target.bright_black());
}

/// Adds a link, prompting for the target and label when not given.
async fn add_link(
    state: &AppState,
    target: Option<String>,
    label: Option<String>,
    weight: Option<u32>,
    quota: Option<u32>,
    specialization: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Add Link".bright_blue().bold());
    println!();

    let target = match target {
        Some(t) => t,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://wa.me/")
            .interact_text()?,
    };

    let label = match label {
        Some(l) => l,
        None => Input::new()
            .with_prompt("Label")
            .allow_empty(true)
            .interact_text()?,
    };

    let weight = match weight {
        Some(w) => w,
        None => Input::new()
            .with_prompt("Weight")
            .default(1u32)
            .interact_text()?,
    };

    let mut new_link = NewLinkEntry::new(target).with_weight(weight);
    if !label.trim().is_empty() {
        new_link = new_link.with_label(label);
    }
    if let Some(quota) = quota {
        new_link = new_link.with_quota(quota);
    }
    if let Some(specialization) = specialization {
        new_link = new_link.with_specialization(specialization);
    }

    println!();
    println!("{}", "Link details:".bright_white().bold());
    println!("  Target: {}", new_link.target.cyan());
    println!(
        "  Label:  {}",
        new_link.label.as_deref().unwrap_or("-").cyan()
    );
    println!("  Weight: {}", weight.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Add this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = state
        .registry
        .add(new_link)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to add link: {}", e))?;

    println!();
    println!("{}", "✅ Link added successfully!".green().bold());
    println!("  ID: {}", link.id.bright_yellow().bold());
    println!();

    Ok(())
}

async fn update_link(state: &AppState, id: String, patch: LinkEntryPatch) -> Result<()> {
    let link = state
        .registry
        .update(&id, patch)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

    println!("{}", "✅ Link updated".green().bold());
    println!();
    print_link_row(&link);
    println!();

    Ok(())
}

/// Removes a link after confirmation (default: No).
///
/// Usage history of the link is kept in the statistics.
async fn remove_link(state: &AppState, id: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Remove Link".bright_blue().bold());
    println!();

    let link = state
        .registry
        .find(&id)
        .await
        .context("Link not found")?;

    print_link_row(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .registry
        .delete(&id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove link: {}", e))?;

    println!();
    println!("{}", "✅ Link removed successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays the usage report.
async fn handle_stats(state: &AppState) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let report = state.stats.report().await;

    println!(
        "  {:<14} {:<20} {:>8} {:>8} {:>9}  {}",
        "ID".bright_white().bold(),
        "Label".bright_white().bold(),
        "Total".bright_white().bold(),
        "Today".bright_white().bold(),
        "Share".bright_white().bold(),
        "Remaining".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for usage in &report.links {
        let remaining = match usage.remaining_today {
            RemainingQuota::Limited(n) => n.to_string(),
            RemainingQuota::Unlimited => "Unlimited".to_string(),
        };

        println!(
            "  {:<14} {:<20} {:>8} {:>8} {:>9}  {}",
            usage.entry.id.bright_black(),
            usage.entry.label.as_deref().unwrap_or("-").cyan(),
            usage.total_clicks.to_string().bright_green(),
            usage.today_clicks,
            usage.percentage,
            remaining
        );
    }

    println!();
    println!(
        "  Default strategy: {}",
        report.default_strategy.to_string().bright_white().bold()
    );
    println!("  Today:            {}", report.today.bright_white());

    if !report.popular_symbols.is_empty() {
        let mut symbols: Vec<_> = report.popular_symbols.iter().collect();
        symbols.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        println!();
        println!("{}", "  Popular symbols:".bright_white());
        for (symbol, count) in symbols.into_iter().take(10) {
            println!("    {:<12} {}", symbol.cyan(), count);
        }
    }
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, state: &AppState) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking store connection...".bright_blue());

            if !state.store.health_check().await {
                anyhow::bail!("Store is not reachable");
            }

            println!("{}", "✅ Store connection OK".green().bold());
        }
    }

    Ok(())
}

async fn handle_gate_action(action: GateAction, state: &AppState) -> Result<()> {
    match action {
        GateAction::On | GateAction::Off => {
            let enabled = matches!(action, GateAction::On);
            state
                .settings
                .set_geo_gate(enabled)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to switch geo gate: {}", e))?;

            let label = if enabled { "ON".green() } else { "OFF".yellow() };
            println!("{} Geo gate is now {}", "✅".green(), label.bold());
        }
        GateAction::Status => {
            let label = if state.settings.geo_gate_enabled().await {
                "ON".green()
            } else {
                "OFF".yellow()
            };
            println!("  Geo gate: {}", label.bold());
        }
    }

    Ok(())
}
