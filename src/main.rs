use anyhow::{Context, Result};
use chrono::{FixedOffset, Utc};
use std::sync::Arc;

use bonsai_care::{
    advise, seasonal_notes, CareReminder, CareStore, DashboardStats, SpeciesTable,
    SqliteDocumentStore,
};
use bonsai_core::Config;
use bonsai_weather::{ProviderSettings, WeatherProvider};

const UPCOMING_DAYS: u32 = 7;

#[tokio::main]
async fn main() -> Result<()> {
    bonsai_core::init()?;

    let (config, _validation) = Config::load_validated().context("Failed to load configuration")?;

    let species = match &config.care.species_file {
        Some(path) => SpeciesTable::load(path)
            .with_context(|| format!("Failed to load species table from {}", path.display()))?,
        None => SpeciesTable::builtin(),
    };
    let species = Arc::new(species);

    let db_path = &config.storage.database_path;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }
    let backend = SqliteDocumentStore::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    let store = CareStore::open(backend, Arc::clone(&species)).context("Failed to load care data")?;

    let offset = FixedOffset::east_opt(config.care.utc_offset_minutes * 60)
        .context("Configured UTC offset is out of range")?;

    tracing::info!("Bonsai care started");

    let now = Utc::now();
    let scheduler = store.scheduler(offset);

    println!("Bonsai care: {}", scheduler.day_of(now));
    print_section("Overdue", &scheduler.overdue(now));
    print_section("Due today", &scheduler.due_today(now));
    print_section(
        &format!("Next {} days", UPCOMING_DAYS),
        &scheduler.upcoming(now, UPCOMING_DAYS),
    );

    let stats = DashboardStats::compute(store.profiles(), &scheduler, now);
    println!(
        "\n{} plants ({}% healthy), {} pending reminders, {} due today",
        stats.total_plants,
        stats.healthy_percent(),
        stats.pending_reminders,
        stats.due_today
    );

    if !config.weather.has_api_key() || config.weather.location.trim().is_empty() {
        tracing::info!("Weather access key or location not configured, skipping advisories");
        return Ok(());
    }

    let provider = WeatherProvider::new(ProviderSettings {
        api_key: config.weather.api_key.clone(),
        base_url: config.weather.base_url.clone(),
    })?;

    match provider.fetch(&config.weather.location).await {
        Ok(observation) => {
            println!(
                "\nWeather in {}: {}°C, {}",
                config.weather.location, observation.temperature_c, observation.condition_text
            );
            let today = scheduler.day_of(now);
            for plant in store.profiles() {
                let profile = species.get(&plant.species_id);
                println!("  {}: {}", plant.name, advise(&observation, profile));
                if let Some(profile) = profile {
                    for note in seasonal_notes(&observation, profile, today) {
                        println!("    - {}", note);
                    }
                }
            }
        }
        Err(e) => {
            tracing::warn!("Weather fetch failed: {}", e);
            println!("\n{}", e.user_message());
        }
    }

    Ok(())
}

fn print_section(title: &str, reminders: &[&CareReminder]) {
    println!("\n{} ({})", title, reminders.len());
    for r in reminders {
        println!(
            "  [{:?}] {} - {} ({:?})",
            r.priority,
            r.due_at.format("%Y-%m-%d %H:%M"),
            r.title,
            r.reminder_type
        );
    }
}
