use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use apod_reader::models::parse_date;
use apod_reader::{
    Apod, ApodClient, Database, DayViewModel, FavoritesStore, FavoritesViewModel, FeedSource,
    ListViewModel, ServiceConfig,
};

const USAGE: &str = "\
Usage: apod_reader [COMMAND]

Commands:
  today               show today's picture (default)
  date YYYY-MM-DD     show the picture for a specific day
  list                browse recent pictures
  favorites           list saved favorites
  fav YYYY-MM-DD      fetch a day and save it as a favorite
  unfav YYYY-MM-DD    remove a favorite

Set NASA_API_KEY to use your own API key (defaults to DEMO_KEY).";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apod_reader=warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ServiceConfig::from_env();

    match args.first().map(String::as_str) {
        None | Some("today") => show_day(config, None).await,
        Some("date") => show_day(config, Some(date_arg(&args)?)).await,
        Some("list") => show_list(config).await,
        Some("favorites") => show_favorites(),
        Some("fav") => add_favorite(config, date_arg(&args)?).await,
        Some("unfav") => remove_favorite(date_arg(&args)?),
        Some("help") | Some("--help") | Some("-h") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(other) => {
            eprintln!("{USAGE}");
            bail!("unknown command: {other}");
        }
    }
}

fn date_arg(args: &[String]) -> Result<NaiveDate> {
    let raw = args
        .get(1)
        .ok_or_else(|| anyhow!("expected a date argument (YYYY-MM-DD)"))?;
    parse_date(raw).ok_or_else(|| anyhow!("invalid date '{raw}', expected YYYY-MM-DD"))
}

async fn show_day(config: ServiceConfig, date: Option<NaiveDate>) -> Result<()> {
    let client = ApodClient::new(config)?;
    let db = Database::new()?;
    let mut view = DayViewModel::new(client, db);

    if let Some(date) = date {
        view.set_selected_date(date);
    }
    view.fetch(date).await;

    if let Some(message) = &view.error_message {
        bail!("{message}");
    }
    if let Some(apod) = &view.current {
        print_apod(apod, view.is_favorite);
    }
    Ok(())
}

async fn show_list(config: ServiceConfig) -> Result<()> {
    let client = ApodClient::new(config)?;
    let db = Database::new()?;
    let mut view = ListViewModel::new(client, db);

    view.load_more().await;
    if let Some(message) = &view.error_message {
        bail!("{message}");
    }
    for apod in &view.items {
        let marker = if view.is_favorite(apod) { "*" } else { " " };
        println!("{marker} {}  {}", apod.date, apod.title);
    }
    Ok(())
}

fn show_favorites() -> Result<()> {
    let mut view = FavoritesViewModel::new(Database::new()?);
    view.refresh();
    if let Some(message) = &view.error_message {
        bail!("{message}");
    }
    if view.items.is_empty() {
        println!("No favorites saved yet.");
        return Ok(());
    }
    for favorite in &view.items {
        println!(
            "{}  {}  (favorited {})",
            favorite.apod.date,
            favorite.apod.title,
            favorite.favorited_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn add_favorite(config: ServiceConfig, date: NaiveDate) -> Result<()> {
    let client = ApodClient::new(config)?;
    let db = Database::new()?;

    let apod = client.fetch_one(Some(date)).await?;
    if db.add(&apod)? {
        println!("Added {} to favorites.", apod.date);
    } else {
        println!("{} is already a favorite.", apod.date);
    }
    Ok(())
}

fn remove_favorite(date: NaiveDate) -> Result<()> {
    let mut view = FavoritesViewModel::new(Database::new()?);
    view.refresh();
    if let Some(message) = &view.error_message {
        bail!("{message}");
    }

    let target: Option<Apod> = view
        .items
        .iter()
        .map(|f| f.apod.clone())
        .find(|a| parse_date(&a.date) == Some(date));
    match target {
        Some(apod) => {
            view.remove(&apod);
            println!("Removed {} from favorites.", apod.date);
            Ok(())
        }
        None => {
            println!("{date} is not a favorite.");
            Ok(())
        }
    }
}

fn print_apod(apod: &Apod, is_favorite: bool) {
    let marker = if is_favorite { " *" } else { "" };
    println!("{}  {}{marker}", apod.date, apod.title);
    if let Some(url) = &apod.url {
        println!("{url}");
    }
    if let Some(hdurl) = &apod.hdurl {
        println!("HD: {hdurl}");
    }
    println!();
    println!("{}", apod.explanation);
}
