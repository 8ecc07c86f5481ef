use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use liked_analyzer_rust::config::{Config, OutputFormat};
use liked_analyzer_rust::dataset::{ChannelSelection, DateField, DateRange, Dataset, FilterChain};
use liked_analyzer_rust::{compute_view, load_library, normalize_all, report};

fn cli() -> Command {
    Command::new("Liked Videos Analyzer (Rust)")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Filterable statistics over a liked-videos library export")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Liked videos JSON export (defaults to the configured library path)"),
        )
        .arg(date_arg("published-from", "Earliest channel publish date (YYYY-MM-DD)"))
        .arg(date_arg("published-to", "Latest channel publish date (YYYY-MM-DD)"))
        .arg(date_arg("liked-from", "Earliest date added to liked videos (YYYY-MM-DD)"))
        .arg(date_arg("liked-to", "Latest date added to liked videos (YYYY-MM-DD)"))
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .value_name("TEXT")
                .help("Search video titles or channels"),
        )
        .arg(
            Arg::new("channel")
                .short('c')
                .long("channel")
                .value_name("NAME")
                .help("Only show videos from this channel")
                .default_value("All"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: text or json"),
        )
        .arg(
            Arg::new("rows")
                .long("rows")
                .help("Include the filtered videos in the report")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-channels")
                .long("list-channels")
                .help("Print the channels available under the current filters and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Serve the view over HTTP (requires the `api` feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("HTTP port for --serve"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
}

fn date_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("DATE").help(help)
}

fn parse_date(matches: &ArgMatches, name: &str) -> Result<Option<NaiveDate>> {
    matches
        .get_one::<String>(name)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("--{} expects YYYY-MM-DD, got {:?}", name, s))
        })
        .transpose()
}

fn date_range(
    matches: &ArgMatches,
    dataset: &Dataset,
    field: DateField,
    from_arg: &str,
    to_arg: &str,
) -> Result<Option<DateRange>> {
    let from = parse_date(matches, from_arg)?;
    let to = parse_date(matches, to_arg)?;
    Ok(dataset.resolve_range(field, from, to)?)
}

fn build_chain(matches: &ArgMatches, dataset: &Dataset) -> Result<FilterChain> {
    Ok(FilterChain {
        published: date_range(matches, dataset, DateField::PublishedAt, "published-from", "published-to")?,
        liked: date_range(matches, dataset, DateField::LikedAt, "liked-from", "liked-to")?,
        query: matches.get_one::<String>("search").cloned().unwrap_or_default(),
        channel: matches
            .get_one::<String>("channel")
            .map(|c| ChannelSelection::parse(c))
            .unwrap_or_default(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let config_result = Config::load();
    let mut config = config_result.unwrap_or_default();

    let verbose = matches.get_flag("verbose");
    let level = if verbose { "debug" } else { config.output.log_level.as_str() };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("liked_analyzer_rust={},warn", level))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(input) = matches.get_one::<String>("input") {
        config.input.library_path = PathBuf::from(input);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = format.parse()?;
    }
    if let Some(port) = matches.get_one::<String>("port") {
        config.api.port = port.parse().context("--port expects a number")?;
    }
    config.output.show_rows |= matches.get_flag("rows");

    config.validate()?;
    info!("🚀 Liked Videos Analyzer (Rust) starting...");
    info!("{}", config.summary());

    let records = load_library(&config.input.library_path).await?;
    let dataset = Dataset::new(normalize_all(&records));
    info!("📊 {} videos available for analysis", dataset.total());

    if dataset.is_empty() {
        warn!("The dataset is empty or invalid");
    }

    if matches.get_flag("serve") {
        return serve(dataset, config).await;
    }

    let chain = build_chain(&matches, &dataset)?;

    if matches.get_flag("list-channels") {
        let mut without_channel = chain.clone();
        without_channel.channel = ChannelSelection::All;
        for option in liked_analyzer_rust::dataset::channel_options(&dataset.filter(&without_channel)) {
            println!("{}", option);
        }
        return Ok(());
    }

    let view = compute_view(&dataset, &chain, &config.analytics);

    match config.output.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print!("{}", report::render_text(&view, config.output.show_rows)),
    }

    Ok(())
}

#[cfg(feature = "api")]
async fn serve(dataset: Dataset, config: Config) -> Result<()> {
    use liked_analyzer_rust::api::ApiServer;
    use std::sync::Arc;

    let port = config.api.port;
    ApiServer::new(Arc::new(dataset), Arc::new(config), port)
        .start_background()
        .await?
}

#[cfg(not(feature = "api"))]
async fn serve(_dataset: Dataset, _config: Config) -> Result<()> {
    Err(anyhow::anyhow!("--serve requires building with the `api` feature"))
}
