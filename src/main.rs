use anyhow::Context;
use clap::{Parser, Subcommand};
use djadb_catalog::{
    catalog::{
        circle_counts, circle_feature_label, genre_slug_for_tag, related_tags, tag_counts,
        CircleSpotlight, DailyPicks, SaleHighlights,
    },
    config::{Config, ObservabilityConfig},
    derived::{discount_label, format_price, format_rating, sale_time_remaining, unit_price},
    loader::{create_source, FeatureCatalog, FeatureSources, IndexRepository, LoadState, RecordSet},
    models::{FeatureWork, SearchRecord},
    producer,
    search::{PriceCeiling, RecordFilter, SearchQuery, SearchService, SortStrategy},
    AppError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "djadb")]
#[command(version, about = "DJ-ADB catalog search", long_about = None)]
struct Cli {
    /// Configuration file (overrides $CONFIG_PATH)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Index document path or URL (overrides configuration)
    #[arg(short, long, global = true, env = "DJADB_INDEX")]
    index: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search works
    Search {
        /// Free text; space separated words must all match
        #[arg(default_value = "")]
        query: String,

        /// rank, new, discount, price, rating, review_count, deadline
        #[arg(short, long, default_value = "rank")]
        sort: String,

        /// Price ceiling: all, 100, 300, 500, 1000, 1500, 2000
        #[arg(short, long, default_value = "all")]
        max: String,

        /// Only works on sale
        #[arg(long)]
        sale: bool,

        /// Only works carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only works from this circle
        #[arg(long)]
        circle: Option<String>,

        #[arg(short, long, default_value = "20")]
        limit: usize,

        #[arg(short, long, default_value = "0")]
        offset: usize,
    },

    /// Show one work
    Show {
        #[arg(value_name = "WORK_ID")]
        id: u64,
    },

    /// List circles by work count
    Circles {
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// List tags by work count, or tags related to one tag
    Tags {
        /// Show tags co-occurring with this tag
        #[arg(short, long)]
        related: Option<String>,

        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show curated feature pages
    Features {
        #[command(subcommand)]
        view: FeatureView,
    },

    /// Generate the index document from the catalog data cache
    BuildIndex {
        /// Directory holding works.json and circles.json
        #[arg(long)]
        catalog_dir: Option<PathBuf>,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FeatureView {
    /// List circle spotlights
    Circles,

    /// Show one circle spotlight
    Circle {
        #[arg(value_name = "SLUG")]
        slug: String,
    },

    /// Show the latest daily recommendation
    Daily,

    /// Show the latest sale feature
    Sale,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<AppError>()
            .map(AppError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(AppError::from)?;

    if let Some(index) = cli.index.clone() {
        config.index.location = index;
    }

    init_tracing(&config.observability);
    tracing::debug!("Starting djadb v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = djadb_catalog::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
        }
    }

    match cli.command {
        Commands::BuildIndex {
            catalog_dir,
            output,
        } => build_index(&config, catalog_dir, output).await,
        command => query_index(&config, command, cli.json).await,
    }
}

async fn build_index(
    config: &Config,
    catalog_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut producer_config = config.producer.clone();
    if let Some(dir) = catalog_dir {
        producer_config.catalog_dir = dir;
    }
    if let Some(output) = output {
        producer_config.output = output;
    }

    let count = producer::run(&producer_config)
        .await
        .with_context(|| format!("building index from {}", producer_config.catalog_dir.display()))?;
    println!(
        "Generated {} records → {}",
        count,
        producer_config.output.display()
    );
    Ok(())
}

async fn query_index(config: &Config, command: Commands, json: bool) -> anyhow::Result<()> {
    let source = create_source(&config.index).map_err(AppError::from)?;
    let repository = Arc::new(IndexRepository::new(source));
    let service = SearchService::new(repository.clone(), config.search.clone())
        .map_err(AppError::from)?;

    let records = repository.ensure_loaded().await;
    if let LoadState::Failed { reason } = repository.state() {
        tracing::warn!(%reason, "Continuing with an empty catalog");
    }

    match command {
        Commands::Search {
            query,
            sort,
            max,
            sale,
            tag,
            circle,
            limit,
            offset,
        } => {
            let mut filters = RecordFilter::new()
                .on_sale_only(sale)
                .max_price(PriceCeiling::from_token(&max));
            filters.tag = tag;
            filters.circle = circle;

            let query = SearchQuery::new(query)
                .with_filters(filters)
                .with_sort(SortStrategy::from_token(&sort))
                .with_limit(limit)
                .with_offset(offset);
            let response = service.search(&query).await.map_err(AppError::from)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "{} works ({} / {}, {} ms)",
                    response.total_hits,
                    query.sort.label(),
                    query.filters.max_price.label(),
                    response.search_time_ms
                );
                for hit in &response.hits {
                    println!("{}", summary_line(&hit.record));
                }
            }
        }

        Commands::Show { id } => {
            let record = service.get(id).await.map_err(AppError::from)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_details(&record);
            }
        }

        Commands::Circles { limit } => {
            let mut circles = circle_counts(&records);
            circles.truncate(limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&circles)?);
            } else {
                for circle in circles {
                    println!("{:>5}  {}", circle.count, circle.name);
                }
            }
        }

        Commands::Tags { related, limit } => {
            let tags = match related.as_deref() {
                Some(tag) => related_tags(&records, tag, limit),
                None => {
                    let mut tags = tag_counts(&records);
                    tags.truncate(limit);
                    tags
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                if let Some(slug) = related.as_deref().and_then(genre_slug_for_tag) {
                    println!("genre feature: /features/genre/{}", slug);
                }
                for tag in tags {
                    println!("{:>5}  {}", tag.count, tag.name);
                }
            }
        }

        Commands::Features { view } => show_features(config, &records, view, json).await?,

        Commands::BuildIndex { .. } => {}
    }

    Ok(())
}

async fn show_features(
    config: &Config,
    records: &RecordSet,
    view: FeatureView,
    json: bool,
) -> anyhow::Result<()> {
    let sources = FeatureSources::from_config(&config.features).map_err(AppError::from)?;
    let features = FeatureCatalog::load(&sources).await;

    match view {
        FeatureView::Circles => {
            if json {
                println!("{}", serde_json::to_string_pretty(features.circle_features())?);
            } else {
                for feature in features.circle_features() {
                    println!(
                        "{:<24}  {}  ({} works)",
                        feature.slug,
                        circle_feature_label(feature),
                        feature.works.len()
                    );
                }
            }
        }

        FeatureView::Circle { slug } => {
            let feature = features
                .circle_feature_by_slug(&slug)
                .ok_or_else(|| AppError::NotFound(format!("circle feature {slug}")))?;
            let spotlight = CircleSpotlight::resolve(feature, records);
            if json {
                println!("{}", serde_json::to_string_pretty(&spotlight)?);
            } else {
                println!("{}特集", spotlight.label);
                println!("{}", spotlight.headline);
                if !spotlight.description.is_empty() {
                    println!("{}", spotlight.description);
                }
                print_feature_works(&spotlight.works);
            }
        }

        FeatureView::Daily => match features.latest_daily_recommendation() {
            Some(recommendation) => {
                let picks = DailyPicks::resolve(recommendation, records);
                if json {
                    println!("{}", serde_json::to_string_pretty(&picks)?);
                } else {
                    println!("{} 更新  {}", picks.target_date, picks.headline);
                    print_feature_works(&picks.works);
                }
            }
            None => println!("No daily recommendation available"),
        },

        FeatureView::Sale => match features.latest_sale_feature() {
            Some(feature) => {
                let highlights = SaleHighlights::resolve(feature, records);
                if json {
                    println!("{}", serde_json::to_string_pretty(&highlights)?);
                } else {
                    if let Some(date) = feature.target_date {
                        println!("{} 更新", date);
                    }
                    if let Some(headline) = feature.main_headline.as_deref() {
                        println!("{}", headline);
                    }
                    if let Some(main) = &highlights.main {
                        println!("main:");
                        print_feature_works(std::slice::from_ref(main));
                    }
                    for (label, works) in [
                        ("picks", &highlights.sub),
                        ("cheapest", &highlights.cheapest),
                        ("high discount", &highlights.high_discount),
                        ("high rating", &highlights.high_rating),
                    ] {
                        if !works.is_empty() {
                            println!("{label}:");
                            print_feature_works(works);
                        }
                    }
                }
            }
            None => println!("No sale feature available"),
        },
    }

    Ok(())
}

fn print_feature_works(works: &[FeatureWork]) {
    for work in works {
        let summary = work.summary();
        let mut line = format!(
            "{:>8}  {}  [{}]  {}",
            summary.id,
            summary.title,
            summary.circle_name,
            format_price(summary.price)
        );
        if let Some(label) = work.sale().and_then(|sale| discount_label(Some(sale.discount_rate.get()))) {
            line.push_str(&format!(" ({label})"));
        }
        println!("{line}");
    }
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("djadb_catalog={0},djadb={0}", observability.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn summary_line(record: &SearchRecord) -> String {
    let mut line = format!(
        "{:>8}  {}  [{}]  {}",
        record.id,
        record.title,
        record.circle_name,
        format_price(record.current_price)
    );
    if let Some(label) = discount_label(record.discount_rate) {
        line.push_str(&format!(" ({label})"));
    }
    if let Some(rank) = record.rank.filter(|_| record.has_rank_badge()) {
        line.push_str(&format!("  #{rank}"));
    }
    line
}

fn print_details(record: &SearchRecord) {
    let now = chrono::Utc::now();

    println!("{}", record.title);
    println!("  id:       {}", record.id);
    println!("  circle:   {}", record.circle_name);
    if !record.author_name.is_empty() {
        println!("  author:   {}", record.author_name);
    }
    match discount_label(record.discount_rate) {
        Some(label) => println!(
            "  price:    {} (was {}, {})",
            format_price(record.current_price),
            format_price(record.list_price),
            label
        ),
        None => println!("  price:    {}", format_price(record.current_price)),
    }
    if let Some(per_page) = unit_price(record) {
        println!("  pages:    {} ({})", record.page_count, per_page);
    }
    println!(
        "  rating:   {} ({} reviews)",
        format_rating(record.rating),
        record.review_count.unwrap_or(0)
    );
    if let Some(rank) = record.rank {
        println!("  rank:     #{}", rank);
    }
    if let Some(left) = sale_time_remaining(record, now) {
        println!("  sale:     {}", left);
    }
    if !record.tags.is_empty() {
        println!("  tags:     {}", record.tags.join(", "));
    }
}
