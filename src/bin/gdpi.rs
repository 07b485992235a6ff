use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gdp_insights::engine::DataSink;
use gdp_insights::sink::{ConsoleSink, JsonFileSink, save_long_csv};
use gdp_insights::source::source_for_path;
use gdp_insights::{analytics, filter, reshape};
use gdp_insights::{Config, DateRange, Engine, ResultsBundle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gdpi",
    version,
    about = "Reshape, clean, filter & summarize country-level GDP data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full eight-analysis report for the configured selection.
    Report(ReportArgs),
    /// Legacy scalar path: a single sum/average over the filtered records.
    Aggregate(AggregateArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Wide-format data file (.csv or .json).
    #[arg(short = 'f', long)]
    data: PathBuf,
    /// JSON configuration file; individual flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Region: one or more continents joined by '&' or ',' (e.g. "Asia & Europe").
    #[arg(short, long)]
    region: Option<String>,
    /// Year for the single-year selection.
    #[arg(short, long)]
    year: Option<i32>,
    /// Optional country filter (case-insensitive).
    #[arg(long)]
    country: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Year window for trend analyses as YYYY:YYYY (default 2000:2020).
    #[arg(short = 'd', long)]
    date_range: Option<String>,
    /// Window length for the consistent-decline analysis (default 5).
    #[arg(long)]
    decline_years: Option<u32>,
    /// Also save the results bundle as pretty JSON.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Also save the cleaned long-format records as CSV.
    #[arg(long)]
    dump_long: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Aggregation operation: sum or average.
    #[arg(short, long)]
    operation: Option<String>,
}

fn parse_range(s: &str) -> Option<DateRange> {
    let (a, b) = s.split_once(':')?;
    let start = a.parse::<i32>().ok()?;
    let end = b.parse::<i32>().ok()?;
    Some(DateRange::new(start, end))
}

/// Merge the config file (when given) with CLI overrides.
fn resolve_config(common: &CommonArgs) -> Result<Config> {
    let mut cfg = match &common.config {
        Some(path) => Config::from_path(path)?,
        None => {
            let (Some(region), Some(year)) = (&common.region, common.year) else {
                anyhow::bail!("without --config, both --region and --year are required");
            };
            Config {
                region: region.clone(),
                year,
                operation: "sum".into(),
                date_range: DateRange::new(2000, 2020),
                decline_years: 5,
                country: None,
            }
        }
    };
    if let Some(region) = &common.region {
        cfg.region = region.clone();
    }
    if let Some(year) = common.year {
        cfg.year = year;
    }
    if let Some(country) = &common.country {
        cfg.country = Some(country.clone());
    }
    Ok(cfg)
}

/// Console plus optional JSON file, so the engine still hands the bundle to
/// a single injected sink.
struct CliSink {
    console: ConsoleSink,
    json: Option<JsonFileSink>,
}

impl DataSink for CliSink {
    fn write(&mut self, results: &ResultsBundle) -> Result<()> {
        self.console.write(results)?;
        if let Some(json) = &mut self.json {
            json.write(results)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Report(args) => cmd_report(args),
        Command::Aggregate(args) => cmd_aggregate(args),
    }
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let mut config = resolve_config(&args.common)?;
    if let Some(range) = &args.date_range {
        config.date_range = parse_range(range)
            .ok_or_else(|| anyhow::anyhow!("invalid --date-range, expected YYYY:YYYY"))?;
    }
    if let Some(n) = args.decline_years {
        config.decline_years = n;
    }

    let source = source_for_path(&args.common.data)?;
    let rows = source.read()?;
    source.validate(&rows)?;

    let sink = CliSink {
        console: ConsoleSink,
        json: args.out.as_ref().map(JsonFileSink::new),
    };
    let mut engine = Engine::new(sink, config);
    let outcome = engine.execute(rows)?;

    if let Some(path) = args.dump_long.as_ref() {
        save_long_csv(&outcome.cleaned, path)?;
        eprintln!(
            "Saved {} long-format records to {}",
            outcome.cleaned.len(),
            path.display()
        );
    }
    if let Some(e) = outcome.sink_error {
        eprintln!("Warning: sink failed after analysis completed: {:#}", e);
    }
    Ok(())
}

fn cmd_aggregate(args: AggregateArgs) -> Result<()> {
    let mut config = resolve_config(&args.common)?;
    if let Some(op) = &args.operation {
        config.operation = op.clone();
    }

    let source = source_for_path(&args.common.data)?;
    let rows = source.read()?;
    source.validate(&rows)?;

    let long = reshape::reshape(&rows)?;
    let cleaned = reshape::clean(long);
    let filtered = filter::filter_records(&cleaned, &config);
    if filtered.is_empty() {
        anyhow::bail!(gdp_insights::PipelineError::NoMatch {
            region: config.region.clone(),
            year: config.year,
        });
    }

    let value = analytics::scalar_aggregate(&filtered, &config.operation)?;
    println!(
        "{} GDP for {} in {}: {:.2}",
        config.operation.to_uppercase(),
        config.region,
        config.year,
        value
    );
    Ok(())
}
