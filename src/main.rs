use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nongli::chinese::{Annus, fmt};
use nongli::{Date, Error, to_lunisolar};

#[derive(Parser)]
#[command(name = "nongli", version, about = "Chinese lunisolar calendar CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Log filter directives, e.g. `nongli=debug`; RUST_LOG takes precedence
    #[arg(long, global = true, env = "NONGLI_LOG")]
    log: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Gregorian dates to the lunisolar calendar
    Convert {
        /// Dates as YYYY-MM-DD (default: today)
        dates: Vec<NaiveDate>,
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// List the months of the 歲 ending in YEAR
    Months {
        year: i32,
    },
    /// List the 24 solar terms of the 歲 ending in YEAR
    Terms {
        year: i32,
    },
    /// Sexagenary (干支) name of lunar years
    Ganzhi {
        #[arg(required = true, allow_negative_numbers = true)]
        years: Vec<i32>,
    },
}

fn init_logging(cli: &Cli) {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let directives = cli.log.clone().unwrap_or_else(|| format!("nongli={level}"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn convert(dates: Vec<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let dates = if dates.is_empty() {
        vec![chrono::Local::now().date_naive()]
    } else {
        dates
    };
    for naive in dates {
        let date = Date::from(naive);
        match to_lunisolar(date) {
            Ok(lunar) if json => {
                println!("{}", serde_json::to_string(&lunar).context("serializing lunar date")?);
            }
            Ok(lunar) => println!("{date}  {lunar}"),
            Err(err @ Error::UnsupportedDate(_)) => {
                tracing::warn!(%date, %err, "falling back to Gregorian display");
                println!("{date}  {}", fmt::gregorian(date, true));
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn months(year: i32) -> anyhow::Result<()> {
    let annus = Annus::new(year).with_context(|| format!("no calendar for {year}"))?;
    // 末項為次歲十一月，不列
    for pair in annus.months.windows(2) {
        let (this, next) = (pair[0], pair[1]);
        println!("{}  {}  {} days", this.date, this.month.name()?, next.date - this.date);
    }
    Ok(())
}

fn terms(year: i32) -> anyhow::Result<()> {
    let annus = Annus::new(year).with_context(|| format!("no calendar for {year}"))?;
    for (term, date) in annus.solar_terms() {
        println!("{date}  {}", fmt::solar_term(term)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Convert { dates, json } => convert(dates, json),
        Commands::Months { year } => months(year),
        Commands::Terms { year } => terms(year),
        Commands::Ganzhi { years } => {
            for year in years {
                println!("{year}  {}", nongli::sexagenary_year(year));
            }
            Ok(())
        }
    }
}
