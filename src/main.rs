use anyhow::Context;
use arso_archive::{
    render_table, write_csv, ApiCategory, Arso, ParameterDescriptor, StationDescriptor,
    StationKind,
};
use chrono::NaiveDate;
use clap::Parser;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Interactively queries the Slovenian environment agency's meteorological
/// archive and prints the result as a table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Archive base URL, for testing against a local mirror.
    #[arg(long)]
    base_url: Option<String>,

    /// Expected data points per request; lower values mean more, smaller
    /// requests.
    #[arg(long)]
    target_points: Option<f64>,

    /// Also write the table to this CSV file.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let arso = Arso::builder().maybe_base_url(cli.base_url).build();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let category = pick_category(&mut input)?;
    let catalog = arso
        .catalog_for(category)
        .await
        .context("failed to fetch the dataset catalog")?;
    anyhow::ensure!(
        !catalog.is_empty(),
        "the catalog lists no {category} parameters"
    );
    let parameters = pick_parameters(&mut input, &catalog)?;
    let (date_from, date_to) = pick_dates(&mut input)?;

    let kinds: Vec<StationKind> = parameters
        .iter()
        .flat_map(|p| p.station_kinds.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let available = arso
        .stations()
        .date_from(date_from)
        .date_to(date_to)
        .kinds(&kinds)
        .call()
        .await
        .context("failed to fetch the station list")?;
    anyhow::ensure!(
        !available.is_empty(),
        "no matching stations reported between {date_from} and {date_to}"
    );
    let stations = pick_stations(&mut input, &available)?;

    let table = arso
        .observations()
        .category(category)
        .parameters(&parameters)
        .stations(&stations)
        .date_from(date_from)
        .date_to(date_to)
        .maybe_target_chunk_points(cli.target_points)
        .call()
        .await
        .context("failed to fetch measurements")?;

    print!("{}", render_table(&table));
    if let Some(path) = &cli.output {
        write_csv(&table, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

fn pick_category(input: &mut impl BufRead) -> anyhow::Result<ApiCategory> {
    println!("Dataset cadences:");
    for (i, category) in ApiCategory::ALL.iter().enumerate() {
        println!("  {}. {category}", i + 1);
    }
    loop {
        let answer = prompt(input, "Pick a cadence")?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=ApiCategory::ALL.len()).contains(&n) => {
                return Ok(ApiCategory::ALL[n - 1]);
            }
            _ => println!("Enter a number between 1 and {}.", ApiCategory::ALL.len()),
        }
    }
}

fn pick_parameters(
    input: &mut impl BufRead,
    catalog: &[ParameterDescriptor],
) -> anyhow::Result<Vec<ParameterDescriptor>> {
    println!("Parameters:");
    for (i, parameter) in catalog.iter().enumerate() {
        let unit = parameter
            .unit
            .as_deref()
            .map(|u| format!(" [{u}]"))
            .unwrap_or_default();
        println!(
            "  {}. {} - {}{unit}",
            i + 1,
            parameter.group_description,
            parameter.long_label
        );
    }
    loop {
        let answer = prompt(input, "Pick parameters (e.g. 1,3-5)")?;
        match parse_index_list(&answer, catalog.len()) {
            Some(indexes) => {
                return Ok(indexes.into_iter().map(|i| catalog[i].clone()).collect());
            }
            None => println!("Enter indexes between 1 and {}.", catalog.len()),
        }
    }
}

fn pick_dates(input: &mut impl BufRead) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    loop {
        let from = loop {
            let answer = prompt(input, "From date (e.g. 2018-01-01 or 2018)")?;
            match parse_date(&answer, false) {
                Some(date) => break date,
                None => println!("Unrecognized date."),
            }
        };
        let to = loop {
            let answer = prompt(input, "To date")?;
            match parse_date(&answer, true) {
                Some(date) => break date,
                None => println!("Unrecognized date."),
            }
        };
        if from <= to {
            return Ok((from, to));
        }
        println!("{from} is after {to}, try again.");
    }
}

fn pick_stations(
    input: &mut impl BufRead,
    available: &[StationDescriptor],
) -> anyhow::Result<Vec<StationDescriptor>> {
    println!("Stations:");
    for (i, station) in available.iter().enumerate() {
        let altitude = station
            .altitude
            .map(|alt| format!(", {alt} m"))
            .unwrap_or_default();
        println!(
            "  {}. {} ({}{altitude})",
            i + 1,
            station.name,
            station.kind.label()
        );
    }
    loop {
        let answer = prompt(input, "Pick stations (e.g. 1,3-5)")?;
        match parse_index_list(&answer, available.len()) {
            Some(indexes) => {
                return Ok(indexes.into_iter().map(|i| available[i].clone()).collect());
            }
            None => println!("Enter indexes between 1 and {}.", available.len()),
        }
    }
}

/// Parses a 1-based selection like `1,3-5` into sorted, deduplicated 0-based
/// indexes. `None` on any malformed or out-of-range piece.
fn parse_index_list(answer: &str, len: usize) -> Option<Vec<usize>> {
    let mut indexes = BTreeSet::new();
    for piece in answer.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (lo, hi) = match piece.split_once('-') {
            Some((lo, hi)) => (lo.trim().parse().ok()?, hi.trim().parse().ok()?),
            None => {
                let n: usize = piece.parse().ok()?;
                (n, n)
            }
        };
        if lo < 1 || hi > len || lo > hi {
            return None;
        }
        indexes.extend(lo - 1..hi);
    }
    if indexes.is_empty() {
        None
    } else {
        Some(indexes.into_iter().collect())
    }
}

/// Accepts `2018-01-31`, `31.1.2018`, `1/31/2018`, or a bare year. A bare
/// year means January 1st, or December 31st when it bounds the end of the
/// range.
fn parse_date(answer: &str, end_of_range: bool) -> Option<NaiveDate> {
    let answer = answer.trim();
    if let Ok(year) = answer.parse::<i32>() {
        let (month, day) = if end_of_range { (12, 31) } else { (1, 1) };
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    for format in ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(answer, format) {
            return Some(date);
        }
    }
    None
}
