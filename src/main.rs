use anyhow::{Context, bail};
use boxoffice::forecast::format_month;
use boxoffice::input::{DEFAULT_BUDGET, MAX_ACTORS, MAX_GENRES, MIN_BUDGET, NONE_SENTINEL};
use boxoffice::{ArtifactPaths, Forecast, Forecaster, MovieInput, RevenueModel, SuccessModel};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type LoadedForecaster = Forecaster<SuccessModel, RevenueModel>;

#[derive(Debug, Parser)]
#[command(name = "boxoffice", about = "🎬 Movie success and revenue predictor")]
struct Cli {
    /// Directory holding the model and reference table artifacts.
    #[arg(long, env = "BOXOFFICE_ARTIFACTS", default_value = "artifacts", global = true)]
    artifacts: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict a single movie.
    Predict {
        /// Production budget in dollars.
        #[arg(long, default_value_t = DEFAULT_BUDGET)]
        budget: u64,

        /// Genre, repeat for up to three.
        #[arg(long = "genre")]
        genres: Vec<String>,

        /// Top-billed actor, repeat for up to three, or "none".
        #[arg(long = "actor")]
        actors: Vec<String>,

        /// Director name, or "none".
        #[arg(long, default_value = NONE_SENTINEL)]
        director: String,

        /// Planned release month (1-12).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fill in the form interactively, one movie after another.
    Interactive,
    /// List the genres, actors and directors the models recognize.
    Options,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.artifacts.is_dir() {
        bail!("artifact directory {:?} does not exist", cli.artifacts);
    }
    let paths = ArtifactPaths::in_dir(&cli.artifacts);
    let forecaster = Forecaster::load(&paths)
        .with_context(|| format!("failed to load artifacts from {:?}", cli.artifacts))?;

    match cli.command {
        Command::Predict {
            budget,
            genres,
            actors,
            director,
            month,
            json,
        } => {
            let input = MovieInput::new(budget, genres, actors, director, month)?;
            let forecast = run(&forecaster, &input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&forecast.report())?);
            } else {
                print!("{forecast}");
            }
        }
        Command::Interactive => interactive(&forecaster)?,
        Command::Options => show_options(&forecaster),
    }

    Ok(())
}

fn run(forecaster: &LoadedForecaster, input: &MovieInput) -> anyhow::Result<Forecast> {
    forecaster
        .forecast(input)
        .context("model artifacts do not match the encoded features")
}

fn show_options(forecaster: &LoadedForecaster) {
    println!("🎭 Genres:");
    for genre in forecaster.genre_options() {
        println!("  {genre}");
    }
    println!("⭐ Top actors:");
    for actor in forecaster.roster().actors() {
        println!("  {actor}");
    }
    println!("🎬 Top directors:");
    for director in forecaster.roster().directors() {
        println!("  {director}");
    }
    println!(
        "📅 Strongest release month: {}",
        format_month(forecaster.months().best_month())
    );
}

const INTRO: &str = "\
🎬 Movie Success and Revenue Predictor
Success = at least 2× the production budget in box office revenue.
Suggestions are shown only when the success probability is below 60%.
Disclaimer: these are predictions based on historical movie data. \
Real-world results depend on many unpredictable factors.
Type 'exit' at any prompt to quit.
";

fn interactive(forecaster: &LoadedForecaster) -> anyhow::Result<()> {
    println!("{INTRO}");
    println!("Genres: {}", forecaster.genre_options().join(", "));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(input) = read_movie(&mut lines)? else {
            break;
        };
        match input {
            Ok(input) => {
                let forecast = run(forecaster, &input)?;
                println!("\n{forecast}");
            }
            Err(e) => println!("⚠️ {e}"),
        }
    }
    Ok(())
}

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

/// Reads one form. `None` means the user asked to exit.
fn read_movie(lines: &mut Lines<'_>) -> anyhow::Result<Option<anyhow::Result<MovieInput>>> {
    let Some(budget) = prompt(lines, &format!("Budget ($, min {MIN_BUDGET}) [{DEFAULT_BUDGET}]"))?
    else {
        return Ok(None);
    };
    let Some(genres) = prompt(lines, &format!("Genres, comma separated (up to {MAX_GENRES})"))?
    else {
        return Ok(None);
    };
    let Some(actors) = prompt(
        lines,
        &format!("Top billed actors, comma separated (up to {MAX_ACTORS}) [none]"),
    )?
    else {
        return Ok(None);
    };
    let Some(director) = prompt(lines, "Director [none]")? else {
        return Ok(None);
    };
    let Some(month) = prompt(lines, "Planned release month (1-12) [1]")? else {
        return Ok(None);
    };

    Ok(Some(parse_form(&budget, &genres, &actors, &director, &month)))
}

fn parse_form(
    budget: &str,
    genres: &str,
    actors: &str,
    director: &str,
    month: &str,
) -> anyhow::Result<MovieInput> {
    let budget = if budget.is_empty() {
        DEFAULT_BUDGET
    } else {
        budget
            .replace([',', '_', '$'], "")
            .parse()
            .with_context(|| format!("invalid budget `{budget}`"))?
    };
    let month = if month.is_empty() {
        1
    } else {
        month
            .parse()
            .with_context(|| format!("invalid month `{month}`"))?
    };
    let director = if director.is_empty() {
        NONE_SENTINEL
    } else {
        director
    };

    Ok(MovieInput::new(
        budget,
        split_list(genres),
        split_list(actors),
        director,
        month,
    )?)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn prompt(lines: &mut Lines<'_>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    let Some(line) = lines.next() else {
        return Ok(None);
    };
    let line = line?;
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}
