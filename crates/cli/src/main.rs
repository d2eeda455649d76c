use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use heuristic::{CollegePredictor, Recommendation};
use ml_model::{AdmissionQuery, AdmissionStatus, CollegePredictionModel};
use server::config::{DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::warn;

/// College Recs - admission chances from historical cutoffs
#[derive(Parser)]
#[command(name = "college-recs")]
#[command(about = "College recommendations and admission predictions from seat-allocation cutoffs", long_about = None)]
struct Cli {
    /// Path to the cutoff table (CSV)
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Path to the trained model artifact (JSON)
    #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the values each predictor accepts
    Options,

    /// Rank colleges for a student's rank and category
    Recommend {
        #[arg(long)]
        rank: u32,

        #[arg(long)]
        category: String,

        /// Number of colleges to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Predict the admission chance for one institute and branch
    Predict {
        #[arg(long)]
        rank: u32,

        #[arg(long)]
        year: u16,

        #[arg(long)]
        round: u8,

        #[arg(long)]
        category: String,

        #[arg(long)]
        quota: String,

        #[arg(long)]
        gender: String,

        #[arg(long)]
        institute_type: String,

        #[arg(long)]
        institute_name: String,

        #[arg(long)]
        branch: String,

        /// Person-with-disability seat
        #[arg(long)]
        pwd: bool,
    },

    /// Run benchmark to test recommendation latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Options => handle_options(&cli.data, &cli.model)?,
        Commands::Recommend {
            rank,
            category,
            limit,
        } => handle_recommend(&cli.data, rank, &category, limit)?,
        Commands::Predict {
            rank,
            year,
            round,
            category,
            quota,
            gender,
            institute_type,
            institute_name,
            branch,
            pwd,
        } => {
            let query = AdmissionQuery {
                student_rank: rank,
                year,
                round,
                category,
                quota,
                gender,
                institute_type,
                institute_name,
                branch,
                is_pwd: pwd,
            };
            handle_predict(&cli.model, &query)?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&cli.data, requests, concurrent).await?,
    }

    Ok(())
}

fn load_predictor(path: &Path) -> Result<CollegePredictor> {
    println!("Loading cutoff table from {}...", path.display());
    let start = Instant::now();
    let predictor = CollegePredictor::load_model_and_data(path)
        .with_context(|| format!("Failed to load cutoff table {}", path.display()))?;
    println!("{} Loaded cutoff table in {:?}", "✓".green(), start.elapsed());
    Ok(predictor)
}

fn load_model(path: &Path) -> Result<CollegePredictionModel> {
    CollegePredictionModel::load_model(path)
        .with_context(|| format!("Failed to load model {}", path.display()))
}

/// Handle the 'options' command
///
/// Either source may be missing; whatever loads is printed.
fn handle_options(data: &Path, model: &Path) -> Result<()> {
    let predictor = load_predictor(data);
    let ml = load_model(model);

    if let Err(e) = &predictor {
        warn!("{:#}", e);
    }
    if let Err(e) = &ml {
        warn!("{:#}", e);
    }
    if predictor.is_err() && ml.is_err() {
        return Err(anyhow!("Neither the cutoff table nor the model could be loaded"));
    }

    if let Ok(predictor) = predictor {
        println!("{}", "Heuristic options:".bold().blue());
        for (name, values) in predictor.unique_values() {
            println!("{}{}: {}", "• ".green(), name, summarize(values));
        }
    }

    if let Ok(model) = ml {
        println!("{}", "ML model options:".bold().blue());
        for (feature, classes) in model.options() {
            println!("{}{}: {}", "• ".cyan(), feature, summarize(&classes));
        }
    }
    Ok(())
}

fn summarize(values: &[String]) -> String {
    const SHOWN: usize = 8;
    if values.len() <= SHOWN {
        values.join(", ")
    } else {
        format!("{}, ... ({} total)", values[..SHOWN].join(", "), values.len())
    }
}

/// Handle the 'recommend' command
fn handle_recommend(data: &Path, rank: u32, category: &str, limit: usize) -> Result<()> {
    let predictor = load_predictor(data)?;
    let recommendations = predictor.get_recommendations_by_rank(rank, category, limit)?;

    if recommendations.is_empty() {
        println!("No suitable recommendations found for your rank and category.");
        return Ok(());
    }
    print_recommendations(&recommendations);
    Ok(())
}

/// Handle the 'predict' command
fn handle_predict(model: &Path, query: &AdmissionQuery) -> Result<()> {
    let model = load_model(model)?;
    let prediction = model.get_admission_probability(query)?;

    let status = match prediction.status {
        AdmissionStatus::High => prediction.status.label().green(),
        AdmissionStatus::Moderate => prediction.status.label().yellow(),
        AdmissionStatus::Low => prediction.status.label().red(),
    };

    println!(
        "{}",
        format!("{} - {}", prediction.institute_name, prediction.branch)
            .bold()
            .blue()
    );
    println!("{}Status: {}", "• ".green(), status.bold());
    println!("{}Your rank: {}", "• ".green(), prediction.student_rank);
    println!("{}Predicted cutoff: {}", "• ".green(), prediction.predicted_cutoff);
    println!(
        "{}Admission probability: {:.1}%",
        "• ".green(),
        prediction.admission_probability
    );
    println!("{}Recommendation: {}", "• ".cyan(), prediction.recommendation);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(data: &Path, requests: usize, concurrent: usize) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be greater than zero"));
    }

    let predictor = Arc::new(load_predictor(data)?);
    let categories = predictor.categories().to_vec();
    if categories.is_empty() {
        return Err(anyhow!("Cutoff table has no categories"));
    }
    let max_rank = predictor
        .index()
        .records()
        .iter()
        .map(|r| r.closing_rank)
        .max()
        .unwrap_or(1)
        .max(1);

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for _ in 0..requests {
        let rank = rand::random_range(1..=max_rank);
        let category = categories[rand::random_range(0..categories.len())].clone();
        let predictor = predictor.clone();
        let semaphore = semaphore.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || {
                predictor.get_recommendations_by_rank(rank, &category, heuristic::DEFAULT_TOP_N)
            })
            .await
            .context("Recommendation task panicked")??;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_clock.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    println!("{}", "College Recommendations:".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - {} [{}, {}] - Chance: {:.1}%",
            (i + 1).to_string().green(),
            rec.institute_name,
            rec.branch,
            rec.quota,
            rec.gender,
            rec.probability
        );
        println!(
            "   Opening: {} | Closing: {} ({} round {})",
            rec.opening_rank, rec.closing_rank, rec.year, rec.round
        );
    }
}
