use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod adapters;
mod constants;
mod db;
mod models;
mod normalize;
mod probability;
mod rank;
mod report;
mod scoring;
mod stats;

use models::{
    ApplicantRecord, HistoricalDistribution, InstitutionMetrics, Prediction, SchoolMatch, Tier,
};

#[derive(Parser)]
#[command(name = "admitpath")]
#[command(about = "Admission competitiveness scoring for AdmitPath", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import applicants or institutions from a CSV file
    #[command(group(
        ArgGroup::new("source")
            .args(["applicants", "institutions"])
            .required(true)
            .multiple(false)
    ))]
    Import {
        #[arg(long)]
        applicants: Option<PathBuf>,
        #[arg(long)]
        institutions: Option<PathBuf>,
    },
    /// Predict admission chances for one applicant at one institution
    Predict {
        #[arg(long)]
        email: String,
        #[arg(long)]
        institution: String,
        #[arg(long)]
        json: bool,
    },
    /// Rank applicants by overall score
    Rank {
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Build a tiered school list for one applicant
    Recommend {
        #[arg(long)]
        email: String,
    },
    /// Generate a markdown report for one applicant
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import {
            applicants,
            institutions,
        } => {
            if let Some(csv) = applicants {
                let upserted = db::import_applicants_csv(&pool, &csv).await?;
                println!("Upserted {upserted} applicants from {}.", csv.display());
            } else if let Some(csv) = institutions {
                let upserted = db::import_institutions_csv(&pool, &csv).await?;
                println!("Upserted {upserted} institutions from {}.", csv.display());
            }
        }
        Commands::Predict {
            email,
            institution,
            json,
        } => {
            let applicant = db::fetch_applicant_by_email(&pool, &email).await?;
            let institution_record = db::fetch_institution_by_name(&pool, &institution).await?;
            let history = load_history(&pool).await?;

            let metrics = adapters::applicant_metrics(&applicant);
            let institution_metrics = adapters::institution_metrics(&institution_record);
            let prediction = probability::evaluate(&metrics, &institution_metrics, &history);

            if json {
                #[derive(serde::Serialize)]
                struct PredictionJson<'a> {
                    applicant_id: uuid::Uuid,
                    applicant: &'a str,
                    institution_id: uuid::Uuid,
                    institution: &'a str,
                    #[serde(flatten)]
                    prediction: &'a Prediction,
                }
                let output = PredictionJson {
                    applicant_id: applicant.id,
                    applicant: &applicant.email,
                    institution_id: institution_record.id,
                    institution: &institution_record.name,
                    prediction: &prediction,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{} at {}: overall {:.1} (academic {:.1}, activity {:.1}, award {:.1})",
                    applicant.full_name,
                    institution_record.name,
                    prediction.breakdown.overall,
                    prediction.breakdown.academic,
                    prediction.breakdown.activity,
                    prediction.breakdown.award
                );
                println!(
                    "Admission probability: {:.0}% ({})",
                    prediction.probability * 100.0,
                    prediction.tier.label()
                );
                println!("Data confidence: {}", prediction.confidence.label());
            }
        }
        Commands::Rank {
            cohort,
            institution,
            limit,
        } => {
            let applicants = db::fetch_applicants(&pool, cohort.as_deref(), None).await?;
            let institution_metrics = match institution {
                Some(name) => adapters::institution_metrics(
                    &db::fetch_institution_by_name(&pool, &name).await?,
                ),
                None => InstitutionMetrics::default(),
            };
            let history = load_history(&pool).await?;
            let ranked = rank::rank_cohort(&applicants, &institution_metrics, &history);

            if ranked.is_empty() {
                println!("No applicants found for this scope.");
                return Ok(());
            }

            println!("Applicants by overall score:");
            for entry in ranked.iter().take(limit) {
                println!(
                    "{}. {} ({}, {}) overall {:.1} (academic {:.1}, activity {:.1}, award {:.1})",
                    entry.rank,
                    entry.full_name,
                    entry.email,
                    entry.cohort,
                    entry.breakdown.overall,
                    entry.breakdown.academic,
                    entry.breakdown.activity,
                    entry.breakdown.award
                );
            }

            let breakdowns: Vec<_> = ranked.iter().map(|entry| entry.breakdown).collect();
            let bands = rank::cohort_bands(&breakdowns);
            println!(
                "Cohort bands (p25/p50/p75): overall {:.1}/{:.1}/{:.1}, academic {:.1}/{:.1}/{:.1}",
                bands.overall.p25,
                bands.overall.p50,
                bands.overall.p75,
                bands.academic.p25,
                bands.academic.p50,
                bands.academic.p75
            );
        }
        Commands::Recommend { email } => {
            let applicant = db::fetch_applicant_by_email(&pool, &email).await?;
            let history = load_history(&pool).await?;
            let matches = school_matches(&pool, &applicant, &history).await?;

            if matches.is_empty() {
                println!("No institutions on file.");
                return Ok(());
            }

            println!("School list for {}:", applicant.full_name);
            for tier in [Tier::Reach, Tier::Match, Tier::Safety] {
                let group: Vec<&SchoolMatch> =
                    matches.iter().filter(|m| m.prediction.tier == tier).collect();
                if group.is_empty() {
                    continue;
                }
                println!("{}:", tier.label());
                for school in group {
                    let rate = school
                        .acceptance_rate
                        .map(|r| format!("{r:.1}% acceptance"))
                        .unwrap_or_else(|| "acceptance rate unknown".to_string());
                    println!(
                        "- {} ({rate}) probability {:.0}%",
                        school.institution,
                        school.prediction.probability * 100.0
                    );
                }
            }
        }
        Commands::Report { email, out } => {
            let applicant = db::fetch_applicant_by_email(&pool, &email).await?;
            let history = load_history(&pool).await?;
            let matches = school_matches(&pool, &applicant, &history).await?;
            let report = report::build_report(
                &applicant,
                &matches,
                &history,
                Utc::now().date_naive(),
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn load_history(pool: &PgPool) -> anyhow::Result<HistoricalDistribution> {
    let samples = db::fetch_score_history(pool).await?;
    Ok(adapters::historical_distribution(&samples))
}

/// Evaluates one applicant against every stored institution, ordered by
/// published rank with unranked schools last.
async fn school_matches(
    pool: &PgPool,
    applicant: &ApplicantRecord,
    history: &HistoricalDistribution,
) -> anyhow::Result<Vec<SchoolMatch>> {
    let metrics = adapters::applicant_metrics(applicant);
    let mut matches: Vec<SchoolMatch> = db::fetch_institutions(pool, None)
        .await?
        .into_iter()
        .map(|record| {
            let institution_metrics = adapters::institution_metrics(&record);
            SchoolMatch {
                institution: record.name,
                acceptance_rate: institution_metrics.acceptance_rate,
                rank: institution_metrics.rank,
                prediction: probability::evaluate(&metrics, &institution_metrics, history),
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        let a_rank = a.rank.unwrap_or(u32::MAX);
        let b_rank = b.rank.unwrap_or(u32::MAX);
        a_rank.cmp(&b_rank).then_with(|| a.institution.cmp(&b.institution))
    });
    Ok(matches)
}
