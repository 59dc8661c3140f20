use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use glidepath::api::{
    ApiFilingStatus, HealthcareCostQuery, HealthcareCurveQuery, ProjectionPayload,
    SocialSecurityPayload, SubsidyQuery, TaxPayload, assess_tax, estimate_social_security,
    healthcare_cost, healthcare_curve, healthcare_subsidy, run_http_server, run_projection,
};

#[derive(Parser)]
#[command(name = "glidepath")]
#[command(about = "Retirement portfolio projections and benefit calculators")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run a Monte Carlo portfolio projection
    Project {
        #[arg(long, default_value_t = 100_000.0)]
        starting_balance: f64,
        #[arg(long, default_value_t = 12_000.0)]
        annual_contribution: f64,
        #[arg(long, default_value_t = 0.0)]
        annual_withdrawal: f64,
        #[arg(long, default_value_t = 30)]
        years: u32,
        #[arg(long, help = "Mean annual return as a fraction, e.g. 0.07")]
        return_mean: Option<f64>,
        #[arg(long, help = "Annual return standard deviation as a fraction")]
        return_std: Option<f64>,
        #[arg(long, default_value_t = 10_000)]
        runs: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Estimate a Social Security benefit
    Benefit {
        #[arg(long, help = "Average indexed monthly earnings, if already known")]
        aime: Option<f64>,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Comma-separated annual earnings history"
        )]
        earnings: Vec<f64>,
        #[arg(long, default_value_t = 1.0)]
        index_factor: f64,
        #[arg(long, help = "Claiming age; defaults to full retirement age")]
        claiming_age: Option<f64>,
        #[arg(long)]
        birth_year: Option<i32>,
        #[arg(long, help = "Overrides the birth-year lookup")]
        full_retirement_age: Option<f64>,
    },
    /// Assess federal income tax for a filing status
    Tax {
        #[arg(long)]
        gross_income: f64,
        #[arg(long, value_enum, default_value_t = CliFilingStatus::Single)]
        filing_status: CliFilingStatus,
        #[arg(long, help = "Itemized deduction to use instead of the standard one")]
        deduction: Option<f64>,
    },
    /// Healthcare cost and subsidy calculators
    Healthcare {
        #[command(subcommand)]
        command: HealthcareCommand,
    },
}

#[derive(Subcommand)]
enum HealthcareCommand {
    /// Annual healthcare cost at one age
    Cost {
        #[arg(long)]
        age: u32,
    },
    /// Annual costs over an inclusive age range
    Curve {
        #[arg(long, default_value_t = 55)]
        from_age: u32,
        #[arg(long, default_value_t = 95)]
        to_age: u32,
    },
    /// ACA premium subsidy for a household
    Subsidy {
        #[arg(long)]
        household_income: f64,
        #[arg(long, default_value_t = 1)]
        household_size: u32,
        #[arg(long)]
        annual_premium: f64,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl From<CliFilingStatus> for ApiFilingStatus {
    fn from(value: CliFilingStatus) -> Self {
        match value {
            CliFilingStatus::Single => ApiFilingStatus::Single,
            CliFilingStatus::MarriedJoint => ApiFilingStatus::MarriedJoint,
            CliFilingStatus::MarriedSeparate => ApiFilingStatus::MarriedSeparate,
            CliFilingStatus::HeadOfHousehold => ApiFilingStatus::HeadOfHousehold,
        }
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Serve { port } => run_http_server(port)
            .await
            .map_err(|e| format!("server error: {e}")),
        Command::Project {
            starting_balance,
            annual_contribution,
            annual_withdrawal,
            years,
            return_mean,
            return_std,
            runs,
            seed,
        } => run_projection(ProjectionPayload {
            starting_balance: Some(starting_balance),
            annual_contribution: Some(annual_contribution),
            annual_withdrawal: Some(annual_withdrawal),
            years: Some(years),
            return_mean,
            return_std,
            accounts: None,
            runs: Some(runs),
            seed: Some(seed),
        })
        .and_then(|response| print_json(&response)),
        Command::Benefit {
            aime,
            earnings,
            index_factor,
            claiming_age,
            birth_year,
            full_retirement_age,
        } => estimate_social_security(SocialSecurityPayload {
            aime,
            earnings: if earnings.is_empty() {
                None
            } else {
                Some(earnings)
            },
            index_factor: Some(index_factor),
            claiming_age,
            birth_year,
            full_retirement_age,
        })
        .and_then(|estimate| print_json(&estimate)),
        Command::Tax {
            gross_income,
            filing_status,
            deduction,
        } => assess_tax(TaxPayload {
            gross_income: Some(gross_income),
            filing_status: Some(filing_status.into()),
            deduction,
        })
        .and_then(|assessment| print_json(&assessment)),
        Command::Healthcare { command } => match command {
            HealthcareCommand::Cost { age } => {
                healthcare_cost(HealthcareCostQuery { age: Some(age) })
                    .and_then(|point| print_json(&point))
            }
            HealthcareCommand::Curve { from_age, to_age } => {
                healthcare_curve(HealthcareCurveQuery {
                    from_age: Some(from_age),
                    to_age: Some(to_age),
                })
                .and_then(|curve| print_json(&curve))
            }
            HealthcareCommand::Subsidy {
                household_income,
                household_size,
                annual_premium,
            } => healthcare_subsidy(SubsidyQuery {
                household_income: Some(household_income),
                household_size: Some(household_size),
                annual_premium: Some(annual_premium),
            })
            .and_then(|subsidy| print_json(&subsidy)),
        },
    };

    if let Err(msg) = outcome {
        eprintln!("{msg}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
