use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::core::assumptions::DEFAULT_ASSUMPTION;
use crate::core::{
    AccountAllocation, BenefitEstimate, DEFAULT_RUN_COUNT, FilingStatus, HealthcareCostPoint,
    ReturnAssumption, SimulationInputs, SimulationResult, TaxAssessment,
    calculate_weighted_returns, healthcare, run_monte_carlo, social_security,
    sustainable_withdrawal_rate, tax,
};

const DEFAULT_STARTING_BALANCE: f64 = 100_000.0;
const DEFAULT_ANNUAL_CONTRIBUTION: f64 = 12_000.0;
const DEFAULT_PROJECTION_YEARS: u32 = 30;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_CURVE_FROM_AGE: u32 = 55;
const DEFAULT_CURVE_TO_AGE: u32 = 95;
const MAX_CURVE_AGE: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiFilingStatus {
    Single,
    #[serde(alias = "marriedJoint", alias = "married_joint")]
    MarriedJoint,
    #[serde(alias = "marriedSeparate", alias = "married_separate")]
    MarriedSeparate,
    #[serde(alias = "headOfHousehold", alias = "head_of_household")]
    HeadOfHousehold,
}

impl From<ApiFilingStatus> for FilingStatus {
    fn from(value: ApiFilingStatus) -> Self {
        match value {
            ApiFilingStatus::Single => FilingStatus::Single,
            ApiFilingStatus::MarriedJoint => FilingStatus::MarriedJoint,
            ApiFilingStatus::MarriedSeparate => FilingStatus::MarriedSeparate,
            ApiFilingStatus::HeadOfHousehold => FilingStatus::HeadOfHousehold,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionPayload {
    pub starting_balance: Option<f64>,
    pub annual_contribution: Option<f64>,
    pub annual_withdrawal: Option<f64>,
    pub years: Option<u32>,
    pub return_mean: Option<f64>,
    pub return_std: Option<f64>,
    pub accounts: Option<Vec<AccountPayload>>,
    pub runs: Option<u32>,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountPayload {
    #[serde(alias = "currentBalance")]
    pub balance: Option<f64>,
    #[serde(alias = "stockAllocation")]
    pub stock_pct: Option<f64>,
    #[serde(alias = "bondAllocation")]
    pub bond_pct: Option<f64>,
    #[serde(alias = "cashAllocation")]
    pub cash_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialSecurityPayload {
    pub aime: Option<f64>,
    pub earnings: Option<Vec<f64>>,
    pub index_factor: Option<f64>,
    pub claiming_age: Option<f64>,
    pub birth_year: Option<i32>,
    pub full_retirement_age: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxPayload {
    pub gross_income: Option<f64>,
    pub filing_status: Option<ApiFilingStatus>,
    pub deduction: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthcareCostQuery {
    pub age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthcareCurveQuery {
    pub from_age: Option<u32>,
    pub to_age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubsidyQuery {
    pub household_income: Option<f64>,
    pub household_size: Option<u32>,
    pub annual_premium: Option<f64>,
}

/// Headline figures plus the full percentile bands for charting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub success_probability: f64,
    pub median_ending_balance: f64,
    pub worst_case_balance: f64,
    pub sustainable_withdrawal_rate: Option<f64>,
    pub withdrawal_success_probability: Option<f64>,
    pub assumption: ReturnAssumption,
    pub projections: SimulationResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveResponse {
    pub points: Vec<HealthcareCostPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyResponse {
    pub federal_poverty_level: f64,
    pub income_pct_of_fpl: f64,
    pub subsidy: f64,
    pub net_premium: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct ProjectionRequest {
    inputs: SimulationInputs,
    assumption: ReturnAssumption,
    annual_withdrawal: f64,
}

fn projection_request_from_payload(
    payload: ProjectionPayload,
) -> Result<ProjectionRequest, String> {
    let starting_balance = payload.starting_balance.unwrap_or(DEFAULT_STARTING_BALANCE);
    let annual_contribution = payload
        .annual_contribution
        .unwrap_or(DEFAULT_ANNUAL_CONTRIBUTION);
    let annual_withdrawal = payload.annual_withdrawal.unwrap_or(0.0);

    for (name, value) in [
        ("startingBalance", starting_balance),
        ("annualContribution", annual_contribution),
        ("annualWithdrawal", annual_withdrawal),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a non-negative number"));
        }
    }

    let assumption = match (payload.return_mean, payload.return_std) {
        (None, None) => match payload.accounts.as_deref() {
            Some(accounts) if !accounts.is_empty() => {
                let allocations: Vec<AccountAllocation> = accounts
                    .iter()
                    .map(|account| AccountAllocation {
                        balance: account.balance.unwrap_or(0.0),
                        stock_pct: account.stock_pct.unwrap_or(0.0),
                        bond_pct: account.bond_pct.unwrap_or(0.0),
                        cash_pct: account.cash_pct.unwrap_or(0.0),
                    })
                    .collect();
                calculate_weighted_returns(&allocations).map_err(|e| e.to_string())?
            }
            _ => DEFAULT_ASSUMPTION,
        },
        (mean, std) => ReturnAssumption {
            mean: mean.unwrap_or(DEFAULT_ASSUMPTION.mean),
            std_dev: std.unwrap_or(DEFAULT_ASSUMPTION.std_dev),
        },
    };

    Ok(ProjectionRequest {
        inputs: SimulationInputs {
            starting_balance,
            annual_net_contribution: annual_contribution - annual_withdrawal,
            years: payload.years.unwrap_or(DEFAULT_PROJECTION_YEARS),
            return_mean: assumption.mean,
            return_std: assumption.std_dev,
            runs: payload.runs.unwrap_or(DEFAULT_RUN_COUNT),
            seed: payload.seed.unwrap_or(DEFAULT_SEED),
        },
        assumption,
        annual_withdrawal,
    })
}

pub fn run_projection(payload: ProjectionPayload) -> Result<ProjectionResponse, String> {
    let request = projection_request_from_payload(payload)?;
    let inputs = &request.inputs;
    let result = run_monte_carlo(inputs).map_err(|e| e.to_string())?;

    // A withdrawal rate over a zero balance is meaningless, so the analysis
    // is skipped rather than failing the whole projection.
    let withdrawal = if inputs.starting_balance > 0.0 {
        Some(
            sustainable_withdrawal_rate(
                inputs.starting_balance,
                request.annual_withdrawal,
                inputs.years,
                request.assumption,
                inputs.seed,
            )
            .map_err(|e| e.to_string())?,
        )
    } else {
        None
    };

    let ending = inputs.years as usize;
    Ok(ProjectionResponse {
        success_probability: result.success_rate,
        median_ending_balance: result.median[ending],
        worst_case_balance: result.percentile10[ending],
        sustainable_withdrawal_rate: withdrawal.as_ref().map(|analysis| analysis.rate),
        withdrawal_success_probability: withdrawal
            .as_ref()
            .map(|analysis| analysis.success_probability),
        assumption: request.assumption,
        projections: result,
    })
}

pub fn estimate_social_security(
    payload: SocialSecurityPayload,
) -> Result<BenefitEstimate, String> {
    let aime = match (payload.aime, payload.earnings.as_deref()) {
        (Some(aime), _) => {
            if !aime.is_finite() || aime < 0.0 {
                return Err("aime must be a non-negative number".to_string());
            }
            aime
        }
        (None, Some(earnings)) => {
            if earnings.iter().any(|value| !value.is_finite()) {
                return Err("earnings must be finite numbers".to_string());
            }
            let index_factor = payload.index_factor.unwrap_or(1.0);
            if !index_factor.is_finite() || index_factor <= 0.0 {
                return Err("indexFactor must be > 0".to_string());
            }
            social_security::calculate_aime(earnings, index_factor)
        }
        (None, None) => return Err("provide aime or an earnings history".to_string()),
    };

    let full_retirement_age = match (payload.full_retirement_age, payload.birth_year) {
        (Some(age), _) => {
            if !(65.0..=67.0).contains(&age) {
                return Err("fullRetirementAge must be between 65 and 67".to_string());
            }
            age
        }
        (None, Some(year)) => social_security::full_retirement_age(year),
        (None, None) => return Err("provide birthYear or fullRetirementAge".to_string()),
    };

    let claiming_age = payload.claiming_age.unwrap_or(full_retirement_age);
    if !(55.0..=80.0).contains(&claiming_age) {
        return Err("claimingAge must be between 55 and 80".to_string());
    }

    Ok(social_security::estimate_benefit(
        aime,
        claiming_age,
        full_retirement_age,
    ))
}

pub fn assess_tax(payload: TaxPayload) -> Result<TaxAssessment, String> {
    let gross_income = payload.gross_income.unwrap_or(0.0);
    if !gross_income.is_finite() || gross_income < 0.0 {
        return Err("grossIncome must be a non-negative number".to_string());
    }
    if let Some(deduction) = payload.deduction {
        if !deduction.is_finite() || deduction < 0.0 {
            return Err("deduction must be a non-negative number".to_string());
        }
    }
    let status = payload.filing_status.unwrap_or(ApiFilingStatus::Single);
    Ok(tax::assess(gross_income, status.into(), payload.deduction))
}

pub fn healthcare_cost(query: HealthcareCostQuery) -> Result<HealthcareCostPoint, String> {
    let age = query.age.ok_or_else(|| "age is required".to_string())?;
    if age > MAX_CURVE_AGE {
        return Err(format!("age must be <= {MAX_CURVE_AGE}"));
    }
    Ok(HealthcareCostPoint {
        age,
        annual_cost: healthcare::annual_cost(age),
    })
}

pub fn healthcare_curve(query: HealthcareCurveQuery) -> Result<CurveResponse, String> {
    let from_age = query.from_age.unwrap_or(DEFAULT_CURVE_FROM_AGE);
    let to_age = query.to_age.unwrap_or(DEFAULT_CURVE_TO_AGE);
    if from_age > to_age {
        return Err("fromAge cannot exceed toAge".to_string());
    }
    if to_age > MAX_CURVE_AGE {
        return Err(format!("toAge must be <= {MAX_CURVE_AGE}"));
    }
    Ok(CurveResponse {
        points: healthcare::cost_curve(from_age, to_age),
    })
}

pub fn healthcare_subsidy(query: SubsidyQuery) -> Result<SubsidyResponse, String> {
    let household_income = query
        .household_income
        .ok_or_else(|| "householdIncome is required".to_string())?;
    let annual_premium = query
        .annual_premium
        .ok_or_else(|| "annualPremium is required".to_string())?;
    for (name, value) in [
        ("householdIncome", household_income),
        ("annualPremium", annual_premium),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a non-negative number"));
        }
    }
    let household_size = query.household_size.unwrap_or(1);

    let federal_poverty_level = healthcare::federal_poverty_level(household_size);
    let subsidy =
        healthcare::calculate_aca_subsidy(household_income, household_size, annual_premium);
    Ok(SubsidyResponse {
        federal_poverty_level,
        income_pct_of_fpl: household_income / federal_poverty_level * 100.0,
        subsidy,
        net_premium: annual_premium - subsidy,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route(
            "/api/social-security",
            get(social_security_get_handler).post(social_security_post_handler),
        )
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .route("/api/healthcare/cost", get(healthcare_cost_handler))
        .route("/api/healthcare/curve", get(healthcare_curve_handler))
        .route("/api/healthcare/subsidy", get(healthcare_subsidy_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("retirement planning API listening on http://{addr}");
    info!("try http://127.0.0.1:{port}/api/projection");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload)
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    match run_projection(payload) {
        Ok(response) => {
            debug!(
                success_probability = response.success_probability,
                median_ending_balance = response.median_ending_balance,
                "projection request served"
            );
            json_response(StatusCode::OK, response)
        }
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn social_security_get_handler(Query(payload): Query<SocialSecurityPayload>) -> Response {
    social_security_handler_impl(payload)
}

async fn social_security_post_handler(Json(payload): Json<SocialSecurityPayload>) -> Response {
    social_security_handler_impl(payload)
}

fn social_security_handler_impl(payload: SocialSecurityPayload) -> Response {
    match estimate_social_security(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn tax_get_handler(Query(payload): Query<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

async fn tax_post_handler(Json(payload): Json<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

fn tax_handler_impl(payload: TaxPayload) -> Response {
    match assess_tax(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn healthcare_cost_handler(Query(query): Query<HealthcareCostQuery>) -> Response {
    match healthcare_cost(query) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn healthcare_curve_handler(Query(query): Query<HealthcareCurveQuery>) -> Response {
    match healthcare_curve(query) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn healthcare_subsidy_handler(Query(query): Query<SubsidyQuery>) -> Response {
    match healthcare_subsidy(query) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
