use std::str::FromStr;

use chrono::NaiveDate;

use crate::{
    chart::{ChartSpec, build_chart},
    data::series::{PerformancePoint, align},
    ds::marketstack::PerformanceResponse,
    query::PerformanceQuery,
    symbol::{StockSymbol, SymbolSelection},
    utils::datetime::{date_to_str, one_year_before},
};

pub const UNKNOWN_ERROR: &str = "An unknown error was found";

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum SessionPhase {
    Idle,
    Loading,
    Rendered,
}

/// Everything one fetch-and-render cycle can see, form fields included.
///
/// Transitions go through [`reduce`] only; `generation` ties an in-flight
/// request to the submit that started it.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub symbols: SymbolSelection,
    pub initial_investment: f64,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,

    pub phase: SessionPhase,
    pub generation: u64,

    pub chart: Option<ChartSpec>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

pub enum SessionAction {
    SetSymbols(SymbolSelection),
    SetInvestment(f64),
    SetDateFrom { date: NaiveDate, today: NaiveDate },
    SetDateTo { date: NaiveDate, today: NaiveDate },
    /// A local input problem detected before any typed field changed.
    Reject(String),
    Submit { today: NaiveDate },
    Resolve {
        generation: u64,
        outcome: Result<PerformanceResponse, String>,
    },
}

impl SessionState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            symbols: SymbolSelection::default(),
            initial_investment: 10000.0,
            date_from: one_year_before(&today),
            date_to: today,

            phase: SessionPhase::Idle,
            generation: 0,

            chart: None,
            error: None,
            notice: None,
        }
    }

    /// The query the current form fields describe.
    pub fn query(&self) -> PerformanceQuery {
        PerformanceQuery {
            symbols: self.symbols.as_slice().to_vec(),
            initial_investment: self.initial_investment,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    let mut next = state.clone();

    match action {
        SessionAction::SetSymbols(symbols) => {
            next.symbols = symbols;
        }
        SessionAction::SetInvestment(initial_investment) => {
            next.initial_investment = initial_investment;
        }
        SessionAction::SetDateFrom { date, today } => {
            let floor = one_year_before(&today);
            if date < floor {
                next.date_from = floor;
                next.notice = Some(format!(
                    "The start date was moved up to {}, earlier data is not served",
                    date_to_str(&floor)
                ));
            } else {
                next.date_from = date;
            }
        }
        SessionAction::SetDateTo { date, today } => {
            if date > today {
                next.date_to = today;
                next.notice = Some(format!(
                    "The end date was moved back to {}",
                    date_to_str(&today)
                ));
            } else {
                next.date_to = date;
            }
        }
        SessionAction::Reject(message) => {
            next.error = Some(message);
        }
        SessionAction::Submit { today } => {
            if next.phase == SessionPhase::Loading {
                // single-flight, a submit cannot overlap a running fetch
                return next;
            }

            match next.query().validate(&today) {
                Ok(()) => {
                    next.phase = SessionPhase::Loading;
                    next.generation += 1;
                    next.error = None;
                    next.notice = None;
                }
                Err(err) => {
                    next.phase = SessionPhase::Idle;
                    next.error = Some(err.user_message());
                }
            }
        }
        SessionAction::Resolve {
            generation,
            outcome,
        } => {
            if next.phase != SessionPhase::Loading || generation != next.generation {
                // stale response, a newer cycle owns the state now
                return next;
            }

            match outcome {
                Ok(response) => apply_response(&mut next, response),
                Err(message) => {
                    next.phase = SessionPhase::Idle;
                    next.chart = None;
                    next.error = Some(if message.trim().is_empty() {
                        UNKNOWN_ERROR.to_string()
                    } else {
                        message
                    });
                }
            }
        }
    }

    next
}

fn apply_response(state: &mut SessionState, response: PerformanceResponse) {
    let excluded: Vec<StockSymbol> = response
        .excluded_symbols
        .iter()
        .filter_map(|s| StockSymbol::from_str(s).ok())
        .filter(|s| state.symbols.contains(s))
        .collect();

    if !excluded.is_empty() {
        state.symbols.retain_absent_from(&excluded);
        state.notice = Some(format!(
            "Excluded for insufficient data: {}",
            excluded
                .iter()
                .map(StockSymbol::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let series: Vec<(StockSymbol, Vec<PerformancePoint>)> = state
        .symbols
        .iter()
        .map(|symbol| {
            let points = response
                .individual_stock_performance
                .get(symbol.as_str())
                .cloned()
                .unwrap_or_default();

            (symbol.clone(), points)
        })
        .collect();

    let aligned = align(&series);

    if aligned.is_empty() {
        state.phase = SessionPhase::Idle;
        state.chart = None;
        state.error = None;
        state.notice = Some(match state.notice.take() {
            Some(notice) => format!("{notice}; no data for the selected range"),
            None => "No data for the selected range".to_string(),
        });
    } else {
        state.phase = SessionPhase::Rendered;
        state.chart = Some(build_chart(&aligned));
        state.error = None;
    }
}
