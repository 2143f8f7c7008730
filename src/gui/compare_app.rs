use std::str::FromStr;

use chrono::{Days, Local};
use eframe::egui;
use egui_plot::{Corner, Legend, Line, Plot};
use log::debug;
use tokio::sync::mpsc;

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    chart::LINE_WIDTH,
    ds::marketstack::{self, PerformanceResponse},
    query::PerformanceQuery,
    session::{SessionAction, SessionPhase, SessionState, reduce},
    symbol::{MAX_SELECTION, StockSymbol, SymbolSelection},
    utils::datetime::{date_from_str, date_to_str},
};

/// The comparison page: symbol/investment/date form on top, chart below.
///
/// Fetches run on a spawned task and come back through the channel tagged
/// with the generation they were started with, so a stale response can never
/// overwrite a newer cycle.
pub struct CompareApp {
    state: SessionState,

    symbol_inputs: [String; MAX_SELECTION],
    investment_input: String,
    date_from_input: String,
    date_to_input: String,

    fetch_event_sender: mpsc::Sender<FetchEvent>,
    fetch_event_receiver: mpsc::Receiver<FetchEvent>,

    submit_on_startup: bool,
}

struct FetchEvent {
    generation: u64,
    outcome: Result<PerformanceResponse, String>,
}

impl CompareApp {
    pub fn new(cc: &eframe::CreationContext, initial_query: Option<PerformanceQuery>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let (fetch_event_sender, fetch_event_receiver) =
            mpsc::channel::<FetchEvent>(CHANNEL_BUFFER_DEFAULT);

        let today = Local::now().date_naive();
        let mut state = SessionState::new(today);

        let submit_on_startup = initial_query.is_some();
        if let Some(query) = initial_query {
            let selection =
                SymbolSelection::try_from(query.symbols.as_slice()).unwrap_or_default();
            state = reduce(&state, SessionAction::SetSymbols(selection));
            state = reduce(&state, SessionAction::SetInvestment(query.initial_investment));
            state = reduce(
                &state,
                SessionAction::SetDateFrom {
                    date: query.date_from,
                    today,
                },
            );
            state = reduce(
                &state,
                SessionAction::SetDateTo {
                    date: query.date_to,
                    today,
                },
            );
        }

        let mut app = Self {
            state,

            symbol_inputs: Default::default(),
            investment_input: String::new(),
            date_from_input: String::new(),
            date_to_input: String::new(),

            fetch_event_sender,
            fetch_event_receiver,

            submit_on_startup,
        };
        app.sync_inputs();

        app
    }

    fn dispatch(&mut self, action: SessionAction) {
        self.state = reduce(&self.state, action);
    }

    /// Reflect the (possibly clamped) state back into the form fields.
    fn sync_inputs(&mut self) {
        for (i, input) in self.symbol_inputs.iter_mut().enumerate() {
            *input = self
                .state
                .symbols
                .as_slice()
                .get(i)
                .map(|s| s.as_str().to_string())
                .unwrap_or_default();
        }

        self.investment_input = format!("{}", self.state.initial_investment);
        self.date_from_input = date_to_str(&self.state.date_from);
        self.date_to_input = date_to_str(&self.state.date_to);
    }

    fn submit(&mut self) {
        let today = Local::now().date_naive();

        let mut selection = SymbolSelection::default();
        for input in &self.symbol_inputs {
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match StockSymbol::from_str(input).and_then(|symbol| selection.push(symbol)) {
                Ok(()) => {}
                Err(err) => {
                    self.dispatch(SessionAction::Reject(err.user_message()));
                    return;
                }
            }
        }

        let initial_investment = match self.investment_input.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                self.dispatch(SessionAction::Reject(format!(
                    "Invalid investment amount '{}'",
                    self.investment_input.trim()
                )));
                return;
            }
        };

        let date_from = match date_from_str(self.date_from_input.trim()) {
            Ok(date) => date,
            Err(err) => {
                self.dispatch(SessionAction::Reject(err.user_message()));
                return;
            }
        };
        let date_to = match date_from_str(self.date_to_input.trim()) {
            Ok(date) => date,
            Err(err) => {
                self.dispatch(SessionAction::Reject(err.user_message()));
                return;
            }
        };

        self.dispatch(SessionAction::SetSymbols(selection));
        self.dispatch(SessionAction::SetInvestment(initial_investment));
        self.dispatch(SessionAction::SetDateFrom {
            date: date_from,
            today,
        });
        self.dispatch(SessionAction::SetDateTo {
            date: date_to,
            today,
        });
        self.dispatch(SessionAction::Submit { today });
        self.sync_inputs();

        if self.state.phase == SessionPhase::Loading {
            debug!(
                "[{}] generation {}",
                self.state.phase, self.state.generation
            );

            let query = self.state.query();
            let generation = self.state.generation;
            let sender = self.fetch_event_sender.clone();

            tokio::spawn(async move {
                let outcome = marketstack::fetch_performance(&query)
                    .await
                    .map_err(|err| err.to_string());

                let _ = sender.send(FetchEvent { generation, outcome }).await;
            });
        }
    }
}

impl eframe::App for CompareApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let already_run = ctx.data(|d| {
            d.get_temp::<bool>(egui::Id::new("startup_once"))
                .unwrap_or(false)
        });

        if !already_run {
            if self.submit_on_startup {
                self.submit();
            }

            ctx.data_mut(|d| d.insert_temp(egui::Id::new("startup_once"), true));
        }

        while let Ok(event) = self.fetch_event_receiver.try_recv() {
            self.dispatch(SessionAction::Resolve {
                generation: event.generation,
                outcome: event.outcome,
            });
            self.sync_inputs();
        }

        if self.state.phase == SessionPhase::Loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }

        let mut submit_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("form_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        for input in self.symbol_inputs.iter_mut() {
                            ui.add(
                                egui::TextEdit::singleline(input)
                                    .hint_text("Symbol")
                                    .desired_width(56.0),
                            );
                        }

                        ui.separator();

                        ui.label("$");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.investment_input)
                                .desired_width(80.0),
                        );

                        ui.label("From");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.date_from_input)
                                .desired_width(92.0),
                        );
                        ui.label("To");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.date_to_input)
                                .desired_width(92.0),
                        );

                        let loading = self.state.phase == SessionPhase::Loading;
                        if ui
                            .add_enabled(!loading, egui::Button::new("Compare"))
                            .clicked()
                        {
                            submit_clicked = true;
                        }
                        if loading {
                            ui.spinner();
                        }
                    });
                });

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        if let Some(error) = &self.state.error {
                            ui.label(
                                egui::RichText::new(format!("✖ {error}"))
                                    .color(egui::Color32::LIGHT_RED)
                                    .size(12.0),
                            );
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(
                                    self.state
                                        .notice
                                        .as_ref()
                                        .map(|t| format!("⚠ {t}"))
                                        .unwrap_or_default(),
                                )
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        });
                    });
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                if let Some(chart) = &self.state.chart {
                    let start_date = chart.start_date;

                    Plot::new("plot")
                        .label_formatter(move |name, point| {
                            if name.is_empty() {
                                "".to_string()
                            } else {
                                if let Some(start_date) = start_date {
                                    let days = point.x.max(0.0) as u64;
                                    format!(
                                        "[{}] {} ${:.2}",
                                        date_to_str(&(start_date + Days::new(days))),
                                        name,
                                        point.y
                                    )
                                } else {
                                    "".to_string()
                                }
                            }
                        })
                        .legend(Legend::default().position(Corner::LeftTop))
                        .show(ui, |plot_ui| {
                            for dataset in &chart.datasets {
                                let (r, g, b) = dataset.color;
                                let color = egui::Color32::from_rgb(r, g, b);

                                for (i, segment) in dataset.segments.iter().enumerate() {
                                    // only the first segment carries the
                                    // label, the legend lists each symbol once
                                    let name = if i == 0 { dataset.label.as_str() } else { "" };

                                    plot_ui.line(
                                        Line::new(name, segment.clone())
                                            .width(LINE_WIDTH)
                                            .color(color),
                                    );
                                }
                            }
                        });
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("Pick up to 3 symbols and press Compare")
                                .color(egui::Color32::DARK_GRAY),
                        );
                    });
                }
            });
        });

        if submit_clicked {
            self.submit();
        }
    }
}
