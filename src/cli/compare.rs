use chrono::{Local, NaiveDate};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use stockcomp::{
    api, gui,
    query::PerformanceQuery,
    symbol::{StockSymbol, SymbolSelection},
    utils,
    utils::datetime::one_year_before,
};
use tabled::settings::{
    Alignment, Color,
    object::{Columns, Object, Rows},
};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct CompareCommand {
    #[arg(
        short = 's',
        long = "symbol",
        help = "Stock symbol to compare, up to 3, e.g. -s AAPL -s MSFT"
    )]
    symbols: Vec<StockSymbol>,

    #[arg(
        short = 'i',
        long = "invest",
        default_value_t = 10000.0,
        help = "Initial investment amount, the default value is 10000"
    )]
    initial_investment: f64,

    #[arg(
        short = 'f',
        long = "from",
        value_parser = utils::datetime::date_from_str,
        help = "Start date of the comparison, the default value is one year ago, e.g. -f 2025-01-01"
    )]
    date_from: Option<NaiveDate>,

    #[arg(
        short = 't',
        long = "to",
        value_parser = utils::datetime::date_from_str,
        help = "End date of the comparison, the default value is today, e.g. -t 2025-06-01"
    )]
    date_to: Option<NaiveDate>,

    #[arg(short = 'g', help = "Open GUI window to display the comparison chart")]
    gui: bool,
}

impl CompareCommand {
    pub async fn exec(&self) {
        let today = Local::now().date_naive();

        let selection = match SymbolSelection::try_from(self.symbols.as_slice()) {
            Ok(selection) => selection,
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        let query = PerformanceQuery {
            symbols: selection.as_slice().to_vec(),
            initial_investment: self.initial_investment,
            date_from: self.date_from.unwrap_or(one_year_before(&today)),
            date_to: self.date_to.unwrap_or(today),
        };

        let (query, notices) = query.clamped(&today);
        for notice in &notices {
            println!("[i] {}", notice.yellow());
        }

        if let Err(err) = query.validate(&today) {
            println!("[!] {}", err.to_string().red());
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner
            .set_style(ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        match api::compare(&query).await {
            Ok(outcome) => {
                spinner.finish_with_message(format!("{}", "✔".to_string().green()));

                if !outcome.excluded_symbols.is_empty() {
                    println!(
                        "[i] {}",
                        format!(
                            "Excluded for insufficient data: {}",
                            outcome.excluded_symbols.join(", ")
                        )
                        .yellow()
                    );
                }

                if outcome.aligned.is_empty() {
                    println!("[!] {}", "No data for the selected range".yellow());
                    return;
                }

                let mut table_data: Vec<Vec<String>> = vec![vec![
                    "".to_string(),
                    "Days".to_string(),
                    "Final Value".to_string(),
                    "Profit".to_string(),
                    "Return".to_string(),
                    "Ann Return".to_string(),
                    "Max Drawdown".to_string(),
                ]];
                for summary in &outcome.summaries {
                    table_data.push(vec![
                        summary.symbol.to_string(),
                        format!("{}", summary.data_points),
                        summary
                            .final_value
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or("-".to_string()),
                        summary
                            .profit
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or("-".to_string()),
                        summary
                            .return_rate
                            .map(|v| format!("{:.2}%", v * 100.0))
                            .unwrap_or("-".to_string()),
                        summary
                            .annualized_return_rate
                            .map(|v| format!("{:.2}%", v * 100.0))
                            .unwrap_or("-".to_string()),
                        summary
                            .max_drawdown
                            .map(|v| format!("{:.2}%", v * 100.0))
                            .unwrap_or("-".to_string()),
                    ]);
                }

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
                table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
                table.modify(Columns::new(1..), Alignment::right());
                println!("{table}");

                if self.gui {
                    gui::open_window(Some(query));
                }
            }
            Err(err) => {
                spinner.finish_with_message(format!("{}", err.to_string().red()));
            }
        }
    }
}
