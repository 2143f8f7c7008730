use colored::Colorize;
use stockcomp::api;
use tabled::settings::{Color, object::Columns};

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match api::get_config().await {
            Ok(config) => {
                let table_data: Vec<Vec<String>> = vec![
                    vec!["backend_api".to_string(), config.backend_api.to_string()],
                    vec![
                        "request_timeout_secs".to_string(),
                        config.request_timeout_secs.to_string(),
                    ],
                    vec![
                        "request_max_retries".to_string(),
                        config.request_max_retries.to_string(),
                    ],
                ];

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
