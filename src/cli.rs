use clap::Subcommand;

mod check;
mod compare;
mod config;
mod gui;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare portfolio performance of stock symbols")]
    #[clap(visible_aliases = &["cmp"])]
    Compare(Box<compare::CompareCommand>),

    #[command(about = "Check the backend market-data proxy")]
    Check(Box<check::CheckCommand>),

    #[command(about = "Manage configurations")]
    #[command(subcommand)]
    Config(config::ConfigCommand),

    #[command(about = "Open the interactive comparison window")]
    Gui(Box<gui::GuiCommand>),
}
