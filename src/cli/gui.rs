use stockcomp::gui;

#[derive(clap::Args)]
pub struct GuiCommand;

impl GuiCommand {
    pub async fn exec(&self) {
        gui::open_window(None);
    }
}
