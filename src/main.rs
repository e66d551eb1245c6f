use anyhow::Result;

fn main() -> Result<()> {
    ideas_tui::cli::run()
}
