use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = prism_shots::cli::parse();
    app::run_app(args)
}
