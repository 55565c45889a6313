mod app;
mod logic;
mod models;
mod mvu;
mod ui;

fn main() -> anyhow::Result<()> {
    let args = app::args::parse();
    app::telemetry::init(args.log_filter.as_deref());
    app::run(args)
}
