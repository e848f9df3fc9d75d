use mockgate::cli::run_cli;
use mockgate::logging::init_logging;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    run_cli()
}
