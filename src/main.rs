use anyhow::Context;
use clap::Parser;
use form_fill_common::{build_options, load_field_data};
use form_fill_rust::{cli, config, fill, logging};
use cli::Cli;
use config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    config::load_dotenv();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let field_data = load_field_data(&cli.field_data)
        .with_context(|| format!("Failed to load field data from {}", cli.field_data.display()))?;
    log::debug!("{} fields loaded", field_data.len());

    let options = build_options(
        field_data,
        cli.context.as_deref(),
        cli.threshold,
        cli.page_range.as_deref(),
    );
    let output_path = fill::resolve_output_path(&cli.form, cli.output.as_deref());
    let config = Config::from_env();

    let mut stdout = std::io::stdout().lock();
    if cli.use_async {
        fill::run_async(&cli.form, &options, &output_path, &config, &mut stdout)?;
    } else {
        fill::fill_sync(&cli.form, &options, &output_path, &config, &mut stdout)?;
    }

    Ok(())
}
