use clap::Parser;

use grpc_web_devtools::{cli, command, result::Result};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("grpc_web_devtools")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match &cli_args.command {
        cli::Command::GenTestHtmls => {
            command::gen_test_htmls::execute(&cli_args)
        }
        cli::Command::GenAllTestsJs => {
            command::gen_all_tests_js::execute(&cli_args)
        }
        cli::Command::ReleaseNotes(cmd) => {
            command::release_notes::execute(&cli_args, cmd).await
        }
    }
}
