//! switch-ip-check - Mist switch management IP checker
//!
//! A command-line tool that compares the management IP configuration held by
//! Juniper Mist against the addressing switches actually use.

use clap::Parser;
use switch_ip_check::cli::args::{generate_completions, Cli, Commands};
use switch_ip_check::commands::{run_check, run_list, run_reconcile};
use switch_ip_check::config::{Config, ConfigBuilder};
use switch_ip_check::error::{ApiError, AppError, ConfigError, InputError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging, CLI level flags override RUST_LOG
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    logger.format_timestamp(None);
    if let Some(level) = cli.log_filter() {
        logger.filter_level(level);
    }
    logger.init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::debug!("{:?}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = build_config(cli)?;
    log::debug!("Effective configuration: {:?}", config);

    match &cli.command {
        Commands::Reconcile(_) => run_reconcile(&config, cli.format),

        Commands::Check(args) => run_check(args, &config, cli.format),

        Commands::List => run_list(&config, cli.format),

        Commands::Completions { .. } => Ok(()),
    }
}

fn build_config(cli: &Cli) -> Result<Config, AppError> {
    let (input, export) = match &cli.command {
        Commands::Reconcile(args) => (args.input.clone(), Some(&args.export)),
        Commands::Check(args) => (args.input.clone(), Some(&args.export)),
        _ => (None, None),
    };

    let builder = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_host(cli.host.clone())
        .with_org_id(cli.org.clone())
        .with_token(cli.token.clone())
        .with_key(cli.key.map(Into::into))
        .with_input_path(input)
        .with_hide_table(cli.hide);

    let builder = match export {
        Some(export) => builder
            .with_export(export.export)
            .with_output_path(export.outfile.clone()),
        None => builder,
    };

    Ok(builder.build())
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Api(ApiError::Unauthorized(_)) => {
            eprintln!();
            eprintln!("Hint: Check that the API token is valid for this organization.");
            eprintln!("      Tokens are created under My Profile > API Token in the Mist portal.");
        }
        AppError::Api(ApiError::Network(_)) => {
            eprintln!();
            eprintln!("Hint: Check --host (e.g. api.eu.mist.com for the EU cloud).");
        }
        AppError::Input(InputError::NotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Pass the baseline CSV with --input <CSV>.");
        }
        AppError::Config(ConfigError::MissingField(_)) => {
            eprintln!();
            eprintln!("Hint: Set MIST_ORG_ID and MIST_API_TOKEN, pass --org and --token,");
            eprintln!("      or add them to the [mist] section of the config file.");
        }
        _ => {}
    }
}
