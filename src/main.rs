//! vhost - create, enable, disable and remove local Apache virtual hosts.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vhostctl::cli::{Action, Cli, OutputFormat};
use vhostctl::config::{default_config_candidates, resolve_owner, Settings};
use vhostctl::error::{PreconditionKind, VhostError};
use vhostctl::vhost::{CreateOutcome, VhostInfo, VhostManager};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(action) = cli.action() else {
        eprintln!("No action given, see --help");
        return ExitCode::FAILURE;
    };

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings, &cli);
    debug!(action = action.verb(), "Dispatching");

    match run(&cli, action, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(VhostError::Precondition { kind }) => {
            match &kind {
                PreconditionKind::NotPermitted { .. } => error!("{}", kind),
                _ => warn!("{}", kind),
            }
            ExitCode::from(VhostError::Precondition { kind }.exit_code())
        }
        Err(e) => {
            error!(error = %e, "Operation failed");
            ExitCode::from(e.exit_code())
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, VhostError> {
    match &cli.config {
        Some(path) => Settings::load(path),
        None => Settings::discover(&default_config_candidates()),
    }
}

/// Initialize logging on stderr so stdout carries only command output.
fn init_logging(settings: &Settings, cli: &Cli) {
    let level = if cli.create && cli.dump {
        "error"
    } else {
        match cli.verbose {
            0 => settings.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match settings.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .init(),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.pretty())
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.compact())
            .init(),
    }
}

fn run(cli: &Cli, action: Action, settings: Settings) -> Result<(), VhostError> {
    if !action.is_unprivileged(cli.dump) && !nix::unistd::geteuid().is_root() {
        return Err(VhostError::Precondition {
            kind: PreconditionKind::NotPermitted {
                action: action.verb().to_string(),
            },
        });
    }

    let owner = resolve_owner(&settings.general.user, &settings.general.group)?;
    let manager = VhostManager::system(settings, owner);

    match action {
        Action::Create(name) => {
            if let CreateOutcome::Dumped { config } =
                manager.create_and_enable(&name, &cli.create_options())?
            {
                print!("{}", config);
            }
        }
        Action::Enable(name) => manager.enable(&name)?,
        Action::Disable(name) => manager.disable(&name)?,
        Action::Alter(name) => {
            manager.alter(&name)?;
        }
        Action::Remove(name) => manager.remove(&name, &cli.remove_options())?,
        Action::List => {
            let entries = manager.list(cli.list_scope())?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Text => {
                    for entry in entries {
                        println!("{}", entry);
                    }
                }
            }
        }
        Action::Info(name) => {
            let info = manager.info(&name, cli.mysql)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
                OutputFormat::Text => print_info(&info),
            }
        }
    }

    Ok(())
}

fn print_info(info: &VhostInfo) {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!("name:      {}", info.name);
    println!("site:      {}", info.site_name);
    println!("config:    {}", info.config_path.display());
    println!("enabled:   {}", yes_no(info.enabled));
    println!(
        "site root: {}{}",
        info.site_root.display(),
        if info.site_root_exists { "" } else { " (missing)" }
    );
    if let Some(exists) = info.database_exists {
        println!("database:  {}", yes_no(exists));
    }
}
