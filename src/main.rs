use anyhow::Result;
use clap::{Parser, Subcommand};
use dbdump_manager::managers::{backup, logging};
use dbdump_manager::utils::cron;
use dbdump_manager::{config, BackupManager};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbdump-manager")]
#[command(about = "Dump databases running in Docker containers to their mounted backup directories", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/dbdump-manager.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump and rotate all enabled containers
    Run {
        /// Specific container to process (defaults to all enabled containers)
        #[arg(short = 'n', long)]
        container: Option<String>,

        /// Exit nonzero if any container failed
        #[arg(long)]
        strict: bool,
    },

    /// Delete dumps past retention without creating new ones
    Rotate {
        /// Specific container to rotate (defaults to all enabled containers)
        #[arg(short = 'n', long)]
        container: Option<String>,
    },

    /// List configured containers
    List,

    /// Validate configuration file
    Validate,

    /// Install a crontab entry for periodic runs
    Setup {
        /// Show what would be done without making changes
        #[arg(long)]
        dry_run: bool,

        /// Remove the managed crontab entry instead of installing it
        #[arg(long)]
        remove: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = config::load_config(&cli.config)?;
    let containers = config::resolve_all_containers(&config)?;

    // If no command specified, run the batch
    let command = cli.command.unwrap_or(Commands::Run {
        container: None,
        strict: false,
    });

    // List and Validate only read the config - console logging is enough.
    // Everything else gets file logging with rotation (guard must stay alive).
    let _log_guard = match &command {
        Commands::List | Commands::Validate => {
            logging::init_console_logging();
            None
        }
        _ => {
            let logging_config = logging::LoggingConfig::from_config(
                &config.global.log_directory,
                &config.global.log_level,
                config.global.log_max_files,
                config.global.log_max_size_mb,
            );
            Some(logging::init_logging(&logging_config)?)
        }
    };

    match command {
        Commands::Run { container, strict } => {
            if let Err(e) = backup::ensure_preconditions() {
                eprintln!("✗ {e:#}");
                std::process::exit(1);
            }

            let strict = strict || config.global.strict;
            let manager = BackupManager::new(config, containers);
            let summary = manager.run_all(container.as_deref())?;

            if summary.failures.is_empty() {
                println!("✓ All backups completed successfully");
            } else {
                eprintln!("✗ {} container(s) failed:", summary.failures.len());
                for failure in &summary.failures {
                    eprintln!("  {}", failure);
                }
                // Individual failures only affect the exit code in strict mode
                if strict {
                    std::process::exit(1);
                }
            }
        }

        Commands::Rotate { container } => {
            if let Err(e) = backup::ensure_preconditions() {
                eprintln!("✗ {e:#}");
                std::process::exit(1);
            }

            let strict = config.global.strict;
            let manager = BackupManager::new(config, containers);
            let summary = manager.rotate_all(container.as_deref())?;

            if summary.failures.is_empty() {
                println!("✓ Rotation completed ({} dump(s) removed)", summary.rotated);
            } else {
                eprintln!("✗ {} container(s) failed:", summary.failures.len());
                for failure in &summary.failures {
                    eprintln!("  {}", failure);
                }
                if strict {
                    std::process::exit(1);
                }
            }
        }

        Commands::List => {
            println!("Configured containers:");
            for container in &containers {
                println!("  {}", container.name);
                println!("    Enabled: {}", container.enabled);
                println!("    Retention: {} days", container.retention_days);
                println!("    Dump timeout: {} seconds", container.dump_timeout_seconds);
                if let Some(dir) = &container.backup_dir {
                    println!("    Backup dir: {}", dir.display());
                }
                println!();
            }
        }

        Commands::Validate => {
            println!("Configuration is valid!");
            println!("Containers: {}", containers.len());
            println!(
                "Enabled: {}",
                containers.iter().filter(|c| c.enabled).count()
            );
            println!("Default retention: {} days", config.global.retention_days);
        }

        Commands::Setup { dry_run, remove } => {
            if remove {
                cron::remove_cron_job()?;
                println!("✓ Removed cron job");
            } else {
                if !cron::validate_cron_schedule(&config.global.schedule) {
                    anyhow::bail!("Invalid cron schedule: {}", config.global.schedule);
                }

                cron::add_cron_job(&config.global.schedule, &cli.config, dry_run)?;

                if !dry_run {
                    match cron::list_cron_jobs() {
                        Ok(jobs) if !jobs.is_empty() => {
                            println!("✓ Installed cron job ({})", config.global.schedule)
                        }
                        Ok(_) => eprintln!("⚠ Cron job not found after install"),
                        Err(e) => eprintln!("✗ Failed to verify crontab: {}", e),
                    }
                    println!();
                    println!("Next steps:");
                    println!("  1. View scheduled jobs: crontab -l");
                    println!("  2. Test a backup manually:");
                    println!("     dbdump-manager --config {} run", cli.config.display());
                }
            }
        }
    }

    Ok(())
}
