//! The command line interface for the simulation.
use crate::calendar::{PRODUCTION_CALENDAR, monthly_yield};
use crate::input::scenario::read_scenario;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir, get_scenario_name};
use crate::settings::{Settings, get_settings_file_path};
use crate::simulation::{new_rng, resource_bounds, yield_bounds};
use crate::tables::ModelTables;
use crate::units::YieldPerArea;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod preset;
use preset::PresetSubcommands;

/// The command line interface for the simulation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Seed for the random source (overrides the seed in the scenario file)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of independent simulations to run (overrides the settings file)
    #[arg(long)]
    pub iterations: Option<u32>,
    /// Directory containing replacement factor tables
    #[arg(long)]
    pub tables_dir: Option<PathBuf>,
}

/// Subcommands for managing the settings file
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print where the settings file is read from
    Path,
    /// Print the settings that runs will use
    Show,
    /// Print a commented-out default `settings.toml`
    DumpDefault,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario.
    Run {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Check a scenario against the factor tables without simulating it.
    Validate {
        /// Path to the scenario file.
        scenario_path: PathBuf,
        /// Directory containing replacement factor tables
        #[arg(long)]
        tables_dir: Option<PathBuf>,
    },
    /// Manage preset scenarios.
    Preset {
        /// The available subcommands for managing presets.
        #[command(subcommand)]
        subcommand: PresetSubcommands,
    },
    /// Show the production calendar.
    Calendar {
        /// Split this annual yield (kg/m²) across the months
        #[arg(long)]
        annual_yield: Option<f64>,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_path,
                opts,
            } => handle_run_command(&scenario_path, &opts, None),
            Self::Validate {
                scenario_path,
                tables_dir,
            } => handle_validate_command(&scenario_path, tables_dir.as_deref(), None),
            Self::Preset { subcommand } => subcommand.execute(),
            Self::Calendar { annual_yield } => handle_calendar_command(annual_yield),
            Self::Settings { subcommand } => handle_settings_command(&subcommand),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ strawberry-sim --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Initialise the program logger, unless an earlier command in this process already did
fn init_logger(settings: &Settings, log_file_path: Option<&Path>) -> Result<()> {
    if log::is_logger_initialised() {
        return Ok(());
    }

    log::init(Some(settings.log_level.as_str()), log_file_path)
        .context("Failed to initialise logging.")
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;
    let iterations = opts.iterations.unwrap_or(settings.iterations);
    ensure!(iterations > 0, "Number of iterations must be at least one");

    // Get path to output folder
    let scenario_name = get_scenario_name(scenario_path)?;
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(scenario_name);
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    init_logger(&settings, Some(output_path))?;

    // Load the scenario and tables
    let (file, input) = read_scenario(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());
    if !file.description.is_empty() {
        info!("Scenario: {}", file.description);
    }
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder was overwritten");
    }

    let owned_tables: ModelTables;
    let tables = if let Some(tables_dir) = opts.tables_dir.as_deref() {
        owned_tables = ModelTables::from_path(tables_dir).context("Failed to load tables.")?;
        info!("Loaded factor tables from {}", tables_dir.display());
        &owned_tables
    } else {
        ModelTables::builtin()
    };

    let seed = opts.seed.or(file.seed);
    match seed {
        Some(seed) => info!("Random seed: {seed}"),
        None => info!("No random seed given; results will not be reproducible"),
    }

    write_metadata(output_path, scenario_name, seed, iterations)
        .context("Failed to write metadata.")?;

    // Run the simulation
    let mut rng = new_rng(seed);
    crate::simulation::run(
        tables,
        &input,
        &file.financial_parameters(),
        iterations,
        &mut rng,
        output_path,
    )?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    scenario_path: &Path,
    tables_dir: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    init_logger(&settings, None)?;

    let (_, input) = read_scenario(scenario_path).context("Failed to validate scenario.")?;
    let owned_tables: ModelTables;
    let tables = if let Some(tables_dir) = tables_dir {
        owned_tables = ModelTables::from_path(tables_dir).context("Failed to load tables.")?;
        &owned_tables
    } else {
        ModelTables::builtin()
    };
    tables
        .check_input(&input)
        .context("Failed to validate scenario.")?;

    let (min_yield, max_yield) = yield_bounds(tables, &input)?;
    let (min_resources, max_resources) = resource_bounds(tables, &input)?;
    info!(
        "Yield will lie between {:.3} and {:.3} kg/m²",
        min_yield.value(),
        max_yield.value()
    );
    info!(
        "Water will lie between {:.1} and {:.1} l/m²; fertiliser between {:.4} and {:.4} kg/m²",
        min_resources.water.value(),
        max_resources.water.value(),
        min_resources.fertiliser.value(),
        max_resources.fertiliser.value()
    );
    info!("Scenario validation successful!");

    Ok(())
}

/// Handle the `calendar` command.
fn handle_calendar_command(annual_yield: Option<f64>) -> Result<()> {
    let Some(annual_yield) = annual_yield else {
        for entry in &PRODUCTION_CALENDAR {
            println!(
                "{:<10} {:>3}%  {}",
                entry.month.name(),
                entry.share_percent,
                entry.activity
            );
        }
        return Ok(());
    };

    ensure!(
        annual_yield.is_finite() && annual_yield >= 0.0,
        "Annual yield must be a non-negative number"
    );
    for month in monthly_yield(YieldPerArea(annual_yield)) {
        println!(
            "{:<10} {:>3}%  {:.3} kg/m²",
            month.month,
            month.share_percent,
            month.yield_per_area.value()
        );
    }

    Ok(())
}

/// Handle the `settings` subcommands.
fn handle_settings_command(subcommand: &SettingsSubcommands) -> Result<()> {
    let file_path = get_settings_file_path();
    match subcommand {
        SettingsSubcommands::Edit => {
            if Settings::create_default_file(&file_path)? {
                println!("Created default settings file at {}", file_path.display());
            }
            edit::edit_file(&file_path)
                .with_context(|| format!("Could not open {} for editing", file_path.display()))?;

            // Catch mistakes now rather than on the next run
            Settings::load_from_path(&file_path).context("Edited settings file is invalid.")?;
        }
        SettingsSubcommands::Path => println!("{}", file_path.display()),
        SettingsSubcommands::Show => {
            let settings = Settings::load_from_path(&file_path)
                .context("Failed to load settings.")?;
            print!("{}", settings.to_toml()?);
        }
        SettingsSubcommands::DumpDefault => print!("{}", Settings::default_file_contents()),
    }

    Ok(())
}
