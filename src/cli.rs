use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// NBA statistics ingestion
///
/// Downloads advanced stats, games, box scores and standings for each
/// configured season, plus the active player and injury lists, and writes
/// them as CSV tables into the output directory.
///
/// The API key is read from the BALLDONTLIE_API_KEY environment variable
/// (a .env file in the working directory is honoured).
#[derive(Parser, Debug, Default)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Season to ingest, e.g. 2024 for the 2024-25 season. Repeat to ingest
    /// several seasons. Overrides the seasons from the config file.
    #[arg(long = "season", short = 's', value_name = "YEAR", help_heading = "Run Options")]
    pub seasons: Vec<i32>,

    /// Directory the CSV tables are written to. Overrides the config file.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", help_heading = "Run Options")]
    pub output_dir: Option<String>,

    /// Only ingest season tables; skip active players and injuries.
    #[arg(long = "skip-season-independent", help_heading = "Run Options")]
    pub skip_season_independent: bool,

    /// List current configuration settings and exit
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug logging for this crate.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
