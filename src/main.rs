use std::fs::read_to_string;

use clap::{arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use portfolio_grid::config::{Config, APP_NAME, CONFIG_NAME};
use portfolio_grid::{rows_from_str, Columns, Grid};

fn cli() -> Command {
    Command::new(APP_NAME)
        .about("Show JSON records as a sortable table")
        .arg_required_else_help(true)
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(
            Command::new("show")
                .about("Print the records of a file as a table")
                .arg(
                    arg!(<FILE> "JSON file with an array of records")
                        .required(false)
                        .default_value(""),
                )
                .arg(arg!(-c --columns <COLUMNS> "JSON file with the column configuration"))
                .arg(
                    arg!(-s --sort <PATH> "Toggle the sort on a column path; repeat to sort descending")
                        .action(ArgAction::Append),
                ),
        )
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn load_columns(path: Option<&str>) -> Result<Columns> {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => {
            let data = read_to_string(path)
                .wrap_err_with(|| format!("Error reading column configuration: {path}"))?;
            Ok(Columns::from_json(&data)?)
        }
        None => Ok(Columns::holdings()),
    }
}

// clicks every requested path in order, as a user clicking headers would
fn build_grid(matches: &ArgMatches, cfg: &Config) -> Result<Grid> {
    let columns_file = matches
        .get_one::<String>("columns")
        .map(String::as_str)
        .or(Some(cfg.columns_file.as_str()));
    let mut grid = Grid::new(load_columns(columns_file)?);
    if let Some(currency) = cfg.currency() {
        grid = grid.with_currency(currency);
    }

    let sort: Vec<String> = match matches.get_many::<String>("sort") {
        Some(paths) => paths.cloned().collect(),
        None => cfg.sort.clone(),
    };
    for path in &sort {
        if !grid.click(path) {
            warn!(path = %path, "not a sortable column, ignoring");
        }
    }
    Ok(grid)
}

fn show(matches: &ArgMatches, cfg: &Config) -> Result<()> {
    let mut filename = String::new();

    // try to get filename as argument
    if let Ok(Some(f)) = matches.try_get_one::<String>("FILE") {
        filename = f.to_string();
    }
    // if no argument is given, try to get filename from config
    if filename.is_empty() {
        filename.clone_from(&cfg.data_file);
    }
    // if no argument and no config is given, print help
    if filename.is_empty() {
        cli().print_help()?;
        return Ok(());
    }

    let data = read_to_string(&filename).wrap_err_with(|| format!("Error reading file: {filename}"))?;
    let rows = rows_from_str(&data)?;
    let grid = build_grid(matches, cfg)?;
    info!(rows = rows.len(), columns = grid.columns().len(), "rendering table");

    println!("{}", grid.table(&rows));
    println!(
        "{} {}",
        "Sorted by:".bold(),
        grid.sort_state().to_string().cyan()
    );
    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let cfg: Config =
        confy::load(APP_NAME, CONFIG_NAME).wrap_err("Error loading configuration")?;

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("config", _)) => {
            let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
                .wrap_err("Error locating configuration")?;
            println!("Your config file is located here: \n{}", path.display());
        }
        Some(("show", matches)) => show(matches, &cfg)?,
        _ => (),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli() {
        let matches = cli().get_matches_from(vec![
            "portfolio_grid",
            "show",
            "example_data.json",
            "--sort",
            "quantity",
            "-s",
            "symbol",
        ]);
        let (name, show) = matches.subcommand().unwrap();
        assert_eq!(name, "show");
        assert_eq!(show.get_one::<String>("FILE").unwrap(), "example_data.json");
        let sort: Vec<&String> = show.get_many::<String>("sort").unwrap().collect();
        assert_eq!(sort, vec!["quantity", "symbol"]);
    }

    #[test]
    fn test_build_grid_from_example_files() {
        let matches = cli().get_matches_from(vec![
            "portfolio_grid",
            "show",
            "example_data.json",
            "--columns",
            "example_columns.json",
            "--sort",
            "currentPrice",
            "--sort",
            "currentPrice",
        ]);
        let (_, show) = matches.subcommand().unwrap();
        let grid = build_grid(show, &Config::default()).unwrap();
        assert_eq!(grid.sort_state().to_string(), "currentPrice ▼");

        let rows = rows_from_str(&read_to_string("example_data.json").unwrap()).unwrap();
        let view = grid.view(&rows);
        assert_eq!(view.len(), rows.len());
        assert_eq!(view[0].1["symbol"], "NVDA");
    }

    #[test]
    fn test_config_sort_is_used_without_flags() {
        let matches = cli().get_matches_from(vec!["portfolio_grid", "show", "example_data.json"]);
        let (_, show) = matches.subcommand().unwrap();
        let cfg = Config {
            sort: vec!["symbol".to_string(), "id".to_string()],
            ..Config::default()
        };
        let grid = build_grid(show, &cfg).unwrap();
        assert_eq!(grid.sort_state().to_string(), "symbol ▲");
    }
}
