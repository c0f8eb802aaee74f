//! NSGA-II population CLI - Summarize and plot outer-loop population files.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};

use nsga_population::{
    plot::{SvgBackend, plot_population},
    population::Population,
    schema::PlotConfig,
};

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <population-file> [x y [z [color]]] [--out plot.svg] [--config plot.json] [--pick N]...",
        program
    );
    eprintln!();
    eprintln!("Summarize an NSGA-II population file, or scatter-plot it over 2-4 objectives.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  population-file  Path to the population file");
    eprintln!("  x y z color      Objective indices to plot (see the summary for indices)");
    eprintln!("  --out            Output SVG path (default: population file with .svg extension)");
    eprintln!("  --config         Plot configuration JSON (default: population file with .plot.json extension)");
    eprintln!("  --pick           Print the solution behind plotted point N");
    eprintln!();
    eprintln!("Example configuration is printed with --example.");
}

struct Args {
    population_path: PathBuf,
    objectives: Vec<usize>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    picks: Vec<usize>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut population_path = None;
    let mut objectives = Vec::new();
    let mut out = None;
    let mut config = None;
    let mut picks = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(flag_value(&mut iter, "--out")?)),
            "--config" => config = Some(PathBuf::from(flag_value(&mut iter, "--config")?)),
            "--pick" => {
                let value = flag_value(&mut iter, "--pick")?;
                picks.push(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid point index '{}'", value))?,
                );
            }
            _ if population_path.is_none() => population_path = Some(PathBuf::from(arg)),
            _ => objectives.push(
                arg.parse()
                    .map_err(|_| format!("Invalid objective index '{}'", arg))?,
            ),
        }
    }

    Ok(Args {
        population_path: population_path.ok_or("Missing population file")?,
        objectives,
        out,
        config,
        picks,
    })
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{} requires a value", flag))
}

fn load_config(args: &Args) -> Result<PlotConfig, String> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let default_path = args.population_path.with_extension("plot.json");
            if !default_path.exists() {
                return Ok(PlotConfig::default());
            }
            default_path
        }
    };

    let config_str = fs::read_to_string(&path)
        .map_err(|e| format!("Error reading config file {}: {}", path.display(), e))?;
    serde_json::from_str(&config_str).map_err(|e| format!("Error parsing config: {}", e))
}

fn print_summary(path: &Path, population: &Population, threshold: f64) {
    println!("NSGA-II Population");
    println!("==================");
    println!("File: {}", path.display());
    println!("Solutions: {}", population.len());
    println!(
        "Feasible: {}",
        population.number_of_feasible_solutions(threshold)
    );
    println!("Genes: {}", population.gene_column_headers.len());
    println!();
    println!("Objectives:");
    for (i, header) in population.objective_column_headers.iter().enumerate() {
        match population.objective_bounds(i, threshold) {
            Some(b) => println!("  [{}] {}: [{:.6}, {:.6}]", i, header, b.min, b.max),
            None => println!("  [{}] {}: no feasible values", i, header),
        }
    }
}

fn print_example_config() {
    match serde_json::to_string_pretty(&PlotConfig::default()) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let raw_args: Vec<String> = std::env::args().collect();

    if raw_args.len() > 1 && raw_args[1] == "--example" {
        print_example_config();
        return;
    }

    if raw_args.len() < 2 {
        print_usage(&raw_args[0]);
        std::process::exit(1);
    }

    let args = parse_args(&raw_args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&raw_args[0]);
        std::process::exit(1);
    });

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let population = Population::load(&args.population_path).unwrap_or_else(|e| {
        eprintln!("Error loading population: {}", e);
        if let Some(source) = std::error::Error::source(&e) {
            eprintln!("  caused by: {}", source);
        }
        std::process::exit(1);
    });

    if args.objectives.is_empty() {
        print_summary(&args.population_path, &population, config.infeasibility_threshold);
        return;
    }

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| args.population_path.with_extension("svg"));
    let mut backend = SvgBackend::new(&out, config.clone());

    let mut session = plot_population(
        &population,
        &args.objectives,
        &config,
        &mut backend,
        |event| println!("{}", event),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error plotting population: {}", e);
        std::process::exit(1);
    });

    println!(
        "Plotted {} solutions to {}",
        session.scene().len(),
        out.display()
    );

    for &point in &args.picks {
        if session.pick(point).is_none() {
            eprintln!(
                "Point {} out of range ({} plotted)",
                point,
                session.scene().len()
            );
        }
    }
}
