//! Grid balancer entry point: CLI wiring and config-driven simulation setup.

use std::io;
use std::process;

use clap::Parser;
use tracing::info;

use grid_balancer::cli::CliArgs;
use grid_balancer::config::ScenarioConfig;
use grid_balancer::display::render_tree;
use grid_balancer::logging::init_tracing;
use grid_balancer::menu;
use grid_balancer::sim::engine::Simulation;
use grid_balancer::sim::generator::DemandGenerator;
use grid_balancer::sim::kpi::GridKpi;

/// Resolves the scenario: --scenario, then --preset, then baseline, plus CLI overrides.
fn load_scenario(cli: &CliArgs) -> Result<ScenarioConfig, String> {
    let mut scenario = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(depth) = cli.depth {
        scenario.grid.depth = depth;
    }
    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(steps) = cli.steps {
        scenario.simulation.steps = steps;
    }
    if let Some(path) = &cli.report {
        scenario.report.enabled = true;
        scenario.report.path = path.display().to_string();
    }
    if cli.no_report {
        scenario.report.enabled = false;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(messages.join("\n"));
    }
    Ok(scenario)
}

fn main() {
    let cli = CliArgs::parse();
    init_tracing(cli.log_level.as_deref());

    let scenario = load_scenario(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let mut sim = Simulation::from_scenario(&scenario);
    info!(
        depth = scenario.grid.depth,
        nodes = sim.grid().len(),
        transformers = sim.grid().transformers().len(),
        "grid built"
    );

    if cli.interactive {
        let stdin = io::stdin();
        if let Err(e) = menu::run(&mut sim, stdin.lock(), io::stdout()) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        return;
    }

    let mut generator = DemandGenerator::new(
        scenario.demand.clone(),
        sim.grid().len(),
        scenario.simulation.seed,
    );
    let outcomes = sim
        .run(scenario.simulation.steps, &mut generator)
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        });

    for (pass, outcome) in outcomes.iter().enumerate() {
        println!("=== Pass {} ===", pass + 1);
        for visit in &outcome.visits {
            println!("{visit}");
        }
    }

    println!("\n{}", render_tree(sim.grid()));
    let kpi = GridKpi::from_outcomes(&outcomes, sim.grid());
    println!("{kpi}");

    if let Some(sink) = sim.report() {
        eprintln!("Load report appended to {}", sink.path().display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(grid_balancer::api::AppState {
            grid: sim.grid().clone(),
            kpi,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(grid_balancer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
