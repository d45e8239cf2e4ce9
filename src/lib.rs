pub mod chain;
pub mod curve;
pub mod error;
pub mod input;
mod log;
pub mod output;
pub mod reservoir;
pub mod stochastic_process;
pub mod utils;
use chain::{ChainSimulator, SimulationReport};
use input::Input;
use std::error::Error;
use std::time::Instant;

fn show_simulation_results(
    chains: &[ChainSimulator],
    reports: &[SimulationReport],
) {
    log::simulation_table_header();
    log::simulation_table_divider();
    for (chain_index, (chain, report)) in
        chains.iter().zip(reports.iter()).enumerate()
    {
        for (position, reservoir) in chain.reservoirs().iter().enumerate() {
            let totals = report.reservoir_totals(position);
            log::simulation_table_row(
                chain_index,
                reservoir.id(),
                utils::mean(reservoir.stored_volume()),
                totals.spill,
                totals.evaporation,
                totals.unfulfilled_demand,
                totals.deficit_weeks,
            );
        }
    }
    log::simulation_table_divider();
    for (chain_index, report) in reports.iter().enumerate() {
        log::simulation_chain_summary(
            chain_index,
            report.total_outflow(),
            report.total_spill(),
            report.total_unfulfilled_demand(),
            report.weeks_with_deficit(),
            report.last_week_unfulfilled_demand(),
        );
    }
}

pub fn run(input_args: &InputArgs) -> Result<(), Box<dyn Error>> {
    log::show_greeting();

    let begin = Instant::now();
    log::input_reading_line(&input_args.path);
    let input = Input::build(&input_args.path)?;
    let config = &input.config;
    let start_date = config.start_date()?;

    let mut chains =
        input.system.build_chains(config.num_weeks, config.seed)?;

    log::simulation_greeting(chains.len(), config.num_weeks, config.seed);
    let simulation_begin = Instant::now();
    let reports = chain::simulate_chains(&mut chains, config.num_weeks)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    show_simulation_results(&chains, &reports);
    log::simulation_duration(simulation_begin.elapsed());

    log::output_generation_line(&input_args.path);
    output::generate_outputs(&chains, &reports, start_date, &input_args.path)?;

    log::show_farewell(begin.elapsed());

    Ok(())
}

pub struct InputArgs {
    pub path: String,
}

impl InputArgs {
    pub fn build(args: &[String]) -> Result<Self, &'static str> {
        if args.len() < 2 {
            return Err("Not enough arguments [PATH]");
        }

        let path = args[1].clone();

        Ok(Self { path })
    }
}
