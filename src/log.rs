use std::time::Duration;

pub fn show_greeting() {
    println!("# reschain - reservoir chain mass balance");
}

pub fn input_reading_line(path: &str) {
    println!("\nReading input files from '{path}'");
}

pub fn output_generation_line(path: &str) {
    println!("\nWriting outputs to '{path}'");
}

pub fn show_farewell(time: Duration) {
    println!("\nTotal running time: {:.2} s", time.as_millis() as f64 / 1000.0)
}

/// Helper function for displaying the greeting data for the simulation
pub fn simulation_greeting(num_chains: usize, num_weeks: usize, seed: u64) {
    println!("\n# Simulating");
    println!("- Chains: {num_chains}");
    println!("- Weeks: {num_weeks}");
    println!("- Seed: {seed}\n");
}

/// Helper function for displaying the simulation table header
pub fn simulation_table_header() {
    println!(
        "{0: ^6} | {1: ^10} | {2: ^12} | {3: ^12} | {4: ^12} | {5: ^14} | {6: ^12}",
        "chain",
        "reservoir",
        "mean storage",
        "spill",
        "evaporation",
        "unmet demand",
        "deficit weeks"
    )
}

/// Helper function for displaying a divider for the simulation table
pub fn simulation_table_divider() {
    println!("{}", "-".repeat(97))
}

/// Helper function for displaying the results of a reservoir in
/// the simulation table
pub fn simulation_table_row(
    chain_index: usize,
    reservoir_id: usize,
    mean_storage: f64,
    spill: f64,
    evaporation: f64,
    unfulfilled_demand: f64,
    deficit_weeks: usize,
) {
    println!(
        "{0: >6} | {1: >10} | {2: >12.2} | {3: >12.2} | {4: >12.2} | {5: >14.2} | {6: >12}",
        chain_index,
        reservoir_id,
        mean_storage,
        spill,
        evaporation,
        unfulfilled_demand,
        deficit_weeks
    )
}

pub fn simulation_chain_summary(
    chain_index: usize,
    outflow: f64,
    spill: f64,
    total_unfulfilled_demand: f64,
    deficit_weeks: usize,
    last_week_unfulfilled_demand: f64,
) {
    println!(
        "Chain {chain_index}: outflow {outflow:.2}, spill {spill:.2}, \
         unmet demand {total_unfulfilled_demand:.2} in {deficit_weeks} weeks \
         (last week {last_week_unfulfilled_demand:.2})"
    );
}

pub fn simulation_duration(time: Duration) {
    println!(
        "\nSimulation time: {:.2} s",
        time.as_millis() as f64 / 1000.0
    )
}
