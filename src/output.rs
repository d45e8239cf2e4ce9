use crate::chain::{ChainSimulator, SimulationReport};
use chrono::{NaiveDate, TimeDelta};
use csv::Writer;
use std::error::Error;
use tracing::info;

/// Formats the date of a week, when the study has a start date
fn week_date(start_date: Option<NaiveDate>, week: usize) -> String {
    match start_date {
        Some(date) => (date + TimeDelta::weeks(week as i64)).to_string(),
        None => String::new(),
    }
}

#[derive(serde::Serialize)]
struct ReservoirSimulationOutput {
    chain_index: usize,
    reservoir_id: usize,
    week: usize,
    date: String,
    stored_volume: f64,
    evaporation: f64,
    release: f64,
    unfulfilled_demand: f64,
}

fn write_reservoirs_simulation_results(
    chains: &[ChainSimulator],
    reports: &[SimulationReport],
    start_date: Option<NaiveDate>,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let filepath = path.to_owned() + "/simulation_reservoirs.csv";
    let mut wtr = Writer::from_path(&filepath)?;
    for (chain_index, (chain, report)) in
        chains.iter().zip(reports.iter()).enumerate()
    {
        for (position, reservoir) in chain.reservoirs().iter().enumerate() {
            // Writes the initial condition
            wtr.serialize(ReservoirSimulationOutput {
                chain_index,
                reservoir_id: reservoir.id(),
                week: 0,
                date: week_date(start_date, 0),
                stored_volume: reservoir.stored_volume()[0],
                evaporation: 0.0,
                release: 0.0,
                unfulfilled_demand: 0.0,
            })?;
            // Writes simulated weeks
            for weekly in report.weeks.iter() {
                let balance = &weekly.balances[position];
                wtr.serialize(ReservoirSimulationOutput {
                    chain_index,
                    reservoir_id: reservoir.id(),
                    week: weekly.week,
                    date: week_date(start_date, weekly.week),
                    stored_volume: reservoir.stored_volume()[weekly.week],
                    evaporation: balance.evaporation,
                    release: balance.release,
                    unfulfilled_demand: balance.unfulfilled_demand,
                })?;
            }
        }
    }
    wtr.flush()?;
    info!(filepath, "wrote reservoir results");
    Ok(())
}

#[derive(serde::Serialize)]
struct WeeklySimulationOutput {
    chain_index: usize,
    week: usize,
    date: String,
    total_unfulfilled_demand: f64,
    outflow: f64,
}

fn write_weekly_simulation_results(
    reports: &[SimulationReport],
    start_date: Option<NaiveDate>,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let filepath = path.to_owned() + "/simulation_weeks.csv";
    let mut wtr = Writer::from_path(&filepath)?;
    for (chain_index, report) in reports.iter().enumerate() {
        for weekly in report.weeks.iter() {
            wtr.serialize(WeeklySimulationOutput {
                chain_index,
                week: weekly.week,
                date: week_date(start_date, weekly.week),
                total_unfulfilled_demand: weekly.total_unfulfilled_demand,
                outflow: weekly.outflow,
            })?;
        }
    }
    wtr.flush()?;
    info!(filepath, "wrote weekly results");
    Ok(())
}

pub fn generate_outputs(
    chains: &[ChainSimulator],
    reports: &[SimulationReport],
    start_date: Option<NaiveDate>,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    write_reservoirs_simulation_results(chains, reports, start_date, path)?;
    write_weekly_simulation_results(reports, start_date, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::StorageAreaCurve;
    use crate::reservoir::Reservoir;
    use std::fs;

    fn simulated_chain() -> (ChainSimulator, SimulationReport) {
        let curve = StorageAreaCurve::new(
            vec![0.0, 500.0, 800.0, 1000.0],
            vec![0.0, 400.0, 600.0, 900.0],
        )
        .unwrap();
        let upstream = Reservoir::new(
            0,
            "upstream",
            curve.clone(),
            vec![0.0; 3],
            vec![0.0, 150.0, 0.0],
            vec![50.0; 3],
        )
        .unwrap();
        let downstream = Reservoir::new(
            1,
            "downstream",
            curve,
            vec![0.0; 3],
            vec![0.0; 3],
            vec![600.0; 3],
        )
        .unwrap();
        let mut chain =
            ChainSimulator::new(vec![upstream, downstream]).unwrap();
        let report = chain.run(3).unwrap();
        (chain, report)
    }

    #[test]
    fn test_week_date() {
        let start = NaiveDate::from_ymd_opt(2015, 1, 5);
        assert_eq!(week_date(start, 0), "2015-01-05");
        assert_eq!(week_date(start, 2), "2015-01-19");
        assert_eq!(week_date(None, 2), "");
    }

    #[test]
    fn test_write_reservoirs_simulation_results() {
        let (chain, report) = simulated_chain();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        write_reservoirs_simulation_results(&[chain], &[report], None, path)
            .unwrap();

        let contents =
            fs::read_to_string(path.to_owned() + "/simulation_reservoirs.csv")
                .unwrap();
        let expected = "chain_index,reservoir_id,week,date,stored_volume,evaporation,release,unfulfilled_demand\n\
            0,0,0,,1000.0,0.0,0.0,0.0\n\
            0,0,1,,1000.0,0.0,100.0,0.0\n\
            0,0,2,,950.0,0.0,0.0,0.0\n\
            0,1,0,,1000.0,0.0,0.0,0.0\n\
            0,1,1,,500.0,0.0,0.0,0.0\n\
            0,1,2,,0.0,0.0,0.0,100.0\n";
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_write_weekly_simulation_results() {
        let (_, report) = simulated_chain();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let start = NaiveDate::from_ymd_opt(2015, 1, 5);

        write_weekly_simulation_results(&[report], start, path).unwrap();

        let contents =
            fs::read_to_string(path.to_owned() + "/simulation_weeks.csv")
                .unwrap();
        let expected = "chain_index,week,date,total_unfulfilled_demand,outflow\n\
            0,1,2015-01-12,0.0,0.0\n\
            0,2,2015-01-19,100.0,0.0\n";
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_generate_outputs() {
        let (chain, report) = simulated_chain();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        generate_outputs(&[chain], &[report], None, path).unwrap();

        assert!(dir.path().join("simulation_reservoirs.csv").exists());
        assert!(dir.path().join("simulation_weeks.csv").exists());
    }
}
