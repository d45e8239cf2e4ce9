use crate::error::SimulationError;
use crate::reservoir::{MassBalance, Reservoir};
use rayon::prelude::*;
use tracing::warn;

/// Results of all the reservoirs of a chain in a single week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub week: usize,
    /// One entry per reservoir, in chain order
    pub balances: Vec<MassBalance>,
    pub total_unfulfilled_demand: f64,
    /// Release of the last reservoir, which leaves the chain
    pub outflow: f64,
}

/// Sums of the weekly results of a single reservoir
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReservoirTotals {
    pub spill: f64,
    pub evaporation: f64,
    pub unfulfilled_demand: f64,
    pub deficit_weeks: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub weeks: Vec<WeeklyReport>,
}

impl SimulationReport {
    /// Total unfulfilled demand indexed by week. Week 0 is the initial
    /// condition and never has unfulfilled demand.
    pub fn unfulfilled_demand_series(&self) -> Vec<f64> {
        let mut series = vec![0.0; self.weeks.len() + 1];
        for report in self.weeks.iter() {
            series[report.week] = report.total_unfulfilled_demand;
        }
        series
    }

    pub fn last_week_unfulfilled_demand(&self) -> f64 {
        self.weeks
            .last()
            .map_or(0.0, |r| r.total_unfulfilled_demand)
    }

    pub fn total_unfulfilled_demand(&self) -> f64 {
        self.weeks.iter().map(|r| r.total_unfulfilled_demand).sum()
    }

    pub fn total_outflow(&self) -> f64 {
        self.weeks.iter().map(|r| r.outflow).sum()
    }

    pub fn total_spill(&self) -> f64 {
        self.weeks
            .iter()
            .flat_map(|r| r.balances.iter())
            .map(|b| b.release)
            .sum()
    }

    pub fn weeks_with_deficit(&self) -> usize {
        self.weeks
            .iter()
            .filter(|r| r.total_unfulfilled_demand > 0.0)
            .count()
    }

    /// Totals of the reservoir at `position` in the chain
    pub fn reservoir_totals(&self, position: usize) -> ReservoirTotals {
        let mut totals = ReservoirTotals::default();
        for b in self.weeks.iter().filter_map(|r| r.balances.get(position)) {
            totals.spill += b.release;
            totals.evaporation += b.evaporation;
            totals.unfulfilled_demand += b.unfulfilled_demand;
            if b.unfulfilled_demand > 0.0 {
                totals.deficit_weeks += 1;
            }
        }
        totals
    }
}

/// Runs the mass balance of a single week for every reservoir, from
/// upstream to downstream. The release of each reservoir is the upstream
/// contribution of the next one.
pub fn simulate_week(
    reservoirs: &mut [Reservoir],
    week: usize,
) -> Result<WeeklyReport, SimulationError> {
    let mut balances = Vec::<MassBalance>::with_capacity(reservoirs.len());
    let mut upstream_release = 0.0;
    let mut total_unfulfilled_demand = 0.0;
    for reservoir in reservoirs.iter_mut() {
        let balance =
            reservoir.mass_balance(upstream_release, week).map_err(|e| {
                SimulationError::Reservoir {
                    id: reservoir.id(),
                    name: reservoir.name().to_string(),
                    week,
                    source: Box::new(e),
                }
            })?;
        upstream_release = balance.release;
        total_unfulfilled_demand += balance.unfulfilled_demand;
        balances.push(balance);
    }

    if total_unfulfilled_demand > 0.0 {
        warn!(week, total_unfulfilled_demand, "unfulfilled demand");
    }

    Ok(WeeklyReport {
        week,
        balances,
        total_unfulfilled_demand,
        outflow: upstream_release,
    })
}

/// Simulates weeks `1..num_weeks` of a chain of reservoirs ordered from
/// upstream to downstream. Week 0 is the initial condition and is never
/// recomputed. The first failing step aborts the simulation.
pub fn simulate(
    reservoirs: &mut [Reservoir],
    num_weeks: usize,
) -> Result<SimulationReport, SimulationError> {
    let mut weeks =
        Vec::<WeeklyReport>::with_capacity(num_weeks.saturating_sub(1));
    for week in 1..num_weeks {
        weeks.push(simulate_week(reservoirs, week)?);
    }
    Ok(SimulationReport { weeks })
}

/// A linear chain of reservoirs, from upstream to downstream
#[derive(Debug, Clone)]
pub struct ChainSimulator {
    reservoirs: Vec<Reservoir>,
}

impl ChainSimulator {
    pub fn new(reservoirs: Vec<Reservoir>) -> Result<Self, SimulationError> {
        let expected = match reservoirs.first() {
            Some(r) => r.num_weeks(),
            None => return Err(SimulationError::EmptyChain),
        };
        if let Some(r) = reservoirs.iter().find(|r| r.num_weeks() != expected)
        {
            return Err(SimulationError::HorizonMismatch {
                id: r.id(),
                expected,
                found: r.num_weeks(),
            });
        }
        Ok(Self { reservoirs })
    }

    pub fn reservoirs(&self) -> &[Reservoir] {
        &self.reservoirs
    }

    pub fn num_reservoirs(&self) -> usize {
        self.reservoirs.len()
    }

    pub fn num_weeks(&self) -> usize {
        self.reservoirs[0].num_weeks()
    }

    /// Simulates the first `num_weeks` weeks of the chain, starting again
    /// from full reservoirs.
    pub fn run(
        &mut self,
        num_weeks: usize,
    ) -> Result<SimulationReport, SimulationError> {
        for reservoir in self.reservoirs.iter_mut() {
            reservoir.reset();
        }
        simulate(&mut self.reservoirs, num_weeks)
    }
}

/// Simulates independent chains in parallel. Each chain is still stepped
/// sequentially, week after week.
pub fn simulate_chains(
    chains: &mut [ChainSimulator],
    num_weeks: usize,
) -> Vec<Result<SimulationReport, SimulationError>> {
    chains
        .par_iter_mut()
        .map(|chain| chain.run(num_weeks))
        .collect()
}
