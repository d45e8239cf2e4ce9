use crate::curve::StorageAreaCurve;
use crate::error::SimulationError;
use tracing::debug;

/// Outcome of a single weekly mass balance. At most one of `release` and
/// `unfulfilled_demand` is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MassBalance {
    pub evaporation: f64,
    pub release: f64,
    pub unfulfilled_demand: f64,
}

#[derive(Debug, Clone)]
pub struct Reservoir {
    id: usize,
    name: String,
    curve: StorageAreaCurve,
    evaporation_rate: Vec<f64>,
    inflow: Vec<f64>,
    demand: Vec<f64>,
    stored_volume: Vec<f64>,
}

impl Reservoir {
    /// Builds a full reservoir. The three series are indexed by week and
    /// must have the same length, which defines the simulation horizon.
    pub fn new(
        id: usize,
        name: &str,
        curve: StorageAreaCurve,
        evaporation_rate: Vec<f64>,
        inflow: Vec<f64>,
        demand: Vec<f64>,
    ) -> Result<Self, SimulationError> {
        let num_weeks = demand.len();
        if num_weeks == 0 {
            return Err(SimulationError::EmptyHorizon);
        }
        for (series, values) in
            [("evaporation rate", &evaporation_rate), ("inflow", &inflow)]
        {
            if values.len() != num_weeks {
                return Err(SimulationError::SeriesLengthMismatch {
                    series,
                    expected: num_weeks,
                    found: values.len(),
                });
            }
        }

        let stored_volume = vec![curve.capacity(); num_weeks];
        Ok(Self {
            id,
            name: name.to_string(),
            curve,
            evaporation_rate,
            inflow,
            demand,
            stored_volume,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> f64 {
        self.curve.capacity()
    }

    pub fn num_weeks(&self) -> usize {
        self.stored_volume.len()
    }

    pub fn inflow(&self) -> &[f64] {
        &self.inflow
    }

    /// Stored volume at the end of each week. Week 0 is the full reservoir.
    pub fn stored_volume(&self) -> &[f64] {
        &self.stored_volume
    }

    /// Restores the initial condition, discarding any simulated week
    pub fn reset(&mut self) {
        let capacity = self.capacity();
        self.stored_volume.fill(capacity);
    }

    /// Performs the mass balance of `week` starting from the storage of the
    /// previous week. The area used for the evaporation losses is evaluated
    /// at that previous storage. Only `stored_volume[week]` is written, so
    /// weeks must be stepped in increasing order, once each.
    pub fn mass_balance(
        &mut self,
        upstream_release: f64,
        week: usize,
    ) -> Result<MassBalance, SimulationError> {
        if week < 1 {
            return Err(SimulationError::InvalidWeek { week });
        }
        let num_weeks = self.num_weeks();
        if week >= num_weeks {
            return Err(SimulationError::WeekBeyondHorizon { week, num_weeks });
        }

        let capacity = self.capacity();
        let initial_storage = self.stored_volume[week - 1];
        let evaporation =
            self.evaporation_rate[week] * self.curve.area_at(initial_storage)?;
        let candidate = initial_storage + upstream_release + self.inflow[week]
            - evaporation
            - self.demand[week];
        if !candidate.is_finite() {
            return Err(SimulationError::NonFiniteBalance { week, candidate });
        }

        let mut balance = MassBalance {
            evaporation,
            ..Default::default()
        };
        let final_storage = if candidate > capacity {
            balance.release = candidate - capacity;
            capacity
        } else if candidate < 0.0 {
            balance.unfulfilled_demand = -candidate;
            0.0
        } else {
            candidate
        };
        self.stored_volume[week] = final_storage;

        debug!(
            reservoir = self.id,
            week,
            initial_storage,
            final_storage,
            evaporation,
            release = balance.release,
            unfulfilled_demand = balance.unfulfilled_demand,
            "mass balance"
        );

        Ok(balance)
    }
}
