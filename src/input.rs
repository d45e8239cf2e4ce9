use crate::chain::ChainSimulator;
use crate::curve::StorageAreaCurve;
use crate::error::InputError;
use crate::reservoir::Reservoir;
use crate::stochastic_process::{
    Constant, Deterministic, SeasonalLogNormal, StochasticProcess,
    UniformProcess,
};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Deserialize;
use std::error::Error;
use std::fs;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub num_weeks: usize,
    pub seed: u64,
    #[serde(default)]
    pub start_date: Option<String>,
}

impl Config {
    /// Date of week 0, when given in the configuration
    pub fn start_date(&self) -> Result<Option<NaiveDate>, InputError> {
        self.start_date
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| InputError::InvalidDate(s.to_string()))
            })
            .transpose()
    }
}

fn read_json_file(filepath: &str) -> Result<String, Box<dyn Error>> {
    let contents = fs::read_to_string(filepath)
        .map_err(|e| format!("Error while reading {filepath}: {e}"))?;
    info!(filepath, "read input file");
    Ok(contents)
}

pub fn read_config_input(filepath: &str) -> Result<Config, Box<dyn Error>> {
    let contents = read_json_file(filepath)?;
    let parsed: Config = serde_json::from_str(&contents)?;
    Ok(parsed)
}

#[derive(Debug, Deserialize)]
pub struct CurveInput {
    pub storage: Vec<f64>,
    pub area: Vec<f64>,
}

/// How a weekly series of a reservoir is obtained
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesInput {
    Values {
        values: Vec<f64>,
    },
    Constant {
        value: f64,
    },
    Uniform {
        low: f64,
        high: f64,
    },
    SeasonalLognormal {
        sin_amplitude: f64,
        log_mu: f64,
        log_sigma: f64,
    },
}

impl SeriesInput {
    pub fn build_process(
        &self,
        id: usize,
        series: &'static str,
        num_weeks: usize,
    ) -> Result<Box<dyn StochasticProcess>, InputError> {
        let invalid = |reason: String| InputError::InvalidDistribution {
            id,
            series,
            reason,
        };
        match self {
            SeriesInput::Values { values } => {
                if values.len() != num_weeks {
                    return Err(InputError::SeriesLength {
                        id,
                        series,
                        expected: num_weeks,
                        found: values.len(),
                    });
                }
                Ok(Box::new(Deterministic::new(values.clone())))
            }
            SeriesInput::Constant { value } => {
                Ok(Box::new(Constant::new(*value)))
            }
            SeriesInput::Uniform { low, high } => Ok(Box::new(
                UniformProcess::new(*low, *high).map_err(invalid)?,
            )),
            SeriesInput::SeasonalLognormal {
                sin_amplitude,
                log_mu,
                log_sigma,
            } => Ok(Box::new(
                SeasonalLogNormal::new(*sin_amplitude, *log_mu, *log_sigma)
                    .map_err(invalid)?,
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReservoirInput {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub downstream_id: Option<usize>,
    pub storage_area_curve: CurveInput,
    pub evaporation_rate: SeriesInput,
    pub inflow: SeriesInput,
    pub demand: SeriesInput,
}

#[derive(Debug, Deserialize)]
pub struct SystemInput {
    pub reservoirs: Vec<ReservoirInput>,
}

pub fn read_system_input(
    filepath: &str,
) -> Result<SystemInput, Box<dyn Error>> {
    let contents = read_json_file(filepath)?;
    let parsed: SystemInput = serde_json::from_str(&contents)?;
    Ok(parsed)
}

/// Ensures the ids are exactly `0..ids.len()`
fn validate_id_range(ids: &[usize]) -> Result<(), InputError> {
    let mut seen = vec![false; ids.len()];
    for id in ids.iter() {
        match seen.get_mut(*id) {
            Some(true) => return Err(InputError::DuplicateId(*id)),
            Some(flag) => *flag = true,
            None => {}
        }
    }
    match seen.iter().position(|s| !s) {
        Some(missing) => Err(InputError::MissingId(missing)),
        None => Ok(()),
    }
}

impl SystemInput {
    fn find_reservoir(&self, id: usize) -> Result<&ReservoirInput, InputError> {
        self.reservoirs
            .iter()
            .find(|r| r.id == id)
            .ok_or(InputError::MissingId(id))
    }

    /// Splits the reservoirs into linear chains following the
    /// `downstream_id` links. Each chain is listed from upstream to
    /// downstream and chains are sorted by the id of their first reservoir.
    pub fn chain_orders(&self) -> Result<Vec<Vec<usize>>, InputError> {
        let ids: Vec<usize> = self.reservoirs.iter().map(|r| r.id).collect();
        validate_id_range(&ids)?;

        let num_reservoirs = ids.len();
        let mut downstream = vec![None; num_reservoirs];
        let mut upstream = vec![Vec::<usize>::new(); num_reservoirs];
        for r in self.reservoirs.iter() {
            if let Some(downstream_id) = r.downstream_id {
                if downstream_id >= num_reservoirs {
                    return Err(InputError::UnknownDownstream {
                        id: r.id,
                        downstream_id,
                    });
                }
                downstream[r.id] = Some(downstream_id);
                upstream[downstream_id].push(r.id);
            }
        }
        for (downstream_id, upstream_ids) in upstream.iter().enumerate() {
            if upstream_ids.len() > 1 {
                let mut upstream_ids = upstream_ids.clone();
                upstream_ids.sort_unstable();
                return Err(InputError::Confluence {
                    downstream_id,
                    upstream_ids,
                });
            }
        }

        let mut visited = vec![false; num_reservoirs];
        let mut chains = Vec::<Vec<usize>>::new();
        for head in 0..num_reservoirs {
            if !upstream[head].is_empty() {
                continue;
            }
            let mut chain = vec![head];
            visited[head] = true;
            let mut current = head;
            while let Some(next) = downstream[current] {
                chain.push(next);
                visited[next] = true;
                current = next;
            }
            chains.push(chain);
        }

        // with at most one upstream per reservoir, whatever was not reached
        // from a head is part of a cycle
        let in_cycles: Vec<usize> =
            (0..num_reservoirs).filter(|id| !visited[*id]).collect();
        if !in_cycles.is_empty() {
            return Err(InputError::Cycle(in_cycles));
        }

        Ok(chains)
    }

    /// Builds every reservoir with its weekly series and groups them in
    /// chains. Random series are drawn from a single generator seeded with
    /// `seed`, in reservoir id order and, for each reservoir, in the order
    /// evaporation rate, inflow, demand.
    pub fn build_chains(
        &self,
        num_weeks: usize,
        seed: u64,
    ) -> Result<Vec<ChainSimulator>, Box<dyn Error>> {
        let chain_orders = self.chain_orders()?;
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let mut reservoirs =
            Vec::<Option<Reservoir>>::with_capacity(self.reservoirs.len());
        for id in 0..self.reservoirs.len() {
            let r = self.find_reservoir(id)?;
            let curve = StorageAreaCurve::new(
                r.storage_area_curve.storage.clone(),
                r.storage_area_curve.area.clone(),
            )?;
            let evaporation_rate = r
                .evaporation_rate
                .build_process(id, "evaporation rate", num_weeks)?
                .generate(num_weeks, &mut rng);
            let inflow = r
                .inflow
                .build_process(id, "inflow", num_weeks)?
                .generate(num_weeks, &mut rng);
            let demand = r
                .demand
                .build_process(id, "demand", num_weeks)?
                .generate(num_weeks, &mut rng);
            reservoirs.push(Some(Reservoir::new(
                id,
                &r.name,
                curve,
                evaporation_rate,
                inflow,
                demand,
            )?));
        }

        let mut chains =
            Vec::<ChainSimulator>::with_capacity(chain_orders.len());
        for order in chain_orders.iter() {
            let mut chain_reservoirs =
                Vec::<Reservoir>::with_capacity(order.len());
            for id in order.iter() {
                let reservoir =
                    reservoirs[*id].take().ok_or(InputError::MissingId(*id))?;
                chain_reservoirs.push(reservoir);
            }
            chains.push(ChainSimulator::new(chain_reservoirs)?);
        }
        Ok(chains)
    }
}

pub struct Input {
    pub config: Config,
    pub system: SystemInput,
}

impl Input {
    pub fn build(path: &str) -> Result<Self, Box<dyn Error>> {
        let config = read_config_input(&(path.to_owned() + "/config.json"))?;
        let system =
            read_system_input(&(path.to_owned() + "/reservoirs.json"))?;
        Ok(Self { config, system })
    }
}
