use crate::error::SimulationError;
use crate::utils;

/// Piecewise-linear relation between the stored volume of a reservoir and
/// its surface area, used for scaling the evaporation losses.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageAreaCurve {
    storages: Vec<f64>,
    areas: Vec<f64>,
}

impl StorageAreaCurve {
    /// Builds a curve from its breakpoints. Storages must start at zero and
    /// be strictly increasing, with at least two breakpoints.
    pub fn new(
        storages: Vec<f64>,
        areas: Vec<f64>,
    ) -> Result<Self, SimulationError> {
        if storages.len() != areas.len() {
            return Err(SimulationError::InvalidCurve(format!(
                "{} storages for {} areas",
                storages.len(),
                areas.len()
            )));
        }
        if storages.len() < 2 {
            return Err(SimulationError::InvalidCurve(format!(
                "at least 2 breakpoints are required, found {}",
                storages.len()
            )));
        }
        if storages.iter().chain(areas.iter()).any(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidCurve(
                "breakpoints must be finite".to_string(),
            ));
        }
        if storages[0] != 0.0 {
            return Err(SimulationError::InvalidCurve(format!(
                "first storage must be 0, found {}",
                storages[0]
            )));
        }
        let decreasing =
            (1..storages.len()).find(|&i| storages[i] <= storages[i - 1]);
        if let Some(i) = decreasing {
            return Err(SimulationError::InvalidCurve(format!(
                "storages must be strictly increasing, found {} after {}",
                storages[i],
                storages[i - 1]
            )));
        }
        Ok(Self { storages, areas })
    }

    pub fn from_breakpoints(
        breakpoints: &[(f64, f64)],
    ) -> Result<Self, SimulationError> {
        let (storages, areas): (Vec<f64>, Vec<f64>) =
            breakpoints.iter().copied().unzip();
        Self::new(storages, areas)
    }

    /// The largest storage of the curve, which is the reservoir capacity
    pub fn capacity(&self) -> f64 {
        self.storages[self.storages.len() - 1]
    }

    pub fn breakpoint_count(&self) -> usize {
        self.storages.len()
    }

    /// Evaluates the surface area at a given stored volume, interpolating
    /// between the first breakpoint strictly above `storage` and its
    /// predecessor.
    pub fn area_at(&self, storage: f64) -> Result<f64, SimulationError> {
        let capacity = self.capacity();
        if !(0.0..=capacity).contains(&storage) {
            return Err(SimulationError::OutOfRange { storage, capacity });
        }

        for i in 1..self.storages.len() {
            if storage < self.storages[i] {
                return Ok(utils::linear_interpolation(
                    self.storages[i - 1],
                    self.areas[i - 1],
                    self.storages[i],
                    self.areas[i],
                    storage,
                ));
            }
        }

        // storage == capacity
        Ok(self.areas[self.areas.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_curve() -> StorageAreaCurve {
        StorageAreaCurve::new(
            vec![0.0, 500.0, 800.0, 1000.0],
            vec![0.0, 400.0, 600.0, 900.0],
        )
        .unwrap()
    }

    #[test]
    fn test_capacity_is_last_storage() {
        let curve = reference_curve();
        assert_eq!(curve.capacity(), 1000.0);
        assert_eq!(curve.breakpoint_count(), 4);
    }

    #[test]
    fn test_area_at_reference_values() {
        let curve = reference_curve();
        assert_eq!(curve.area_at(500.0).unwrap(), 400.0);
        assert_eq!(curve.area_at(650.0).unwrap(), 500.0);
        assert_eq!(curve.area_at(1000.0).unwrap(), 900.0);
    }

    #[test]
    fn test_area_at_bounds() {
        let curve = reference_curve();
        assert_eq!(curve.area_at(0.0).unwrap(), 0.0);
        assert_eq!(curve.area_at(curve.capacity()).unwrap(), 900.0);
    }

    #[test]
    fn test_area_at_interior_breakpoint_is_exact() {
        let curve = reference_curve();
        assert_eq!(curve.area_at(800.0).unwrap(), 600.0);
    }

    #[test]
    fn test_area_at_is_non_decreasing() {
        let curve = reference_curve();
        let mut previous = curve.area_at(0.0).unwrap();
        for step in 1..=1000 {
            let area = curve.area_at(step as f64).unwrap();
            assert!(area >= previous, "area decreased at storage {step}");
            previous = area;
        }
    }

    #[test]
    fn test_area_at_above_capacity() {
        let curve = reference_curve();
        assert_eq!(
            curve.area_at(1e6),
            Err(SimulationError::OutOfRange {
                storage: 1e6,
                capacity: 1000.0
            })
        );
    }

    #[test]
    fn test_area_at_negative_storage() {
        let curve = reference_curve();
        assert_eq!(
            curve.area_at(-10.0),
            Err(SimulationError::OutOfRange {
                storage: -10.0,
                capacity: 1000.0
            })
        );
    }

    #[test]
    fn test_area_at_nan_storage() {
        let curve = reference_curve();
        assert!(matches!(
            curve.area_at(f64::NAN),
            Err(SimulationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_breakpoints() {
        let curve = StorageAreaCurve::from_breakpoints(&[
            (0.0, 0.0),
            (1000.0, 400.0),
            (3000.0, 600.0),
            (4000.0, 900.0),
        ])
        .unwrap();
        assert_eq!(curve.capacity(), 4000.0);
        assert_eq!(curve.area_at(2000.0).unwrap(), 500.0);
    }

    #[test]
    fn test_new_rejects_invalid_curves() {
        let invalid = vec![
            (vec![0.0], vec![0.0]),
            (vec![0.0, 10.0], vec![0.0]),
            (vec![5.0, 10.0], vec![0.0, 1.0]),
            (vec![0.0, 10.0, 10.0], vec![0.0, 1.0, 2.0]),
            (vec![0.0, 10.0, 5.0], vec![0.0, 1.0, 2.0]),
            (vec![0.0, f64::INFINITY], vec![0.0, 1.0]),
        ];
        for (storages, areas) in invalid {
            assert!(matches!(
                StorageAreaCurve::new(storages, areas),
                Err(SimulationError::InvalidCurve(_))
            ));
        }
    }
}
