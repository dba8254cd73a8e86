use serde::{Deserialize, Serialize};

/// Zero-mean, unit-variance standardisation of the single feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub scale: f64,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self { mean: 0.0, scale: 1.0 }
    }
}

impl StandardScaler {
    /// Fit on the given values using the population standard deviation.
    /// A constant column keeps scale 1.0 so transform never divides by zero.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Self {
            mean,
            scale: if std > f64::EPSILON { std } else { 1.0 },
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_centres_and_scales() {
        let scaler = StandardScaler::fit(&[1.0, 2.0, 3.0, 4.0]);
        assert!((scaler.mean - 2.5).abs() < 1e-12);

        let scaled = scaler.transform_all(&[1.0, 2.0, 3.0, 4.0]);
        let mean: f64 = scaled.iter().sum::<f64>() / 4.0;
        let var: f64 = scaled.iter().map(|v| v * v).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column() {
        let scaler = StandardScaler::fit(&[0.7, 0.7, 0.7]);
        assert_eq!(scaler.scale, 1.0);
        assert_eq!(scaler.transform(0.7), 0.0);
    }
}
