use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

pub const DEFAULT_LEAK: f64 = 0.01;

/// Activation applied after each layer's linear transform.
///
/// `apply` and `derivative` both take the pre-activation matrix `z`; the
/// derivative is evaluated at `z`, not at the activated output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    #[default]
    Arctan,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { leak: f64 },
    /// Row-wise softmax. Its derivative is the elementwise approximation
    /// `(e_i * S - e_i^2) / S^2`, not the full Jacobian.
    Softmax,
}

impl ActivationFunction {
    pub fn leaky_relu() -> Self {
        ActivationFunction::LeakyReLU { leak: DEFAULT_LEAK }
    }

    /// Element-wise activation. `Softmax` has no scalar form and is handled
    /// row by row in [`ActivationFunction::apply`].
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Arctan => x.atan(),
            ActivationFunction::LeakyReLU { leak } => x.max(leak * x),
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::function() has no element-wise form; \
                        use ActivationFunction::apply() on a whole row.")
            }
        }
    }

    /// Element-wise derivative at pre-activation `x`.
    pub fn derivative_at(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => 1.0 / x.cosh().powi(2),
            ActivationFunction::Arctan => 1.0 / (x * x + 1.0),
            ActivationFunction::LeakyReLU { leak } => if x > 0.0 { 1.0 } else { *leak },
            ActivationFunction::Softmax => {
                panic!("ActivationFunction::Softmax::derivative_at() has no element-wise form; \
                        use ActivationFunction::derivative() on a whole row.")
            }
        }
    }

    /// Activates a `(batch, width)` pre-activation matrix.
    pub fn apply(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => z.map_rows(softmax),
            _ => z.map(|x| self.function(x)),
        }
    }

    /// Derivative of the activation evaluated at `z`, same shape as `z`.
    pub fn derivative(&self, z: &Matrix) -> Matrix {
        match self {
            ActivationFunction::Softmax => z.map_rows(softmax_prime),
            _ => z.map(|x| self.derivative_at(x)),
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, ActivationFunction::Softmax)
    }
}

/// Shifted exponentials `e^(z_i - max z)` and their sum.
fn shifted_exp(row: &[f64]) -> (Vec<f64>, f64) {
    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = row.iter().map(|z| (z - max).exp()).collect();
    let sum = exp.iter().sum();
    (exp, sum)
}

fn softmax(row: &[f64]) -> Vec<f64> {
    let (exp, sum) = shifted_exp(row);
    exp.into_iter().map(|e| e / sum).collect()
}

fn softmax_prime(row: &[f64]) -> Vec<f64> {
    let (exp, sum) = shifted_exp(row);
    let sum_sq = sum * sum;
    exp.into_iter().map(|e| (e * sum - e * e) / sum_sq).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn sigmoid_at_zero() {
        let f = ActivationFunction::Sigmoid;
        assert!(close(f.function(0.0), 0.5));
        assert!(close(f.derivative_at(0.0), 0.25));
    }

    #[test]
    fn tanh_derivative_is_sech_squared() {
        let f = ActivationFunction::Tanh;
        for &z in &[-2.0, -0.3, 0.0, 0.7, 3.0] {
            let t: f64 = f64::tanh(z);
            assert!((f.derivative_at(z) - (1.0 - t * t)).abs() < 1e-9);
        }
    }

    #[test]
    fn arctan_derivative_is_bounded_and_decays() {
        let f = ActivationFunction::Arctan;
        for &z in &[-1e6, -10.0, -1.0, 0.0, 0.5, 2.0, 1e6] {
            let d = f.derivative_at(z);
            assert_eq!(d, 1.0 / (z * z + 1.0));
            assert!(d > 0.0 && d <= 1.0);
        }
        assert_eq!(f.derivative_at(0.0), 1.0);
        assert!(f.derivative_at(1e6) < 1e-11);
    }

    #[test]
    fn leaky_relu_uses_leak_for_non_positive_inputs() {
        let f = ActivationFunction::leaky_relu();
        assert_eq!(f.function(3.0), 3.0);
        assert!(close(f.function(-2.0), -0.02));
        assert_eq!(f.derivative_at(3.0), 1.0);
        assert_eq!(f.derivative_at(0.0), DEFAULT_LEAK);
        assert_eq!(f.derivative_at(-5.0), DEFAULT_LEAK);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let z = Matrix::from_data(vec![
            vec![1.0, 2.0, 3.0],
            vec![-1000.0, 0.0, 1000.0],
            vec![0.0, 0.0, 0.0],
        ]);
        let a = ActivationFunction::Softmax.apply(&z);
        for row in &a.data {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|p| p.is_finite()));
        }
        assert!(close(a.data[2][0], 1.0 / 3.0));
    }

    #[test]
    fn softmax_derivative_matches_p_times_one_minus_p() {
        let z = Matrix::from_data(vec![vec![0.2, -0.4, 1.1]]);
        let p = ActivationFunction::Softmax.apply(&z);
        let d = ActivationFunction::Softmax.derivative(&z);
        for (pi, di) in p.data[0].iter().zip(d.data[0].iter()) {
            assert!((di - pi * (1.0 - pi)).abs() < 1e-12);
        }
    }

    #[test]
    fn deserializes_from_snake_case() {
        let f: ActivationFunction = serde_json::from_str("\"arctan\"").unwrap();
        assert_eq!(f, ActivationFunction::Arctan);
        let f: ActivationFunction = serde_json::from_str(r#"{"leaky_relu":{"leak":0.2}}"#).unwrap();
        assert_eq!(f, ActivationFunction::LeakyReLU { leak: 0.2 });
    }
}
