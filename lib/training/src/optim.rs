//! Optimizer step abstraction
//!
//! Training loops depend only on two seams: something that turns parameters
//! into `(loss, gradient)` and something that applies a gradient. Any autodiff
//! runtime can sit behind [`GradientBackend`]; [`FiniteDifference`] wraps a
//! plain loss closure for small models and tests.

use serde::{Deserialize, Serialize};
use tracing::debug;
use veriface_core::{Error, Result};

/// Flat trainable parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: Vec<f32>,
}

impl ParameterSet {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }
}

/// Computes the loss and its gradient at the current parameters
pub trait GradientBackend {
    fn loss_and_grad(&mut self, params: &ParameterSet) -> Result<(f32, Vec<f32>)>;
}

/// Applies a gradient to parameters in place
pub trait Optimizer {
    fn step(&mut self, params: &mut ParameterSet, grads: &[f32]) -> Result<()>;
}

/// One training step: evaluate, then update. Returns the pre-update loss.
pub fn train_step<B, O>(backend: &mut B, optimizer: &mut O, params: &mut ParameterSet) -> Result<f32>
where
    B: GradientBackend + ?Sized,
    O: Optimizer + ?Sized,
{
    let (loss, grads) = backend.loss_and_grad(params)?;
    if !loss.is_finite() {
        return Err(Error::InvalidConfig(format!("loss diverged to {loss}")));
    }
    optimizer.step(params, &grads)?;
    debug!(loss, params = params.len(), "train step");
    Ok(loss)
}

/// Stochastic gradient descent with classical momentum
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: f32,
    momentum: f32,
    velocity: Vec<f32>,
}

impl Sgd {
    pub fn new(learning_rate: f32, momentum: f32) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive, got {learning_rate}"
            )));
        }
        if !(0.0..1.0).contains(&momentum) {
            return Err(Error::InvalidConfig(format!(
                "momentum must lie in [0, 1), got {momentum}"
            )));
        }
        Ok(Self {
            learning_rate,
            momentum,
            velocity: Vec::new(),
        })
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut ParameterSet, grads: &[f32]) -> Result<()> {
        if grads.len() != params.len() {
            return Err(Error::ShapeMismatch {
                what: "gradient",
                expected: params.len(),
                actual: grads.len(),
            });
        }
        if self.velocity.len() != params.len() {
            self.velocity = vec![0.0; params.len()];
        }
        for ((p, v), g) in params
            .as_mut_slice()
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(grads)
        {
            *v = self.momentum * *v - self.learning_rate * g;
            *p += *v;
        }
        Ok(())
    }
}

/// Central-difference gradient of an arbitrary loss closure
pub struct FiniteDifference<F> {
    loss_fn: F,
    step: f32,
}

impl<F> FiniteDifference<F>
where
    F: FnMut(&[f32]) -> Result<f32>,
{
    pub fn new(loss_fn: F, step: f32) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "finite-difference step must be positive, got {step}"
            )));
        }
        Ok(Self { loss_fn, step })
    }
}

impl<F> GradientBackend for FiniteDifference<F>
where
    F: FnMut(&[f32]) -> Result<f32>,
{
    fn loss_and_grad(&mut self, params: &ParameterSet) -> Result<(f32, Vec<f32>)> {
        let loss = (self.loss_fn)(params.as_slice())?;
        let mut probe = params.as_slice().to_vec();
        let mut grads = Vec::with_capacity(probe.len());
        for i in 0..probe.len() {
            let saved = probe[i];
            probe[i] = saved + self.step;
            let up = (self.loss_fn)(&probe)?;
            probe[i] = saved - self.step;
            let down = (self.loss_fn)(&probe)?;
            probe[i] = saved;
            grads.push((up - down) / (2.0 * self.step));
        }
        Ok((loss, grads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::triplet_loss;
    use veriface_core::Vector;

    #[test]
    fn test_sgd_step() {
        let mut params = ParameterSet::new(vec![1.0, -2.0]);
        let mut sgd = Sgd::new(0.1, 0.0).unwrap();
        sgd.step(&mut params, &[1.0, -1.0]).unwrap();
        assert!((params.as_slice()[0] - 0.9).abs() < 1e-6);
        assert!((params.as_slice()[1] + 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_gradient_shape() {
        let mut params = ParameterSet::new(vec![1.0, 2.0]);
        let mut sgd = Sgd::new(0.1, 0.9).unwrap();
        assert!(matches!(
            sgd.step(&mut params, &[1.0]),
            Err(Error::ShapeMismatch { what: "gradient", .. })
        ));
        assert!(Sgd::new(0.0, 0.0).is_err());
        assert!(Sgd::new(0.1, 1.0).is_err());
    }

    #[test]
    fn test_finite_difference_quadratic() {
        // f(x, y) = x² + 3y, grad = (2x, 3)
        let mut backend =
            FiniteDifference::new(|p: &[f32]| Ok(p[0] * p[0] + 3.0 * p[1]), 1e-3).unwrap();
        let (loss, grads) = backend
            .loss_and_grad(&ParameterSet::new(vec![2.0, 1.0]))
            .unwrap();
        assert!((loss - 7.0).abs() < 1e-5);
        assert!((grads[0] - 4.0).abs() < 1e-2);
        assert!((grads[1] - 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_training_separates_triplet() {
        // anchor, positive, negative packed as three 2-d points
        let unpack = |p: &[f32]| {
            (
                [Vector::from_slice(&p[0..2])],
                [Vector::from_slice(&p[2..4])],
                [Vector::from_slice(&p[4..6])],
            )
        };
        let loss_fn = move |p: &[f32]| {
            let (a, pos, neg) = unpack(p);
            triplet_loss(&a, &pos, &neg, 0.3)
        };

        let mut params = ParameterSet::new(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.1]);
        let mut backend = FiniteDifference::new(loss_fn, 1e-3).unwrap();
        let mut sgd = Sgd::new(0.05, 0.5).unwrap();

        let initial = train_step(&mut backend, &mut sgd, &mut params).unwrap();
        let mut last = initial;
        for _ in 0..100 {
            last = train_step(&mut backend, &mut sgd, &mut params).unwrap();
        }
        assert!(initial > 2.0);
        assert!(last < initial);
    }

    #[test]
    fn test_diverged_loss_is_an_error() {
        let mut backend = FiniteDifference::new(|_: &[f32]| Ok(f32::NAN), 1e-3).unwrap();
        let mut sgd = Sgd::new(0.1, 0.0).unwrap();
        let mut params = ParameterSet::new(vec![0.0]);
        assert!(train_step(&mut backend, &mut sgd, &mut params).is_err());
    }
}
