//! On-the-fly model training
//!
//! Training is deliberately minimal: slide a window across the ticker's own
//! normalized history, then run a fixed two passes of mini-batch gradient
//! descent under Adam with mean-squared-error loss. No validation split, no
//! early stopping, no hyperparameter search. The fitted weights live only as
//! long as the request that asked for them.

use crate::error::{ForecastError, Result};
use crate::models::lstm::LstmRegressor;
use crate::scaling::MinMaxScaler;
use crate::window::WINDOW_SIZE;
use ndarray::{Array1, Array2, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Hyperparameters for one training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Passes over the training set
    pub epochs: usize,
    /// Mini-batch size
    pub batch_size: usize,
    /// Adam step size
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 2,
            batch_size: 32,
            learning_rate: 1e-3,
        }
    }
}

/// Sliding-window training pairs derived from a normalized series
///
/// One `(window, next_value)` pair per valid offset; a series of length `n`
/// yields `n - WINDOW_SIZE` pairs, so anything at or below the window size
/// produces an empty set.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    windows: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl TrainingSet {
    /// Slide a [`WINDOW_SIZE`] window across `normalized`.
    pub fn from_series(normalized: &[f64]) -> Self {
        let mut windows = Vec::new();
        let mut targets = Vec::new();

        for i in WINDOW_SIZE..normalized.len() {
            windows.push(normalized[i - WINDOW_SIZE..i].to_vec());
            targets.push(normalized[i]);
        }

        Self { windows, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn windows(&self) -> &[Vec<f64>] {
        &self.windows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }
}

/// Train a fresh [`LstmRegressor`] against the ticker's own history.
///
/// Normalizes `closes` through `scaler`, builds the sliding-window training
/// set internally and fits a newly initialized model. Fails with
/// [`ForecastError::EmptyTrainingSet`] when no window/target pair fits.
pub fn train_model(
    closes: &[f64],
    scaler: &MinMaxScaler,
    config: &TrainingConfig,
) -> Result<LstmRegressor> {
    let mut rng = rand::thread_rng();
    let mut model = LstmRegressor::from_rng(&mut rng);
    fit(&mut model, closes, scaler, config, &mut rng)?;
    Ok(model)
}

/// Deterministic variant of [`train_model`]: weight initialization and batch
/// shuffling both draw from a seeded generator.
pub fn train_model_seeded(
    closes: &[f64],
    scaler: &MinMaxScaler,
    config: &TrainingConfig,
    seed: u64,
) -> Result<LstmRegressor> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = LstmRegressor::from_rng(&mut rng);
    fit(&mut model, closes, scaler, config, &mut rng)?;
    Ok(model)
}

fn fit<R: Rng>(
    model: &mut LstmRegressor,
    closes: &[f64],
    scaler: &MinMaxScaler,
    config: &TrainingConfig,
    rng: &mut R,
) -> Result<()> {
    if config.epochs == 0 || config.batch_size == 0 {
        return Err(ForecastError::InvalidParameter(
            "epochs and batch size must be positive".to_string(),
        ));
    }

    let normalized = scaler.transform_all(closes);
    let set = TrainingSet::from_series(&normalized);
    if set.is_empty() {
        return Err(ForecastError::EmptyTrainingSet);
    }

    let mut optimizer = Adam::new(model, config.learning_rate);
    let mut indices: Vec<usize> = (0..set.len()).collect();

    for epoch in 0..config.epochs {
        indices.shuffle(rng);
        let mut squared_error = 0.0;

        for batch in indices.chunks(config.batch_size) {
            let mut grads = model.zeros_like();

            for &idx in batch {
                let (caches, output) = model.forward_pass(&set.windows[idx]);
                let err = output - set.targets[idx];
                squared_error += err * err;

                // d(MSE)/d(output), averaged over the mini-batch
                let dy = 2.0 * err / batch.len() as f64;
                model.backward(&caches, dy, &mut grads);
            }

            optimizer.step(model, &grads);
        }

        log::debug!(
            "epoch {}/{}: mse {:.6} over {} pairs",
            epoch + 1,
            config.epochs,
            squared_error / set.len() as f64,
            set.len()
        );
    }

    Ok(())
}

/// Adam optimizer state
///
/// The first and second moment estimates reuse the model's own parameter
/// layout, held in two zeroed [`LstmRegressor`] containers.
struct Adam {
    m: LstmRegressor,
    v: LstmRegressor,
    t: i32,
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
}

impl Adam {
    fn new(model: &LstmRegressor, learning_rate: f64) -> Self {
        Self {
            m: model.zeros_like(),
            v: model.zeros_like(),
            t: 0,
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }

    fn step(&mut self, model: &mut LstmRegressor, grads: &LstmRegressor) {
        self.t += 1;
        // Bias-corrected step size folds both corrections into the rate
        let lr_t = self.learning_rate * (1.0 - self.beta2.powi(self.t)).sqrt()
            / (1.0 - self.beta1.powi(self.t));
        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);

        for i in 0..model.layers.len() {
            let layer = &mut model.layers[i];
            let g = &grads.layers[i];
            let m = &mut self.m.layers[i];
            let v = &mut self.v.layers[i];

            update_gate(&mut layer.input_gate, &g.input_gate, &mut m.input_gate, &mut v.input_gate, lr_t, b1, b2, eps);
            update_gate(&mut layer.forget_gate, &g.forget_gate, &mut m.forget_gate, &mut v.forget_gate, lr_t, b1, b2, eps);
            update_gate(&mut layer.output_gate, &g.output_gate, &mut m.output_gate, &mut v.output_gate, lr_t, b1, b2, eps);
            update_gate(&mut layer.candidate, &g.candidate, &mut m.candidate, &mut v.candidate, lr_t, b1, b2, eps);
        }

        update_arr1(&mut model.w_out, &grads.w_out, &mut self.m.w_out, &mut self.v.w_out, lr_t, b1, b2, eps);

        self.m.b_out = b1 * self.m.b_out + (1.0 - b1) * grads.b_out;
        self.v.b_out = b2 * self.v.b_out + (1.0 - b2) * grads.b_out * grads.b_out;
        model.b_out -= lr_t * self.m.b_out / (self.v.b_out.sqrt() + eps);
    }
}

#[allow(clippy::too_many_arguments)]
fn update_gate(
    p: &mut crate::models::lstm::Gate,
    g: &crate::models::lstm::Gate,
    m: &mut crate::models::lstm::Gate,
    v: &mut crate::models::lstm::Gate,
    lr_t: f64,
    b1: f64,
    b2: f64,
    eps: f64,
) {
    update_arr2(&mut p.w, &g.w, &mut m.w, &mut v.w, lr_t, b1, b2, eps);
    update_arr2(&mut p.u, &g.u, &mut m.u, &mut v.u, lr_t, b1, b2, eps);
    update_arr1(&mut p.b, &g.b, &mut m.b, &mut v.b, lr_t, b1, b2, eps);
}

#[allow(clippy::too_many_arguments)]
fn update_arr2(
    p: &mut Array2<f64>,
    g: &Array2<f64>,
    m: &mut Array2<f64>,
    v: &mut Array2<f64>,
    lr_t: f64,
    b1: f64,
    b2: f64,
    eps: f64,
) {
    Zip::from(&mut *p)
        .and(g)
        .and(&mut *m)
        .and(&mut *v)
        .for_each(|p, &g, m, v| {
            *m = b1 * *m + (1.0 - b1) * g;
            *v = b2 * *v + (1.0 - b2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + eps);
        });
}

#[allow(clippy::too_many_arguments)]
fn update_arr1(
    p: &mut Array1<f64>,
    g: &Array1<f64>,
    m: &mut Array1<f64>,
    v: &mut Array1<f64>,
    lr_t: f64,
    b1: f64,
    b2: f64,
    eps: f64,
) {
    Zip::from(&mut *p)
        .and(g)
        .and(&mut *m)
        .and(&mut *v)
        .for_each(|p, &g, m, v| {
            *m = b1 * *m + (1.0 - b1) * g;
            *v = b2 * *v + (1.0 - b2) * g * g;
            *p -= lr_t * *m / (v.sqrt() + eps);
        });
}
