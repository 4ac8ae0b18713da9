//! Stacked LSTM regression network
//!
//! Two LSTM layers of width [`HIDDEN_SIZE`] over scalar input steps, followed
//! by a single linear output unit. Implemented directly on `ndarray`: each
//! gate holds an input weight matrix `w`, a recurrent weight matrix `u` and a
//! bias vector `b`. The forward pass caches gate activations and states per
//! timestep so training can backpropagate through the full sequence.

use crate::error::{ForecastError, Result};
use crate::models::SequenceModel;
use crate::window::WINDOW_SIZE;
use ndarray::{arr1, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Width of each recurrent layer
pub const HIDDEN_SIZE: usize = 50;

/// Number of stacked recurrent layers
pub const NUM_LAYERS: usize = 2;

/// Parameters of one LSTM gate
#[derive(Debug, Clone)]
pub(crate) struct Gate {
    /// Input weights, `hidden_size x input_size`
    pub(crate) w: Array2<f64>,
    /// Recurrent weights, `hidden_size x hidden_size`
    pub(crate) u: Array2<f64>,
    /// Bias, `hidden_size`
    pub(crate) b: Array1<f64>,
}

impl Gate {
    fn glorot<R: Rng>(rng: &mut R, input_size: usize, hidden_size: usize, bias: f64) -> Self {
        let w_limit = (6.0 / (input_size + hidden_size) as f64).sqrt();
        let u_limit = (6.0 / (2 * hidden_size) as f64).sqrt();
        let w_dist = Uniform::new(-w_limit, w_limit);
        let u_dist = Uniform::new(-u_limit, u_limit);

        Self {
            w: Array2::from_shape_fn((hidden_size, input_size), |_| w_dist.sample(rng)),
            u: Array2::from_shape_fn((hidden_size, hidden_size), |_| u_dist.sample(rng)),
            b: Array1::from_elem(hidden_size, bias),
        }
    }

    fn zeros(input_size: usize, hidden_size: usize) -> Self {
        Self {
            w: Array2::zeros((hidden_size, input_size)),
            u: Array2::zeros((hidden_size, hidden_size)),
            b: Array1::zeros(hidden_size),
        }
    }
}

/// One LSTM layer: input, forget and output gates plus the cell candidate
#[derive(Debug, Clone)]
pub(crate) struct LstmLayer {
    pub(crate) input_gate: Gate,
    pub(crate) forget_gate: Gate,
    pub(crate) output_gate: Gate,
    pub(crate) candidate: Gate,
}

/// Per-timestep activations recorded during a forward pass
#[derive(Debug)]
pub(crate) struct LayerCache {
    pub(crate) inputs: Vec<Array1<f64>>,
    pub(crate) input_gates: Vec<Array1<f64>>,
    pub(crate) forget_gates: Vec<Array1<f64>>,
    pub(crate) output_gates: Vec<Array1<f64>>,
    pub(crate) candidates: Vec<Array1<f64>>,
    pub(crate) cell_states: Vec<Array1<f64>>,
    pub(crate) hidden_states: Vec<Array1<f64>>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let a2 = a.view().insert_axis(Axis(1));
    let b2 = b.view().insert_axis(Axis(0));
    a2.dot(&b2)
}

impl LstmLayer {
    fn new<R: Rng>(rng: &mut R, input_size: usize, hidden_size: usize) -> Self {
        Self {
            input_gate: Gate::glorot(rng, input_size, hidden_size, 0.0),
            // Forget bias starts at 1.0 so early training does not erase state
            forget_gate: Gate::glorot(rng, input_size, hidden_size, 1.0),
            output_gate: Gate::glorot(rng, input_size, hidden_size, 0.0),
            candidate: Gate::glorot(rng, input_size, hidden_size, 0.0),
        }
    }

    fn zeros_like(&self) -> Self {
        let hidden_size = self.hidden_size();
        let input_size = self.input_gate.w.ncols();
        Self {
            input_gate: Gate::zeros(input_size, hidden_size),
            forget_gate: Gate::zeros(input_size, hidden_size),
            output_gate: Gate::zeros(input_size, hidden_size),
            candidate: Gate::zeros(input_size, hidden_size),
        }
    }

    fn hidden_size(&self) -> usize {
        self.input_gate.b.len()
    }

    /// Run the layer over a full input sequence, recording activations.
    pub(crate) fn forward(&self, inputs: &[Array1<f64>]) -> LayerCache {
        let hidden_size = self.hidden_size();
        let steps = inputs.len();

        let mut cache = LayerCache {
            inputs: Vec::with_capacity(steps),
            input_gates: Vec::with_capacity(steps),
            forget_gates: Vec::with_capacity(steps),
            output_gates: Vec::with_capacity(steps),
            candidates: Vec::with_capacity(steps),
            cell_states: Vec::with_capacity(steps),
            hidden_states: Vec::with_capacity(steps),
        };

        let mut h = Array1::<f64>::zeros(hidden_size);
        let mut c = Array1::<f64>::zeros(hidden_size);

        for x in inputs {
            let i_t = (self.input_gate.w.dot(x) + self.input_gate.u.dot(&h) + &self.input_gate.b)
                .mapv(sigmoid);
            let f_t = (self.forget_gate.w.dot(x) + self.forget_gate.u.dot(&h) + &self.forget_gate.b)
                .mapv(sigmoid);
            let o_t = (self.output_gate.w.dot(x) + self.output_gate.u.dot(&h) + &self.output_gate.b)
                .mapv(sigmoid);
            let g_t = (self.candidate.w.dot(x) + self.candidate.u.dot(&h) + &self.candidate.b)
                .mapv(f64::tanh);

            let c_t = &f_t * &c + &i_t * &g_t;
            let h_t = &o_t * &c_t.mapv(f64::tanh);

            cache.inputs.push(x.clone());
            cache.input_gates.push(i_t);
            cache.forget_gates.push(f_t);
            cache.output_gates.push(o_t);
            cache.candidates.push(g_t);
            cache.cell_states.push(c_t.clone());
            cache.hidden_states.push(h_t.clone());

            c = c_t;
            h = h_t;
        }

        cache
    }

    /// Backpropagate through time over a cached forward pass.
    ///
    /// `dh_seq` carries the loss gradient injected into each timestep's
    /// hidden state (from the layer above, or from the output unit at the
    /// final step). Parameter gradients accumulate into `grads`; the return
    /// value is the gradient with respect to this layer's inputs, which
    /// becomes `dh_seq` for the layer below.
    pub(crate) fn backward(
        &self,
        cache: &LayerCache,
        dh_seq: &[Array1<f64>],
        grads: &mut LstmLayer,
    ) -> Vec<Array1<f64>> {
        let hidden_size = self.hidden_size();
        let input_size = self.input_gate.w.ncols();
        let steps = cache.inputs.len();

        let zero_state = Array1::<f64>::zeros(hidden_size);
        let mut dx_seq = vec![Array1::<f64>::zeros(input_size); steps];
        let mut dh_next = Array1::<f64>::zeros(hidden_size);
        let mut dc_next = Array1::<f64>::zeros(hidden_size);

        for t in (0..steps).rev() {
            let i_t = &cache.input_gates[t];
            let f_t = &cache.forget_gates[t];
            let o_t = &cache.output_gates[t];
            let g_t = &cache.candidates[t];
            let tanh_c = cache.cell_states[t].mapv(f64::tanh);

            let c_prev = if t > 0 { &cache.cell_states[t - 1] } else { &zero_state };
            let h_prev = if t > 0 { &cache.hidden_states[t - 1] } else { &zero_state };

            let dh = &dh_seq[t] + &dh_next;
            let dc = &dh * o_t * &tanh_c.mapv(|v| 1.0 - v * v) + &dc_next;

            let d_out = &dh * &tanh_c;
            let da_o = &d_out * o_t * &o_t.mapv(|v| 1.0 - v);
            let d_in = &dc * g_t;
            let da_i = &d_in * i_t * &i_t.mapv(|v| 1.0 - v);
            let d_cand = &dc * i_t;
            let da_g = &d_cand * &g_t.mapv(|v| 1.0 - v * v);
            let d_forget = &dc * c_prev;
            let da_f = &d_forget * f_t * &f_t.mapv(|v| 1.0 - v);

            let x_t = &cache.inputs[t];
            accumulate_gate(&mut grads.input_gate, &da_i, x_t, h_prev);
            accumulate_gate(&mut grads.forget_gate, &da_f, x_t, h_prev);
            accumulate_gate(&mut grads.output_gate, &da_o, x_t, h_prev);
            accumulate_gate(&mut grads.candidate, &da_g, x_t, h_prev);

            let mut dx = self.input_gate.w.t().dot(&da_i);
            dx += &self.forget_gate.w.t().dot(&da_f);
            dx += &self.output_gate.w.t().dot(&da_o);
            dx += &self.candidate.w.t().dot(&da_g);
            dx_seq[t] = dx;

            dh_next = self.input_gate.u.t().dot(&da_i)
                + &self.forget_gate.u.t().dot(&da_f)
                + &self.output_gate.u.t().dot(&da_o)
                + &self.candidate.u.t().dot(&da_g);
            dc_next = &dc * f_t;
        }

        dx_seq
    }
}

fn accumulate_gate(grad: &mut Gate, da: &Array1<f64>, x: &Array1<f64>, h_prev: &Array1<f64>) {
    grad.w += &outer(da, x);
    grad.u += &outer(da, h_prev);
    grad.b += da;
}

/// Stacked LSTM regressor: [`NUM_LAYERS`] recurrent layers feeding one
/// linear output unit
///
/// Constructed fresh per forecast request with random weights, trained
/// briefly on the requesting ticker's own history, used for one forecast run
/// and then dropped.
#[derive(Debug, Clone)]
pub struct LstmRegressor {
    pub(crate) layers: Vec<LstmLayer>,
    pub(crate) w_out: Array1<f64>,
    pub(crate) b_out: f64,
}

impl LstmRegressor {
    /// Fresh model with entropy-seeded random weights.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_rng(&mut rng)
    }

    /// Fresh model with deterministic weights, for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    pub(crate) fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(NUM_LAYERS);
        let mut input_size = 1;
        for _ in 0..NUM_LAYERS {
            layers.push(LstmLayer::new(rng, input_size, HIDDEN_SIZE));
            input_size = HIDDEN_SIZE;
        }

        let limit = (6.0 / (HIDDEN_SIZE + 1) as f64).sqrt();
        let dist = Uniform::new(-limit, limit);
        let w_out = Array1::from_shape_fn(HIDDEN_SIZE, |_| dist.sample(rng));

        Self {
            layers,
            w_out,
            b_out: 0.0,
        }
    }

    /// Same-shaped model with all parameters zeroed; reused as a gradient
    /// and moment container by the optimizer.
    pub(crate) fn zeros_like(&self) -> Self {
        Self {
            layers: self.layers.iter().map(LstmLayer::zeros_like).collect(),
            w_out: Array1::zeros(self.w_out.len()),
            b_out: 0.0,
        }
    }

    /// Run the network over a scalar sequence, returning the per-layer
    /// caches and the output unit's value.
    pub(crate) fn forward_pass(&self, sequence: &[f64]) -> (Vec<LayerCache>, f64) {
        let mut layer_inputs: Vec<Array1<f64>> =
            sequence.iter().map(|&v| arr1(&[v])).collect();

        let mut caches = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let cache = layer.forward(&layer_inputs);
            layer_inputs = cache.hidden_states.clone();
            caches.push(cache);
        }

        let h_last = layer_inputs.last().expect("sequence is non-empty");
        let output = self.w_out.dot(h_last) + self.b_out;

        (caches, output)
    }

    /// Backpropagate the output-unit loss gradient `dy` through the whole
    /// network, accumulating parameter gradients into `grads`.
    pub(crate) fn backward(&self, caches: &[LayerCache], dy: f64, grads: &mut LstmRegressor) {
        let steps = caches[0].inputs.len();
        let last_cache = caches.last().expect("at least one layer");
        let h_last = last_cache
            .hidden_states
            .last()
            .expect("sequence is non-empty");

        grads.w_out.scaled_add(dy, h_last);
        grads.b_out += dy;

        // Gradient enters the top layer's hidden state at the final step only
        let top_hidden = self.layers.last().expect("at least one layer").hidden_size();
        let mut dh_seq: Vec<Array1<f64>> = vec![Array1::zeros(top_hidden); steps];
        dh_seq[steps - 1] = &self.w_out * dy;

        for (layer, (cache, grad_layer)) in self
            .layers
            .iter()
            .zip(caches.iter().zip(grads.layers.iter_mut()))
            .rev()
        {
            dh_seq = layer.backward(cache, &dh_seq, grad_layer);
        }
    }
}

impl Default for LstmRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceModel for LstmRegressor {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        if window.len() != WINDOW_SIZE {
            return Err(ForecastError::InvalidParameter(format!(
                "model expects a window of {} values, got {}",
                WINDOW_SIZE,
                window.len()
            )));
        }

        let (_, output) = self.forward_pass(window);
        Ok(output)
    }

    fn name(&self) -> &str {
        "LSTM(2x50)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_models_have_identical_weights() {
        let a = LstmRegressor::with_seed(11);
        let b = LstmRegressor::with_seed(11);
        assert_eq!(a.w_out, b.w_out);
        assert_eq!(a.layers[0].input_gate.w, b.layers[0].input_gate.w);
    }

    #[test]
    fn forward_pass_is_finite_on_unit_window() {
        let model = LstmRegressor::with_seed(3);
        let window = vec![0.5; WINDOW_SIZE];
        let (_, output) = model.forward_pass(&window);
        assert!(output.is_finite());
    }

    #[test]
    fn predict_rejects_wrong_window_length() {
        let model = LstmRegressor::with_seed(3);
        let result = model.predict_next(&[0.5; 10]);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }
}
