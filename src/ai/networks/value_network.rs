use burn::prelude::*;
use burn::tensor::activation::relu;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::TensorData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bias-free feed-forward value regressor over the encoded board state.
///
/// ```text
/// Input:  [1, cells]  (0/1 peg occupancy)
/// Hidden: configured widths, ReLU
/// Output: [1, 1]      (state value, linear)
/// ```
///
/// Weights are raw tensors rather than `Module` layers: the TD(lambda)
/// update keeps one eligibility accumulator per weight matrix and adjusts
/// parameters by hand, so the network only needs to expose its forward
/// pass and per-weight gradients.
#[derive(Debug)]
pub struct ValueNetwork<B: AutodiffBackend> {
    weights: Vec<Tensor<B, 2>>,
    device: B::Device,
}

impl<B: AutodiffBackend> ValueNetwork<B> {
    /// Build from the layer-width sequence (input through output, at least
    /// two entries). Weights are fan-in-scaled uniform draws from a seeded
    /// rng, so initialization is reproducible independent of the backend's
    /// own rng.
    pub fn new(layer_sizes: &[usize], seed: u64, device: &B::Device) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut weights = Vec::new();
        for pair in layer_sizes.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let bound = 1.0 / (fan_in as f32).sqrt();
            let data: Vec<f32> = (0..fan_in * fan_out)
                .map(|_| rng.random_range(-bound..bound))
                .collect();
            let weight = Tensor::<B, 1>::from_data(TensorData::from(data.as_slice()), device)
                .reshape([fan_in, fan_out])
                .require_grad();
            weights.push(weight);
        }
        ValueNetwork {
            weights,
            device: device.clone(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Forward pass on the autodiff graph: [1, cells] -> [1, 1].
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let last = self.weights.len() - 1;
        let mut x = input;
        for (i, weight) in self.weights.iter().enumerate() {
            x = x.matmul(weight.clone());
            if i < last {
                x = relu(x);
            }
        }
        x
    }

    /// Scalar value of one encoded state, computed off the autodiff graph.
    pub fn value_of(&self, input: &[f32]) -> f32 {
        let last = self.weights.len() - 1;
        let mut x = Tensor::<B::InnerBackend, 1>::from_data(TensorData::from(input), &self.device)
            .reshape([1, input.len()]);
        for (i, weight) in self.weights.iter().enumerate() {
            x = x.matmul(weight.clone().inner());
            if i < last {
                x = relu(x);
            }
        }
        scalar(x)
    }

    /// Gradient of the value with respect to each weight matrix for one
    /// encoded state.
    pub fn value_gradients(&self, input: &[f32]) -> Vec<Tensor<B::InnerBackend, 2>> {
        let x = Tensor::<B, 1>::from_data(TensorData::from(input), &self.device)
            .reshape([1, input.len()]);
        let grads = self.forward(x).sum().backward();
        self.weights
            .iter()
            .map(|w| {
                w.grad(&grads)
                    .unwrap_or_else(|| Tensor::zeros(w.dims(), &self.device))
            })
            .collect()
    }

    /// Shift every weight matrix by `step * trace`, detached from the
    /// autodiff graph.
    pub fn apply_delta(&mut self, traces: &[Tensor<B::InnerBackend, 2>], step: f32) {
        for (weight, trace) in self.weights.iter_mut().zip(traces) {
            let updated = weight.clone().inner() + trace.clone().mul_scalar(step);
            *weight = Tensor::from_inner(updated).require_grad();
        }
    }

    /// Fresh zero accumulators, one per weight matrix.
    pub fn zero_traces(&self) -> Vec<Tensor<B::InnerBackend, 2>> {
        self.weights
            .iter()
            .map(|w| Tensor::zeros(w.dims(), &self.device))
            .collect()
    }

    /// Mean |w| across every parameter.
    pub fn mean_weight_magnitude(&self) -> f32 {
        let inner: Vec<Tensor<B::InnerBackend, 2>> =
            self.weights.iter().map(|w| w.clone().inner()).collect();
        mean_abs_tensors(&inner)
    }
}

/// Mean absolute element across a set of tensors; zero for an empty set.
pub(crate) fn mean_abs_tensors<B: Backend>(tensors: &[Tensor<B, 2>]) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0usize;
    for t in tensors {
        sum += scalar(t.clone().abs().sum());
        let [rows, cols] = t.dims();
        count += rows * cols;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

fn scalar<B: Backend, const D: usize>(t: Tensor<B, D>) -> f32 {
    t.into_data().to_vec::<f32>().expect("f32 tensor data extraction")[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray<f32>>;

    fn network(seed: u64) -> ValueNetwork<TestBackend> {
        let device = Default::default();
        ValueNetwork::new(&[4, 3, 1], seed, &device)
    }

    #[test]
    fn test_forward_output_shape() {
        let net = network(0);
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::zeros([1, 4], &device);
        assert_eq!(net.forward(input).shape().dims, [1, 1]);
        assert_eq!(net.layer_count(), 2);
    }

    #[test]
    fn test_value_is_finite() {
        let net = network(1);
        let v = net.value_of(&[1.0, 0.0, 1.0, 1.0]);
        assert!(v.is_finite());
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = network(42);
        let b = network(42);
        let input = [1.0, 1.0, 0.0, 1.0];
        assert_eq!(a.value_of(&input), b.value_of(&input));
    }

    #[test]
    fn test_gradient_shapes_match_weights() {
        let net = network(2);
        let grads = net.value_gradients(&[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(grads.len(), 2);
        assert_eq!(grads[0].dims(), [4, 3]);
        assert_eq!(grads[1].dims(), [3, 1]);
    }

    #[test]
    fn test_zero_step_delta_keeps_values() {
        let mut net = network(3);
        let input = [0.0, 1.0, 1.0, 0.0];
        let before = net.value_of(&input);
        let traces = net.value_gradients(&input);
        net.apply_delta(&traces, 0.0);
        assert_eq!(net.value_of(&input), before);
    }

    #[test]
    fn test_zero_traces_are_zero() {
        let net = network(4);
        let traces = net.zero_traces();
        assert_eq!(mean_abs_tensors(&traces), 0.0);
    }
}
