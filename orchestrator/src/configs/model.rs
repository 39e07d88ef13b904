use comms::specs::{
    Activation, Algorithm, Kernel, LayerType, MaxFeatures, Metric, ModelKind, Optimizer, Weights,
};

use super::registry::{
    self, EPOCHS, LEARNING_RATE, MIN_SAMPLES_SPLIT, MINI_BATCH, N_ESTIMATORS, N_NEIGHBORS, SVM_C,
};

/// Number of hidden layer slots of the neural network.
pub const MAX_LAYERS: usize = 5;

/// A single hidden layer slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    /// Ends the hidden stack; later slots are not part of the network.
    pub terminal: bool,
    pub layer: LayerType,
    /// Units for dense layers, rate for dropout, unused for batch norm.
    pub param: f64,
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(terminal: bool, layer: LayerType, activation: Activation) -> Self {
        Self {
            terminal,
            layer,
            param: registry::layer_param_default(layer),
            activation,
        }
    }
}

/// The fixed-size sequence of hidden layer slots.
///
/// Termination is monotone: once a slot is terminal every later slot is
/// terminal too, and the last slot always is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStack {
    layers: [LayerSpec; MAX_LAYERS],
}

impl Default for LayerStack {
    fn default() -> Self {
        let dense = |terminal| LayerSpec::new(terminal, LayerType::Dense, Activation::Relu);
        Self {
            layers: [
                LayerSpec::new(false, LayerType::BatchNorm, Activation::Relu),
                dense(false),
                dense(true),
                dense(true),
                dense(true),
            ],
        }
    }
}

impl LayerStack {
    /// Builds a stack, forcing the terminal flags to be monotone.
    pub fn new(mut layers: [LayerSpec; MAX_LAYERS]) -> Self {
        let mut terminated = false;
        for layer in layers.iter_mut() {
            terminated |= layer.terminal;
            layer.terminal = terminated;
        }
        layers[MAX_LAYERS - 1].terminal = true;
        Self { layers }
    }

    pub fn layers(&self) -> &[LayerSpec; MAX_LAYERS] {
        &self.layers
    }

    pub fn get(&self, idx: usize) -> Option<&LayerSpec> {
        self.layers.get(idx)
    }

    /// Number of slots that form the network, the first terminal one included.
    pub fn visible_len(&self) -> usize {
        self.layers
            .iter()
            .position(|l| l.terminal)
            .map_or(MAX_LAYERS, |idx| idx + 1)
    }

    /// The slots that form the network.
    pub fn visible(&self) -> &[LayerSpec] {
        &self.layers[..self.visible_len()]
    }

    pub fn is_visible(&self, idx: usize) -> bool {
        idx < self.visible_len()
    }

    /// Whether the flags satisfy the termination invariant.
    pub fn is_monotone(&self) -> bool {
        self.layers.windows(2).all(|w| !w[0].terminal || w[1].terminal)
    }
}

/// Neural network training settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NnParams {
    pub optimizer: Optimizer,
    pub lr: f64,
    pub mini_batch: f64,
    pub epochs: f64,
}

impl Default for NnParams {
    fn default() -> Self {
        Self {
            optimizer: Optimizer::Sgd,
            lr: LEARNING_RATE.default,
            mini_batch: MINI_BATCH.default,
            epochs: EPOCHS.default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RfParams {
    pub n_estimators: f64,
    pub max_features: MaxFeatures,
    /// Zero means unlimited.
    pub max_depth: f64,
    pub min_samples_split: f64,
}

impl Default for RfParams {
    fn default() -> Self {
        Self {
            n_estimators: N_ESTIMATORS.default,
            max_features: MaxFeatures::Sqrt,
            max_depth: registry::UNLIMITED_DEPTH,
            min_samples_split: MIN_SAMPLES_SPLIT.default,
        }
    }
}

impl RfParams {
    pub fn is_depth_unlimited(&self) -> bool {
        self.max_depth == registry::UNLIMITED_DEPTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParams {
    pub kernel: Kernel,
    pub c: f64,
    /// Zero means automatic.
    pub gamma: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            kernel: Kernel::Rbf,
            c: SVM_C.default,
            gamma: registry::AUTO_GAMMA,
        }
    }
}

impl SvmParams {
    pub fn is_gamma_auto(&self) -> bool {
        self.gamma == registry::AUTO_GAMMA
    }

    /// The linear kernel ignores gamma.
    pub fn uses_gamma(&self) -> bool {
        self.kernel != Kernel::Linear
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnnParams {
    pub n_neighbors: f64,
    pub weights: Weights,
    pub algorithm: Algorithm,
    pub metric: Metric,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self {
            n_neighbors: N_NEIGHBORS.default,
            weights: Weights::Uniform,
            algorithm: Algorithm::Auto,
            metric: Metric::Euclidean,
        }
    }
}

/// The selected model family and every hyperparameter group.
///
/// Groups of inactive families are kept so switching back restores them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub layers: LayerStack,
    pub nn: NnParams,
    pub rf: RfParams,
    pub svm: SvmParams,
    pub knn: KnnParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::RandomForest,
            layers: LayerStack::default(),
            nn: NnParams::default(),
            rf: RfParams::default(),
            svm: SvmParams::default(),
            knn: KnnParams::default(),
        }
    }
}
