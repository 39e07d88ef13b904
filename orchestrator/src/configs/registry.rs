//! Static metadata for every tunable field.

use comms::specs::{
    Activation, Algorithm, DatasetSelection, Kernel, LayerType, MaxFeatures, Metric, ModelKind,
    Optimizer, Weights,
};

/// Validation bounds and default of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Fields whose minimum is at least one only hold whole numbers.
    pub fn is_integral(&self) -> bool {
        self.min >= 1.0
    }

    /// Slider granularity.
    pub fn step(&self) -> f64 {
        self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Rounds to a whole number when the field is integral.
    pub fn round(&self, value: f64) -> f64 {
        if self.is_integral() {
            value.round()
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const DENSE_UNITS: Bounds = Bounds::new(1.0, 100.0, 30.0);
pub const DROPOUT_RATE: Bounds = Bounds::new(0.01, 0.99, 0.5);
pub const LEARNING_RATE: Bounds = Bounds::new(0.001, 0.1, 0.01);
pub const MINI_BATCH: Bounds = Bounds::new(8.0, 96.0, 32.0);
pub const EPOCHS: Bounds = Bounds::new(1.0, 200.0, 100.0);
pub const N_ESTIMATORS: Bounds = Bounds::new(10.0, 1000.0, 100.0);
pub const MAX_DEPTH: Bounds = Bounds::new(3.0, 30.0, 10.0);
pub const MIN_SAMPLES_SPLIT: Bounds = Bounds::new(2.0, 10.0, 2.0);
pub const SVM_C: Bounds = Bounds::new(0.1, 100.0, 1.0);
pub const SVM_GAMMA: Bounds = Bounds::new(0.001, 1.0, 0.1);
pub const N_NEIGHBORS: Bounds = Bounds::new(3.0, 10.0, 5.0);

/// `max_depth` value meaning "grow until leaves are pure".
pub const UNLIMITED_DEPTH: f64 = 0.0;
/// `gamma` value meaning "let the backend pick".
pub const AUTO_GAMMA: f64 = 0.0;
/// `gamma` restored when the automatic setting is switched off.
pub const MANUAL_GAMMA: f64 = 0.1;

/// Parameter of a freshly selected layer type. Batch normalization takes none.
pub fn layer_param_default(layer: LayerType) -> f64 {
    match layer {
        LayerType::Dense => DENSE_UNITS.default,
        LayerType::Dropout => DROPOUT_RATE.default,
        LayerType::BatchNorm => 0.0,
    }
}

/// Bounds of a layer parameter, `None` for layers without one.
pub fn layer_param_bounds(layer: LayerType) -> Option<Bounds> {
    match layer {
        LayerType::Dense => Some(DENSE_UNITS),
        LayerType::Dropout => Some(DROPOUT_RATE),
        LayerType::BatchNorm => None,
    }
}

/// One entry of an exclusive choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub help: Option<&'static str>,
}

const fn opt(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption {
        value,
        label,
        help: None,
    }
}

const fn opt_help(value: &'static str, label: &'static str, help: &'static str) -> ChoiceOption {
    ChoiceOption {
        value,
        label,
        help: Some(help),
    }
}

/// Links an option enum to its registry entries.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const OPTIONS: &'static [ChoiceOption];

    fn as_str(self) -> &'static str;

    fn from_wire(value: &str) -> Option<Self>;
}

macro_rules! impl_choice {
    ($($ty:ty => $options:expr),+ $(,)?) => {
        $(
            impl Choice for $ty {
                const OPTIONS: &'static [ChoiceOption] = $options;

                fn as_str(self) -> &'static str {
                    <$ty>::as_str(self)
                }

                fn from_wire(value: &str) -> Option<Self> {
                    <$ty>::from_wire(value)
                }
            }
        )+
    };
}

impl_choice! {
    DatasetSelection => &[
        opt("titanic", "Titanic passenger list"),
        opt("lego", "LEGO sets"),
        opt("house", "House prices"),
    ],
    ModelKind => &[
        opt_help("nn", "Neural network", "Stacked layers and activations, up to five hidden layers."),
        opt_help("rf", "Random forest", "An ensemble of decision trees."),
        opt_help("svm", "Support vector machine", "Finds the boundary that best separates the data."),
        opt_help("knn", "k-nearest neighbors", "Predicts from the closest training samples."),
    ],
    LayerType => &[
        opt_help("fully", "Dense", "Weights every input and adds a bias."),
        opt_help("batch", "Batch normalization", "Normalizes the previous output by mean and variance."),
        opt_help("dropout", "Dropout", "Randomly disables units to fight overfitting."),
    ],
    Activation => &[
        opt("relu", "ReLU"),
        opt("tanh", "tanh"),
        opt("none", "None"),
    ],
    Optimizer => &[
        opt("sgd", "SGD"),
        opt("momentum", "Momentum"),
        opt("rmsprop", "RMSprop"),
        opt("adam", "Adam"),
    ],
    MaxFeatures => &[
        opt("sqrt", "Square root of total"),
        opt("log2", "Log2 of total"),
        opt("none", "All features"),
    ],
    Kernel => &[
        opt("rbf", "RBF"),
        opt("linear", "Linear"),
        opt("poly", "Polynomial"),
        opt("sigmoid", "Sigmoid"),
    ],
    Weights => &[
        opt("uniform", "Uniform"),
        opt_help("distance", "Distance", "Closer neighbors weigh more."),
    ],
    Algorithm => &[
        opt("auto", "Auto"),
        opt("ball_tree", "Ball tree"),
        opt("kd_tree", "k-d tree"),
        opt("brute", "Brute force"),
    ],
    Metric => &[
        opt("euclidean", "Euclidean"),
        opt("manhattan", "Manhattan"),
        opt("chebyshev", "Chebyshev"),
    ],
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const NUMERIC: [Bounds; 11] = [
        DENSE_UNITS,
        DROPOUT_RATE,
        LEARNING_RATE,
        MINI_BATCH,
        EPOCHS,
        N_ESTIMATORS,
        MAX_DEPTH,
        MIN_SAMPLES_SPLIT,
        SVM_C,
        SVM_GAMMA,
        N_NEIGHBORS,
    ];

    fn assert_options_match<T: Choice + std::fmt::Debug>(all: &[T]) {
        assert_eq!(T::OPTIONS.len(), all.len());
        for (option, value) in T::OPTIONS.iter().zip(all) {
            assert_eq!(T::from_wire(option.value), Some(*value));
        }
    }

    #[test]
    fn options_follow_wire_enums() {
        assert_options_match(DatasetSelection::ALL);
        assert_options_match(ModelKind::ALL);
        assert_options_match(LayerType::ALL);
        assert_options_match(Activation::ALL);
        assert_options_match(Optimizer::ALL);
        assert_options_match(MaxFeatures::ALL);
        assert_options_match(Kernel::ALL);
        assert_options_match(Weights::ALL);
        assert_options_match(Algorithm::ALL);
        assert_options_match(Metric::ALL);
    }

    #[test]
    fn defaults_lie_within_bounds() {
        for b in NUMERIC {
            assert!(b.contains(b.default), "{b:?}");
        }
        assert!(SVM_GAMMA.contains(MANUAL_GAMMA));
    }

    #[test]
    fn clamp_and_round() {
        assert_eq!(MINI_BATCH.clamp(1000.0), 96.0);
        assert_eq!(MINI_BATCH.clamp(-4.0), 8.0);
        assert_eq!(LEARNING_RATE.clamp(f64::NAN), 0.01);
        assert_eq!(EPOCHS.round(10.6), 11.0);
        assert_eq!(DROPOUT_RATE.round(0.333), 0.333);
        assert!(!SVM_C.is_integral());
    }

    proptest! {
        #[test]
        fn clamp_lands_in_bounds(
            b in prop::sample::select(NUMERIC.to_vec()),
            v in any::<f64>(),
        ) {
            let clamped = b.clamp(v);
            prop_assert!(b.contains(clamped));
            prop_assert!(b.contains(b.round(clamped)));
            prop_assert_eq!(b.clamp(clamped), clamped);
        }

        #[test]
        fn clamp_keeps_values_in_range(
            b in prop::sample::select(NUMERIC.to_vec()),
            t in 0.0f64..=1.0,
        ) {
            let v = b.min + (b.max - b.min) * t;
            prop_assume!(b.contains(v));
            prop_assert_eq!(b.clamp(v), v);
        }
    }
}
