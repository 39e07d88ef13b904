use comms::specs::LayerType;

use super::layer_at;
use crate::{
    configs::{
        model::{LayerStack, MAX_LAYERS},
        registry::{
            self, Bounds, DENSE_UNITS, EPOCHS, LEARNING_RATE, MAX_DEPTH, MIN_SAMPLES_SPLIT,
            MINI_BATCH, N_ESTIMATORS, N_NEIGHBORS, SVM_C, SVM_GAMMA,
        },
    },
    error::BindingError,
    state::ConfigStore,
};

/// Every bounded numeric field. Layer fields carry their slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    LayerParam(usize),
    LearningRate,
    MiniBatch,
    Epochs,
    NEstimators,
    MaxDepth,
    MinSamplesSplit,
    C,
    Gamma,
    NNeighbors,
}

/// What a slider and its text box need to render a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBinding {
    pub value: f64,
    pub bounds: Bounds,
    pub enabled: bool,
}

impl NumericBinding {
    pub fn step(&self) -> f64 {
        self.bounds.step()
    }
}

impl NumericField {
    /// Resolves the field against the store.
    ///
    /// # Errors
    /// Returns `BindingError::LayerOutOfRange` for a layer index past the last slot.
    pub fn bind(self, store: &ConfigStore) -> Result<NumericBinding, BindingError> {
        let model = store.model();
        let binding = match self {
            Self::LayerParam(idx) => {
                let layer = layer_at(&model.layers, idx)?;
                let bounds = registry::layer_param_bounds(layer.layer);
                NumericBinding {
                    value: layer.param,
                    // batch norm has no parameter, the dense bounds only shape the disabled control
                    bounds: bounds.unwrap_or(DENSE_UNITS),
                    enabled: bounds.is_some() && model.layers.is_visible(idx),
                }
            }
            Self::LearningRate => enabled(model.nn.lr, LEARNING_RATE),
            Self::MiniBatch => enabled(model.nn.mini_batch, MINI_BATCH),
            Self::Epochs => enabled(model.nn.epochs, EPOCHS),
            Self::NEstimators => enabled(model.rf.n_estimators, N_ESTIMATORS),
            Self::MaxDepth => NumericBinding {
                value: model.rf.max_depth,
                bounds: MAX_DEPTH,
                enabled: !model.rf.is_depth_unlimited(),
            },
            Self::MinSamplesSplit => enabled(model.rf.min_samples_split, MIN_SAMPLES_SPLIT),
            Self::C => enabled(model.svm.c, SVM_C),
            Self::Gamma => NumericBinding {
                value: model.svm.gamma,
                bounds: SVM_GAMMA,
                enabled: model.svm.uses_gamma() && !model.svm.is_gamma_auto(),
            },
            Self::NNeighbors => enabled(model.knn.n_neighbors, N_NEIGHBORS),
        };
        Ok(binding)
    }

    /// Slider movement. The value is kept inside the bounds.
    pub fn slide(self, store: &mut ConfigStore, value: f64) -> Result<(), BindingError> {
        let binding = self.bind(store)?;
        if binding.enabled {
            let value = binding.bounds.round(binding.bounds.clamp(value));
            self.write(store, value);
        }
        Ok(())
    }

    /// Direct text entry. Empty text restores the default, integral fields
    /// are rounded, and clamping waits for [`NumericField::blur`].
    ///
    /// # Errors
    /// Returns `BindingError::InvalidNumber` if the text does not parse.
    pub fn enter_text(self, store: &mut ConfigStore, text: &str) -> Result<(), BindingError> {
        let binding = self.bind(store)?;
        if !binding.enabled {
            return Ok(());
        }

        let text = text.trim();
        let value = if text.is_empty() {
            binding.bounds.default
        } else {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BindingError::InvalidNumber(text.to_string()))?
        };

        self.write(store, binding.bounds.round(value));
        Ok(())
    }

    /// Focus loss. Pulls an out of range value back to the nearest bound.
    pub fn blur(self, store: &mut ConfigStore) -> Result<(), BindingError> {
        let binding = self.bind(store)?;
        if binding.enabled && !binding.bounds.contains(binding.value) {
            self.write(store, binding.bounds.clamp(binding.value));
        }
        Ok(())
    }

    fn write(self, store: &mut ConfigStore, value: f64) {
        match self {
            Self::LayerParam(idx) => {
                let mut layers = *store.model().layers.layers();
                if idx < MAX_LAYERS && layers[idx].layer != LayerType::BatchNorm {
                    layers[idx].param = value;
                    store.set_layers(LayerStack::new(layers));
                }
            }
            Self::LearningRate => store.update_nn(|nn| nn.lr = value),
            Self::MiniBatch => store.update_nn(|nn| nn.mini_batch = value),
            Self::Epochs => store.update_nn(|nn| nn.epochs = value),
            Self::NEstimators => store.update_rf(|rf| rf.n_estimators = value),
            Self::MaxDepth => store.update_rf(|rf| rf.max_depth = value),
            Self::MinSamplesSplit => store.update_rf(|rf| rf.min_samples_split = value),
            Self::C => store.update_svm(|svm| svm.c = value),
            Self::Gamma => store.update_svm(|svm| svm.gamma = value),
            Self::NNeighbors => store.update_knn(|knn| knn.n_neighbors = value),
        }
    }
}

fn enabled(value: f64, bounds: Bounds) -> NumericBinding {
    NumericBinding {
        value,
        bounds,
        enabled: true,
    }
}

#[cfg(test)]
mod tests {
    use comms::specs::Kernel;

    use super::*;
    use crate::binding::{ChoiceField, ToggleField};

    #[test]
    fn blur_clamps_into_bounds() {
        let mut store = ConfigStore::new();
        NumericField::MiniBatch.enter_text(&mut store, "500").unwrap();
        assert_eq!(store.model().nn.mini_batch, 500.0);

        NumericField::MiniBatch.blur(&mut store).unwrap();
        assert_eq!(store.model().nn.mini_batch, MINI_BATCH.max);

        NumericField::C.enter_text(&mut store, "0.01").unwrap();
        NumericField::C.blur(&mut store).unwrap();
        assert_eq!(store.model().svm.c, SVM_C.min);
    }

    #[test]
    fn empty_text_restores_default() {
        let mut store = ConfigStore::new();
        NumericField::LearningRate.slide(&mut store, 0.05).unwrap();
        NumericField::LearningRate.enter_text(&mut store, "").unwrap();
        assert_eq!(store.model().nn.lr, LEARNING_RATE.default);
    }

    #[test]
    fn integral_fields_are_rounded() {
        let mut store = ConfigStore::new();
        NumericField::Epochs.enter_text(&mut store, "12.6").unwrap();
        assert_eq!(store.model().nn.epochs, 13.0);

        NumericField::NNeighbors.slide(&mut store, 7.4).unwrap();
        assert_eq!(store.model().knn.n_neighbors, 7.0);

        NumericField::LearningRate.enter_text(&mut store, "0.0125").unwrap();
        assert_eq!(store.model().nn.lr, 0.0125);
    }

    #[test]
    fn slider_and_text_share_one_value() {
        let mut store = ConfigStore::new();
        NumericField::NEstimators.slide(&mut store, 250.0).unwrap();
        assert_eq!(NumericField::NEstimators.bind(&store).unwrap().value, 250.0);

        NumericField::NEstimators.enter_text(&mut store, "300").unwrap();
        assert_eq!(NumericField::NEstimators.bind(&store).unwrap().value, 300.0);
        assert_eq!(store.model().rf.n_estimators, 300.0);
    }

    #[test]
    fn garbage_text_is_rejected() {
        let mut store = ConfigStore::new();
        let err = NumericField::C.enter_text(&mut store, "abc").unwrap_err();
        assert_eq!(err, BindingError::InvalidNumber("abc".into()));
        assert_eq!(store.model().svm.c, SVM_C.default);
    }

    #[test]
    fn layer_param_follows_layer_type() {
        let mut store = ConfigStore::new();

        let batch = NumericField::LayerParam(0).bind(&store).unwrap();
        assert!(!batch.enabled);

        let dense = NumericField::LayerParam(1).bind(&store).unwrap();
        assert!(dense.enabled);
        assert_eq!(dense.bounds, DENSE_UNITS);

        ChoiceField::LayerType(1).select(&mut store, Some("dropout")).unwrap();
        let dropout = NumericField::LayerParam(1).bind(&store).unwrap();
        assert_eq!(dropout.bounds, registry::DROPOUT_RATE);
        assert_eq!(dropout.value, 0.5);
        assert!(!dropout.bounds.is_integral());
    }

    #[test]
    fn hidden_layers_are_disabled() {
        let mut store = ConfigStore::new();
        let binding = NumericField::LayerParam(3).bind(&store).unwrap();
        assert!(!binding.enabled);

        NumericField::LayerParam(3).slide(&mut store, 80.0).unwrap();
        assert_eq!(store.model().layers.layers()[3].param, DENSE_UNITS.default);
    }

    #[test]
    fn layer_index_out_of_range() {
        let store = ConfigStore::new();
        assert_eq!(
            NumericField::LayerParam(MAX_LAYERS).bind(&store).unwrap_err(),
            BindingError::LayerOutOfRange(MAX_LAYERS)
        );
    }

    #[test]
    fn gamma_disabled_by_auto_or_linear_kernel() {
        let mut store = ConfigStore::new();
        assert!(!NumericField::Gamma.bind(&store).unwrap().enabled);

        ToggleField::AutoGamma.set(&mut store, false).unwrap();
        assert!(NumericField::Gamma.bind(&store).unwrap().enabled);

        store.update_svm(|svm| svm.kernel = Kernel::Linear);
        assert!(!NumericField::Gamma.bind(&store).unwrap().enabled);
    }
}
