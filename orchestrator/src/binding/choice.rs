use comms::specs::{
    Activation, Algorithm, DatasetSelection, Kernel, LayerType, MaxFeatures, Metric, ModelKind,
    Optimizer, Weights,
};

use super::{layer_at, rules};
use crate::{
    configs::{
        model::LayerStack,
        registry::{Choice, ChoiceOption},
    },
    error::BindingError,
    state::ConfigStore,
};

/// Every exclusive choice. Layer fields carry their slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceField {
    Dataset,
    Model,
    LayerType(usize),
    Activation(usize),
    Optimizer,
    MaxFeatures,
    Kernel,
    Weights,
    Algorithm,
    Metric,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceBinding {
    /// Wire value of the active option.
    pub value: &'static str,
    pub options: &'static [ChoiceOption],
    pub enabled: bool,
}

impl ChoiceBinding {
    pub fn active(&self) -> Option<&'static ChoiceOption> {
        self.options.iter().find(|o| o.value == self.value)
    }
}

fn binding<T: Choice>(value: T, enabled: bool) -> ChoiceBinding {
    ChoiceBinding {
        value: value.as_str(),
        options: T::OPTIONS,
        enabled,
    }
}

fn parse<T: Choice>(value: Option<&str>) -> Option<T> {
    value.and_then(T::from_wire)
}

impl ChoiceField {
    pub fn bind(self, store: &ConfigStore) -> Result<ChoiceBinding, BindingError> {
        let model = store.model();
        let binding = match self {
            Self::Dataset => binding(store.common().dataset, true),
            Self::Model => binding(model.kind, true),
            Self::LayerType(idx) => {
                binding(layer_at(&model.layers, idx)?.layer, model.layers.is_visible(idx))
            }
            Self::Activation(idx) => binding(
                layer_at(&model.layers, idx)?.activation,
                model.layers.is_visible(idx),
            ),
            Self::Optimizer => binding(model.nn.optimizer, true),
            Self::MaxFeatures => binding(model.rf.max_features, true),
            Self::Kernel => binding(model.svm.kernel, true),
            Self::Weights => binding(model.knn.weights, true),
            Self::Algorithm => binding(model.knn.algorithm, true),
            Self::Metric => binding(model.knn.metric, true),
        };
        Ok(binding)
    }

    /// Replaces the active choice. A value outside the option set, or `None`
    /// for a deselect gesture, leaves the store untouched.
    pub fn select(self, store: &mut ConfigStore, value: Option<&str>) -> Result<(), BindingError> {
        if !self.bind(store)?.enabled {
            return Ok(());
        }

        match self {
            Self::Dataset => {
                if let Some(dataset) = parse::<DatasetSelection>(value) {
                    store.set_dataset(dataset);
                }
            }
            Self::Model => {
                if let Some(kind) = parse::<ModelKind>(value) {
                    store.set_model_kind(kind);
                }
            }
            Self::LayerType(idx) => {
                if let Some(layer_type) = parse::<LayerType>(value) {
                    let mut layers = *store.model().layers.layers();
                    layers[idx] = rules::retype_layer(layers[idx], layer_type);
                    store.set_layers(LayerStack::new(layers));
                }
            }
            Self::Activation(idx) => {
                if let Some(activation) = parse::<Activation>(value) {
                    let mut layers = *store.model().layers.layers();
                    layers[idx].activation = activation;
                    store.set_layers(LayerStack::new(layers));
                }
            }
            Self::Optimizer => {
                if let Some(optimizer) = parse::<Optimizer>(value) {
                    store.update_nn(|nn| nn.optimizer = optimizer);
                }
            }
            Self::MaxFeatures => {
                if let Some(max_features) = parse::<MaxFeatures>(value) {
                    store.update_rf(|rf| rf.max_features = max_features);
                }
            }
            Self::Kernel => {
                if let Some(kernel) = parse::<Kernel>(value) {
                    store.update_svm(|svm| svm.kernel = kernel);
                }
            }
            Self::Weights => {
                if let Some(weights) = parse::<Weights>(value) {
                    store.update_knn(|knn| knn.weights = weights);
                }
            }
            Self::Algorithm => {
                if let Some(algorithm) = parse::<Algorithm>(value) {
                    store.update_knn(|knn| knn.algorithm = algorithm);
                }
            }
            Self::Metric => {
                if let Some(metric) = parse::<Metric>(value) {
                    store.update_knn(|knn| knn.metric = metric);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_value_replaces_choice() {
        let mut store = ConfigStore::new();
        ChoiceField::Kernel.select(&mut store, Some("poly")).unwrap();
        assert_eq!(store.model().svm.kernel, Kernel::Poly);

        let binding = ChoiceField::Kernel.bind(&store).unwrap();
        assert_eq!(binding.value, "poly");
        assert_eq!(binding.active().map(|o| o.label), Some("Polynomial"));
    }

    #[test]
    fn unknown_value_or_deselect_is_ignored() {
        let mut store = ConfigStore::new();
        let before = store.clone();

        ChoiceField::Metric.select(&mut store, Some("cosine")).unwrap();
        ChoiceField::Metric.select(&mut store, None).unwrap();
        ChoiceField::Model.select(&mut store, Some("")).unwrap();
        ChoiceField::Dataset.select(&mut store, Some("iris")).unwrap();

        assert_eq!(store, before);
    }

    #[test]
    fn dataset_choice_cascades() {
        let mut store = ConfigStore::new();
        store.set_target("Survived").unwrap();
        ChoiceField::Dataset.select(&mut store, Some("lego")).unwrap();

        assert_eq!(store.common().dataset, DatasetSelection::Lego);
        assert_eq!(store.common().target, None);
    }

    #[test]
    fn layer_choices_are_disabled_when_hidden() {
        let mut store = ConfigStore::new();
        assert!(ChoiceField::Activation(2).bind(&store).unwrap().enabled);
        assert!(!ChoiceField::Activation(3).bind(&store).unwrap().enabled);

        ChoiceField::Activation(3).select(&mut store, Some("tanh")).unwrap();
        assert_eq!(store.model().layers.layers()[3].activation, Activation::Relu);

        ChoiceField::Activation(2).select(&mut store, Some("tanh")).unwrap();
        assert_eq!(store.model().layers.layers()[2].activation, Activation::Tanh);
    }

    #[test]
    fn retyping_a_layer_resets_its_param() {
        let mut store = ConfigStore::new();
        ChoiceField::LayerType(0).select(&mut store, Some("fully")).unwrap();
        assert_eq!(store.model().layers.layers()[0].param, 30.0);

        ChoiceField::LayerType(0).select(&mut store, Some("batch")).unwrap();
        assert_eq!(store.model().layers.layers()[0].param, 0.0);
    }

    #[test]
    fn layer_index_out_of_range() {
        let mut store = ConfigStore::new();
        assert_eq!(
            ChoiceField::LayerType(9).select(&mut store, Some("fully")),
            Err(BindingError::LayerOutOfRange(9))
        );
    }
}
