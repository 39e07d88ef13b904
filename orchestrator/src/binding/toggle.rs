use super::{layer_at, rules};
use crate::{
    configs::model::{LayerStack, MAX_LAYERS},
    error::BindingError,
    state::ConfigStore,
};

/// Every checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleField {
    /// Ends the hidden stack at this layer.
    Terminal(usize),
    UnlimitedDepth,
    AutoGamma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleBinding {
    pub checked: bool,
    pub enabled: bool,
}

impl ToggleField {
    pub fn bind(self, store: &ConfigStore) -> Result<ToggleBinding, BindingError> {
        let model = store.model();
        let binding = match self {
            Self::Terminal(idx) => ToggleBinding {
                checked: layer_at(&model.layers, idx)?.terminal,
                enabled: model.layers.is_visible(idx) && idx + 1 < MAX_LAYERS,
            },
            Self::UnlimitedDepth => ToggleBinding {
                checked: model.rf.is_depth_unlimited(),
                enabled: true,
            },
            Self::AutoGamma => ToggleBinding {
                checked: model.svm.is_gamma_auto(),
                enabled: model.svm.uses_gamma(),
            },
        };
        Ok(binding)
    }

    pub fn set(self, store: &mut ConfigStore, checked: bool) -> Result<(), BindingError> {
        let binding = self.bind(store)?;
        if !binding.enabled || binding.checked == checked {
            return Ok(());
        }

        match self {
            Self::Terminal(idx) => {
                let layers = rules::propagate_terminal(*store.model().layers.layers(), idx, checked);
                store.set_layers(LayerStack::new(layers));
            }
            Self::UnlimitedDepth => {
                let depth = rules::pair_unlimited_depth(checked);
                store.update_rf(|rf| rf.max_depth = depth);
            }
            Self::AutoGamma => {
                let gamma = rules::pair_auto_gamma(checked);
                store.update_svm(|svm| svm.gamma = gamma);
            }
        }
        Ok(())
    }

    pub fn toggle(self, store: &mut ConfigStore) -> Result<(), BindingError> {
        let checked = self.bind(store)?.checked;
        self.set(store, !checked)
    }
}
