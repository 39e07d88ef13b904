//! Generic field access for sliders, option groups and checkboxes.
//!
//! A field key resolves against the store to its current value, its bounds or
//! options, and whether the control is enabled. Edits through a disabled
//! binding are ignored.

mod choice;
mod numeric;
pub mod rules;
mod toggle;

pub use choice::{ChoiceBinding, ChoiceField};
pub use numeric::{NumericBinding, NumericField};
pub use toggle::{ToggleBinding, ToggleField};

use crate::{
    configs::model::{LayerSpec, LayerStack},
    error::BindingError,
};

fn layer_at(layers: &LayerStack, idx: usize) -> Result<&LayerSpec, BindingError> {
    layers.get(idx).ok_or(BindingError::LayerOutOfRange(idx))
}
