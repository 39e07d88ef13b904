//! Cross-field rules, kept free of any store access.

use comms::specs::LayerType;

use crate::configs::{
    model::LayerSpec,
    registry::{self, AUTO_GAMMA, MANUAL_GAMMA, MAX_DEPTH, UNLIMITED_DEPTH},
};

/// Applies a terminal flag edit to a layer sequence.
///
/// Setting a flag marks every later layer terminal as well. Clearing it only
/// touches that layer, and is refused for the last layer or when the previous
/// one is terminal, since either would break the monotone ordering.
pub fn propagate_terminal<const N: usize>(
    mut layers: [LayerSpec; N],
    idx: usize,
    terminal: bool,
) -> [LayerSpec; N] {
    if idx >= N {
        return layers;
    }

    if terminal {
        for layer in &mut layers[idx..] {
            layer.terminal = true;
        }
    } else if can_clear_terminal(&layers, idx) {
        layers[idx].terminal = false;
    }
    layers
}

/// Whether the terminal flag of `idx` may be cleared.
pub fn can_clear_terminal(layers: &[LayerSpec], idx: usize) -> bool {
    idx + 1 < layers.len() && (idx == 0 || !layers[idx - 1].terminal)
}

/// Changes the type of a layer, resetting its parameter to the new type's default.
pub fn retype_layer(layer: LayerSpec, layer_type: LayerType) -> LayerSpec {
    if layer.layer == layer_type {
        return layer;
    }

    LayerSpec {
        layer: layer_type,
        param: registry::layer_param_default(layer_type),
        ..layer
    }
}

/// Depth implied by the "unlimited depth" checkbox.
pub fn pair_unlimited_depth(unlimited: bool) -> f64 {
    if unlimited { UNLIMITED_DEPTH } else { MAX_DEPTH.default }
}

/// Gamma implied by the "auto gamma" checkbox.
pub fn pair_auto_gamma(auto: bool) -> f64 {
    if auto { AUTO_GAMMA } else { MANUAL_GAMMA }
}

#[cfg(test)]
mod tests {
    use comms::specs::Activation;
    use proptest::prelude::*;

    use super::*;
    use crate::configs::model::LayerStack;

    fn flags<const N: usize>(layers: &[LayerSpec; N]) -> [bool; N] {
        layers.map(|l| l.terminal)
    }

    fn stack() -> [LayerSpec; 5] {
        *LayerStack::default().layers()
    }

    #[test]
    fn setting_terminal_propagates_forward() {
        let layers = propagate_terminal(stack(), 1, true);
        assert_eq!(flags(&layers), [false, true, true, true, true]);
    }

    #[test]
    fn clearing_terminal_touches_one_layer() {
        let layers = propagate_terminal(stack(), 2, false);
        assert_eq!(flags(&layers), [false, false, false, true, true]);
    }

    #[test]
    fn clearing_after_a_terminal_layer_is_refused() {
        let layers = propagate_terminal(stack(), 3, false);
        assert_eq!(flags(&layers), flags(&stack()));
    }

    #[test]
    fn last_layer_stays_terminal() {
        let mut layers = stack();
        for idx in 0..4 {
            layers = propagate_terminal(layers, idx, false);
        }
        assert_eq!(flags(&layers), [false, false, false, false, true]);

        let layers = propagate_terminal(layers, 4, false);
        assert!(layers[4].terminal);
    }

    #[test]
    fn any_edit_sequence_stays_monotone() {
        let edits = [(2, false), (0, true), (0, false), (3, false), (1, true), (4, false)];
        let mut layers = stack();
        for (idx, value) in edits {
            layers = propagate_terminal(layers, idx, value);
            assert!(LayerStack::new(layers).layers() == &layers, "{:?}", flags(&layers));
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        assert_eq!(flags(&propagate_terminal(stack(), 7, true)), flags(&stack()));
    }

    #[test]
    fn retype_resets_param() {
        let dense = LayerSpec {
            terminal: false,
            layer: LayerType::Dense,
            param: 77.0,
            activation: Activation::Tanh,
        };

        let dropout = retype_layer(dense, LayerType::Dropout);
        assert_eq!(dropout.param, 0.5);
        assert_eq!(dropout.activation, Activation::Tanh);

        assert_eq!(retype_layer(dense, LayerType::BatchNorm).param, 0.0);
        assert_eq!(retype_layer(dropout, LayerType::Dense).param, 30.0);
        assert_eq!(retype_layer(dense, LayerType::Dense), dense);
    }

    #[test]
    fn checkbox_pairs() {
        assert_eq!(pair_unlimited_depth(true), 0.0);
        assert_eq!(pair_unlimited_depth(false), MAX_DEPTH.default);
        assert_eq!(pair_auto_gamma(true), 0.0);
        assert_eq!(pair_auto_gamma(false), 0.1);
    }

    proptest! {
        #[test]
        fn random_edits_keep_stack_monotone(
            start in prop::array::uniform5(any::<bool>()),
            edits in prop::collection::vec((0usize..7, any::<bool>()), 0..40),
        ) {
            let mut layers = stack();
            for (layer, terminal) in layers.iter_mut().zip(start) {
                layer.terminal = terminal;
            }
            let mut layers = *LayerStack::new(layers).layers();

            for (idx, terminal) in edits {
                layers = propagate_terminal(layers, idx, terminal);
                prop_assert!(LayerStack::new(layers).is_monotone());
                prop_assert!(LayerStack::new(layers).layers() == &layers);
                prop_assert!(layers[4].terminal);
                if terminal && idx < 5 {
                    prop_assert!(layers[idx..].iter().all(|l| l.terminal));
                }
            }
        }
    }
}
