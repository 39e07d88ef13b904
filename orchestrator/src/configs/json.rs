//! Model presets stored as JSON.
//!
//! A preset may set the model kind, the layer slots and any hyperparameter
//! group. Keys it leaves out keep the value of the base configuration.
//! Numbers are clamped to the registry bounds.

use comms::specs::{
    Activation, Algorithm, Kernel, LayerType, MaxFeatures, Metric, ModelKind, Optimizer, Weights,
};
use serde_json::Value;

use super::{
    model::{LayerSpec, LayerStack, MAX_LAYERS, ModelConfig},
    registry::{
        self, AUTO_GAMMA, Bounds, Choice, EPOCHS, LEARNING_RATE, MAX_DEPTH, MIN_SAMPLES_SPLIT,
        MINI_BATCH, N_ESTIMATORS, N_NEIGHBORS, SVM_C, SVM_GAMMA, UNLIMITED_DEPTH,
    },
};

/// Loads a preset file on top of `base`.
///
/// # Errors
/// Returns a human-readable string if the file cannot be read or parsed.
pub fn load_preset(path: &str, base: ModelConfig) -> Result<ModelConfig, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read '{path}': {e}"))?;
    parse_preset(&content, base)
}

/// Parses a preset on top of `base`.
///
/// # Errors
/// Returns a human-readable string if the JSON is invalid or names an
/// unknown option.
pub fn parse_preset(content: &str, base: ModelConfig) -> Result<ModelConfig, String> {
    let val: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    if !val.is_object() {
        return Err("preset must be a JSON object".into());
    }

    let mut cfg = base;
    if let Some(kind) = opt_choice::<ModelKind>(&val, "model")? {
        cfg.kind = kind;
    }

    if !val["layers"].is_null() {
        cfg.layers = parse_layers(&val["layers"], cfg.layers)?;
    }

    let nn = &val["nn"];
    if let Some(optimizer) = opt_choice::<Optimizer>(nn, "optimizer")? {
        cfg.nn.optimizer = optimizer;
    }
    cfg.nn.lr = bounded(nn, "lr", LEARNING_RATE, cfg.nn.lr)?;
    cfg.nn.mini_batch = bounded(nn, "mini_batch", MINI_BATCH, cfg.nn.mini_batch)?;
    cfg.nn.epochs = bounded(nn, "epochs", EPOCHS, cfg.nn.epochs)?;

    let rf = &val["rf"];
    cfg.rf.n_estimators = bounded(rf, "n_estimators", N_ESTIMATORS, cfg.rf.n_estimators)?;
    if let Some(max_features) = opt_choice::<MaxFeatures>(rf, "max_features")? {
        cfg.rf.max_features = max_features;
    }
    cfg.rf.max_depth = sentinel(rf, "max_depth", MAX_DEPTH, UNLIMITED_DEPTH, cfg.rf.max_depth)?;
    cfg.rf.min_samples_split =
        bounded(rf, "min_samples_split", MIN_SAMPLES_SPLIT, cfg.rf.min_samples_split)?;

    let svm = &val["svm"];
    if let Some(kernel) = opt_choice::<Kernel>(svm, "kernel")? {
        cfg.svm.kernel = kernel;
    }
    cfg.svm.c = bounded(svm, "c", SVM_C, cfg.svm.c)?;
    cfg.svm.gamma = sentinel(svm, "gamma", SVM_GAMMA, AUTO_GAMMA, cfg.svm.gamma)?;

    let knn = &val["knn"];
    cfg.knn.n_neighbors = bounded(knn, "n_neighbors", N_NEIGHBORS, cfg.knn.n_neighbors)?;
    if let Some(weights) = opt_choice::<Weights>(knn, "weights")? {
        cfg.knn.weights = weights;
    }
    if let Some(algorithm) = opt_choice::<Algorithm>(knn, "algorithm")? {
        cfg.knn.algorithm = algorithm;
    }
    if let Some(metric) = opt_choice::<Metric>(knn, "metric")? {
        cfg.knn.metric = metric;
    }

    Ok(cfg)
}

fn parse_layers(val: &Value, base: LayerStack) -> Result<LayerStack, String> {
    let entries = val.as_array().ok_or("layers must be an array")?;
    if entries.len() > MAX_LAYERS {
        return Err(format!("at most {MAX_LAYERS} layers are supported"));
    }

    let mut layers = *base.layers();
    for (i, entry) in entries.iter().enumerate() {
        layers[i] = parse_layer(entry, i, layers[i])?;
    }
    Ok(LayerStack::new(layers))
}

fn parse_layer(val: &Value, i: usize, base: LayerSpec) -> Result<LayerSpec, String> {
    let layer = opt_choice::<LayerType>(val, "layer")
        .map_err(|e| format!("layer {i}: {e}"))?
        .unwrap_or(base.layer);

    let param = match registry::layer_param_bounds(layer) {
        Some(bounds) => {
            let fallback = if layer == base.layer {
                base.param
            } else {
                bounds.default
            };
            bounded(val, "param", bounds, fallback).map_err(|e| format!("layer {i}: {e}"))?
        }
        None => 0.0,
    };

    let activation = opt_choice::<Activation>(val, "activation")
        .map_err(|e| format!("layer {i}: {e}"))?
        .unwrap_or(base.activation);

    let terminal = match &val["terminal"] {
        Value::Null => base.terminal,
        v => v
            .as_bool()
            .ok_or_else(|| format!("layer {i}: terminal must be a boolean"))?,
    };

    Ok(LayerSpec {
        terminal,
        layer,
        param,
        activation,
    })
}

fn opt_choice<T: Choice>(val: &Value, key: &str) -> Result<Option<T>, String> {
    match &val[key] {
        Value::Null => Ok(None),
        Value::String(s) => T::from_wire(s)
            .map(Some)
            .ok_or_else(|| format!("unknown {key}: {s}")),
        _ => Err(format!("{key} must be a string")),
    }
}

fn bounded(val: &Value, key: &str, bounds: Bounds, fallback: f64) -> Result<f64, String> {
    match &val[key] {
        Value::Null => Ok(fallback),
        v => {
            let n = v.as_f64().ok_or_else(|| format!("{key} must be a number"))?;
            Ok(bounds.round(bounds.clamp(n)))
        }
    }
}

/// Like [`bounded`], but `zero` or `null` select the given sentinel.
fn sentinel(
    val: &Value,
    key: &str,
    bounds: Bounds,
    zero: f64,
    fallback: f64,
) -> Result<f64, String> {
    let obj_has_key = val.as_object().is_some_and(|o| o.contains_key(key));
    match &val[key] {
        Value::Null if obj_has_key => Ok(zero),
        Value::Null => Ok(fallback),
        v if v.as_f64() == Some(0.0) => Ok(zero),
        _ => bounded(val, key, bounds, fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_preset_keeps_base() {
        let base = ModelConfig::default();
        assert_eq!(parse_preset("{}", base).unwrap(), base);
    }

    #[test]
    fn preset_overrides_and_clamps() {
        let mut manual = ModelConfig::default();
        manual.rf.max_depth = 10.0;
        manual.svm.gamma = 0.1;

        let cfg = parse_preset(
            r#"{
                "model": "nn",
                "nn": {"optimizer": "adam", "lr": 5.0, "mini_batch": 40.4},
                "rf": {"max_depth": null},
                "svm": {"gamma": 0, "c": 2.5}
            }"#,
            manual,
        )
        .unwrap();

        assert_eq!(cfg.kind, ModelKind::NeuralNetwork);
        assert_eq!(cfg.nn.optimizer, Optimizer::Adam);
        assert_eq!(cfg.nn.lr, LEARNING_RATE.max);
        assert_eq!(cfg.nn.mini_batch, 40.0);
        assert_eq!(cfg.nn.epochs, EPOCHS.default);
        assert!(cfg.rf.is_depth_unlimited());
        assert!(cfg.svm.is_gamma_auto());
        assert_eq!(cfg.svm.c, 2.5);
    }

    #[test]
    fn layers_are_normalized() {
        let cfg = parse_preset(
            r#"{"layers": [
                {"layer": "dropout", "activation": "tanh"},
                {"terminal": true},
                {"terminal": false}
            ]}"#,
            ModelConfig::default(),
        )
        .unwrap();

        let layers = cfg.layers.layers();
        assert_eq!(layers[0].layer, LayerType::Dropout);
        assert_eq!(layers[0].param, 0.5);
        assert_eq!(layers[0].activation, Activation::Tanh);
        assert!(cfg.layers.is_monotone());
        assert_eq!(cfg.layers.visible_len(), 2);
    }

    #[test]
    fn unknown_option_is_an_error() {
        let err = parse_preset(r#"{"knn": {"metric": "cosine"}}"#, ModelConfig::default())
            .unwrap_err();
        assert_eq!(err, "unknown metric: cosine");

        let err = parse_preset(r#"{"layers": [{"layer": "conv"}]}"#, ModelConfig::default())
            .unwrap_err();
        assert_eq!(err, "layer 0: unknown layer: conv");

        assert!(parse_preset("[]", ModelConfig::default()).is_err());
        assert!(parse_preset("{", ModelConfig::default()).is_err());
    }
}
