//! Decoders for the `arg` field of accepted responses.
//!
//! Every decoder takes the raw `serde_json::Value` so that a malformed payload
//! surfaces as a `serde_json::Error` instead of a partially written result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::specs::{
    Activation, Algorithm, Kernel, LayerType, MaxFeatures, Metric, Optimizer, ProblemKind, Weights,
};

/// A single dataset cell. Missing values arrive as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Missing,
}

pub type Row = Vec<Cell>;

/// Decodes the rows of an `Import` response.
pub fn import_rows(arg: Value) -> serde_json::Result<Vec<Row>> {
    serde_json::from_value(arg)
}

/// The outcome of the preprocessing step.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub transforms: Vec<String>,
    pub problem: ProblemKind,
    pub cardinality: usize,
}

impl PreprocessOutput {
    /// Decodes `[columns, rows, transforms, [problem, cardinality]]`.
    pub fn from_arg(arg: Value) -> serde_json::Result<Self> {
        let (columns, rows, transforms, (problem, cardinality)): (
            Vec<String>,
            Vec<Row>,
            Vec<String>,
            (ProblemKind, usize),
        ) = serde_json::from_value(arg)?;

        Ok(Self {
            columns,
            rows,
            transforms,
            problem,
            cardinality,
        })
    }
}

/// Predicted values paired with the ground truth of the test split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub y_pred: Vec<f64>,
    pub y_test: Vec<f64>,
}

impl From<(Vec<f64>, Vec<f64>)> for Predictions {
    fn from((y_pred, y_test): (Vec<f64>, Vec<f64>)) -> Self {
        Self { y_pred, y_test }
    }
}

/// The outcome of a training run, shaped by the model family.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutput {
    NeuralNetwork {
        val_losses: Vec<f64>,
        val_metrics: Vec<f64>,
        test_metrics: Vec<f64>,
        predictions: Predictions,
    },
    Estimator {
        test_metrics: Vec<f64>,
        predictions: Predictions,
    },
}

impl TrainingOutput {
    /// Decodes `[valLosses, valMetrics, testMetrics, [yPred, yTest]]`.
    pub fn neural_network(arg: Value) -> serde_json::Result<Self> {
        let (val_losses, val_metrics, test_metrics, predictions): (
            Vec<f64>,
            Vec<f64>,
            Vec<f64>,
            (Vec<f64>, Vec<f64>),
        ) = serde_json::from_value(arg)?;

        Ok(Self::NeuralNetwork {
            val_losses,
            val_metrics,
            test_metrics,
            predictions: predictions.into(),
        })
    }

    /// Decodes `[testMetrics, [yPred, yTest]]`.
    pub fn estimator(arg: Value) -> serde_json::Result<Self> {
        let (test_metrics, predictions): (Vec<f64>, (Vec<f64>, Vec<f64>)) =
            serde_json::from_value(arg)?;

        Ok(Self::Estimator {
            test_metrics,
            predictions: predictions.into(),
        })
    }
}

/// One hidden layer as proposed by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOptimum {
    pub layer: LayerType,
    pub param: f64,
    pub activation: Activation,
}

/// Best neural network configuration found by the optimizer.
///
/// The layer list is sent as numbered keys (`layer1`, `param1`, `af1`, ...)
/// and `last` is the 1-based index of the first terminal layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NnOptimum {
    pub last: usize,
    pub layers: Vec<LayerOptimum>,
    pub optimizer: Optimizer,
    pub lr: f64,
    pub mini_batch: f64,
}

impl NnOptimum {
    pub const LAYERS: usize = 5;

    pub fn from_arg(arg: Value) -> serde_json::Result<Self> {
        let obj = as_object(&arg)?;

        let layers = (1..=Self::LAYERS)
            .map(|idx| {
                Ok(LayerOptimum {
                    layer: field(obj, &format!("layer{idx}"))?,
                    param: field(obj, &format!("param{idx}"))?,
                    activation: field(obj, &format!("af{idx}"))?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self {
            last: field(obj, "last")?,
            layers,
            optimizer: field(obj, "optimizer")?,
            lr: field(obj, "lr")?,
            mini_batch: field(obj, "miniBatch")?,
        })
    }
}

/// Best random forest configuration. `None` means "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RfOptimum {
    pub n_estimators: f64,
    pub max_features: Option<MaxFeatures>,
    pub max_depth: Option<f64>,
    pub min_samples_split: f64,
}

/// The optimizer reports gamma either as a number or as a named heuristic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GammaOptimum {
    Value(f64),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SvmOptimum {
    pub kernel: Kernel,
    #[serde(rename = "C", alias = "c")]
    pub c: f64,
    pub gamma: GammaOptimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct KnnOptimum {
    pub n_neighbors: f64,
    pub weights: Weights,
    pub algorithm: Algorithm,
    pub metric: Metric,
}

fn as_object(value: &Value) -> serde_json::Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| serde::de::Error::custom("expected an object"))
}

fn field<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
) -> serde_json::Result<T> {
    match obj.get(key) {
        Some(value) => T::deserialize(value),
        None => Err(serde::de::Error::custom(format!("missing field `{key}`"))),
    }
}
