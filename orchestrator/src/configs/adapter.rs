use comms::{
    Arg, Request, RequestKind,
    payload::{
        self, GammaOptimum, KnnOptimum, NnOptimum, PreprocessOutput, RfOptimum, SvmOptimum,
        TrainingOutput,
    },
    specs::{LayerType, MaxFeatures, ModelKind},
};
use serde_json::Value;

use super::{
    model::{KnnParams, LayerStack, ModelConfig, RfParams, SvmParams},
    registry::{self, AUTO_GAMMA, UNLIMITED_DEPTH},
};
use crate::{
    error::DispatchError,
    state::{ConfigStore, PreprocessResult, Problem, TrainingResult},
};

/// Translates between the configuration store and the wire contract.
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Builds the request of the given kind from the current configuration.
    ///
    /// # Errors
    /// Returns `DispatchError::MissingTarget` if the kind needs a target column
    /// and none is selected.
    pub fn adapt_request(
        &self,
        kind: RequestKind,
        store: &ConfigStore,
    ) -> Result<Request, DispatchError> {
        let dataset = store.common().dataset;
        if kind == RequestKind::Import {
            return Ok(Request::new(kind, dataset));
        }

        let target = self.validate_target(kind, store)?;
        let model = store.model();
        let arg = match kind {
            RequestKind::Preprocess => vec![target.into()],
            RequestKind::Optimize => vec![target.into(), model.kind.as_str().into()],
            _ => self.train_args(target, model),
        };
        Ok(Request::with_args(kind, dataset, arg))
    }

    /// Decodes an accepted payload and writes it into the store.
    ///
    /// `model` is the family captured when the request was dispatched. The
    /// payload is decoded completely before anything is written, so a
    /// malformed payload leaves the store untouched.
    pub fn apply_response(
        &self,
        kind: RequestKind,
        model: ModelKind,
        arg: Value,
        store: &mut ConfigStore,
    ) -> serde_json::Result<()> {
        match kind {
            RequestKind::Import => {
                let rows = payload::import_rows(arg)?;
                log::debug!("imported {} row(s)", rows.len());
                store.set_rows(rows);
            }
            RequestKind::Preprocess => self.apply_preprocess(PreprocessOutput::from_arg(arg)?, store),
            RequestKind::Optimize => self.apply_optimum(model, arg, store)?,
            RequestKind::Train => {
                let output = match model {
                    ModelKind::NeuralNetwork => TrainingOutput::neural_network(arg)?,
                    _ => TrainingOutput::estimator(arg)?,
                };
                store.set_training_result(self.adapt_training(model, output));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate_target<'a>(
        &self,
        kind: RequestKind,
        store: &'a ConfigStore,
    ) -> Result<&'a str, DispatchError> {
        store
            .common()
            .target
            .as_deref()
            .ok_or(DispatchError::MissingTarget(kind))
    }

    // -------------------------------------------------------------------------
    // Outbound
    // -------------------------------------------------------------------------

    fn train_args(&self, target: &str, model: &ModelConfig) -> Vec<Arg> {
        let mut args: Vec<Arg> = vec![target.into(), model.kind.as_str().into()];

        match model.kind {
            ModelKind::NeuralNetwork => {
                for layer in model.layers.layers() {
                    args.push(layer.terminal.into());
                    args.push(layer.layer.as_str().into());
                    args.push(self.adapt_layer_param(layer.layer, layer.param));
                    args.push(layer.activation.as_str().into());
                }
                args.extend([
                    model.nn.optimizer.as_str().into(),
                    Arg::Float(model.nn.lr),
                    int(model.nn.mini_batch),
                    int(model.nn.epochs),
                ]);
            }
            ModelKind::RandomForest => args.extend([
                int(model.rf.n_estimators),
                model.rf.max_features.as_str().into(),
                int(model.rf.max_depth),
                int(model.rf.min_samples_split),
            ]),
            ModelKind::SupportVectorMachine => args.extend([
                model.svm.kernel.as_str().into(),
                Arg::Float(model.svm.c),
                Arg::Float(model.svm.gamma),
            ]),
            ModelKind::KNearestNeighbors => args.extend([
                int(model.knn.n_neighbors),
                model.knn.weights.as_str().into(),
                model.knn.algorithm.as_str().into(),
                model.knn.metric.as_str().into(),
            ]),
        }
        args
    }

    fn adapt_layer_param(&self, layer: LayerType, param: f64) -> Arg {
        match layer {
            LayerType::Dense => int(param),
            LayerType::Dropout => Arg::Float(param),
            LayerType::BatchNorm => Arg::Int(0),
        }
    }

    // -------------------------------------------------------------------------
    // Inbound
    // -------------------------------------------------------------------------

    fn apply_preprocess(&self, output: PreprocessOutput, store: &mut ConfigStore) {
        log::debug!(
            "preprocessed {} column(s) x {} row(s), {} transform(s)",
            output.columns.len(),
            output.rows.len(),
            output.transforms.len()
        );
        store.set_problem(Problem {
            kind: output.problem,
            cardinality: output.cardinality,
        });
        store.set_preprocess_result(PreprocessResult {
            columns: output.columns,
            rows: output.rows,
            transforms: output.transforms,
        });
    }

    fn adapt_training(&self, model: ModelKind, output: TrainingOutput) -> TrainingResult {
        match output {
            TrainingOutput::NeuralNetwork {
                val_losses,
                val_metrics,
                test_metrics,
                predictions,
            } => TrainingResult {
                model,
                val_losses,
                val_metrics,
                test_metrics,
                predictions,
            },
            TrainingOutput::Estimator {
                test_metrics,
                predictions,
            } => TrainingResult {
                model,
                val_losses: Vec::new(),
                val_metrics: Vec::new(),
                test_metrics,
                predictions,
            },
        }
    }

    fn apply_optimum(
        &self,
        model: ModelKind,
        arg: Value,
        store: &mut ConfigStore,
    ) -> serde_json::Result<()> {
        match model {
            ModelKind::NeuralNetwork => {
                let optimum = NnOptimum::from_arg(arg)?;
                store.set_layers(self.adapt_nn_layers(&optimum, store.model().layers));
                store.update_nn(|nn| {
                    nn.optimizer = optimum.optimizer;
                    nn.lr = optimum.lr;
                    nn.mini_batch = optimum.mini_batch;
                });
            }
            ModelKind::RandomForest => {
                let optimum: RfOptimum = serde_json::from_value(arg)?;
                store.set_rf(RfParams {
                    n_estimators: optimum.n_estimators,
                    max_features: optimum.max_features.unwrap_or(MaxFeatures::All),
                    max_depth: optimum.max_depth.unwrap_or(UNLIMITED_DEPTH),
                    min_samples_split: optimum.min_samples_split,
                });
            }
            ModelKind::SupportVectorMachine => {
                let optimum: SvmOptimum = serde_json::from_value(arg)?;
                let gamma = match optimum.gamma {
                    GammaOptimum::Value(gamma) => gamma,
                    GammaOptimum::Named(_) => AUTO_GAMMA,
                };
                store.set_svm(SvmParams {
                    kernel: optimum.kernel,
                    c: optimum.c,
                    gamma,
                });
            }
            ModelKind::KNearestNeighbors => {
                let optimum: KnnOptimum = serde_json::from_value(arg)?;
                store.set_knn(KnnParams {
                    n_neighbors: optimum.n_neighbors,
                    weights: optimum.weights,
                    algorithm: optimum.algorithm,
                    metric: optimum.metric,
                });
            }
        }
        log::info!("applied optimized {model} settings");
        Ok(())
    }

    /// Layers from `last` onwards (1-based) are terminal. Dropout rates arrive
    /// as percentages.
    fn adapt_nn_layers(&self, optimum: &NnOptimum, current: LayerStack) -> LayerStack {
        let mut layers = *current.layers();
        for (idx, (slot, proposed)) in layers.iter_mut().zip(&optimum.layers).enumerate() {
            let param = match registry::layer_param_bounds(proposed.layer) {
                Some(bounds) if proposed.layer == LayerType::Dropout => {
                    bounds.clamp(proposed.param / 100.0)
                }
                Some(bounds) => bounds.round(bounds.clamp(proposed.param)),
                None => 0.0,
            };

            slot.terminal = idx + 1 >= optimum.last;
            slot.layer = proposed.layer;
            slot.param = param;
            slot.activation = proposed.activation;
        }
        LayerStack::new(layers)
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

fn int(value: f64) -> Arg {
    Arg::Int(value.round() as i64)
}
