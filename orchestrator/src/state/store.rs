use comms::{
    payload::Row,
    specs::{DatasetSelection, ModelKind},
};

use super::results::{PreprocessResult, Problem, Results, TrainingResult};
use crate::{
    configs::{
        datasets,
        model::{KnnParams, LayerStack, ModelConfig, NnParams, RfParams, SvmParams},
    },
    error::StoreError,
};

/// Dataset level state shared by every model family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonConfig {
    pub dataset: DatasetSelection,
    /// Raw rows of the last import.
    pub rows: Vec<Row>,
    pub target: Option<String>,
    pub problem: Problem,
}

/// The single configuration value of a playground session.
///
/// Every edit goes through a setter so the cascades below always hold:
/// a new dataset clears everything derived from it, a new target clears the
/// results, and a hyperparameter group is always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    common: CommonConfig,
    model: ModelConfig,
    results: Results,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common(&self) -> &CommonConfig {
        &self.common
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Selects a dataset. A different value drops the rows, the target, the
    /// problem and every result.
    pub fn set_dataset(&mut self, dataset: DatasetSelection) {
        if self.common.dataset == dataset {
            return;
        }

        log::debug!("dataset {} -> {dataset}, clearing derived state", self.common.dataset);
        self.common = CommonConfig {
            dataset,
            ..CommonConfig::default()
        };
        self.results = Results::default();
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.common.rows = rows;
    }

    /// Selects the column to predict. A different value drops every result.
    ///
    /// # Errors
    /// Returns `StoreError::UnknownTarget` if the column cannot be a target of
    /// the selected dataset.
    pub fn set_target(&mut self, column: &str) -> Result<(), StoreError> {
        let dataset = self.common.dataset;
        if !datasets::is_target_candidate(dataset, column) {
            return Err(StoreError::UnknownTarget {
                dataset,
                column: column.to_string(),
            });
        }

        if self.common.target.as_deref() != Some(column) {
            log::debug!("target -> {column}, clearing results");
            self.common.target = Some(column.to_string());
            self.results = Results::default();
        }
        Ok(())
    }

    pub fn set_problem(&mut self, problem: Problem) {
        self.common.problem = problem;
    }

    pub fn set_model_kind(&mut self, kind: ModelKind) {
        self.model.kind = kind;
    }

    pub fn set_layers(&mut self, layers: LayerStack) {
        self.model.layers = layers;
    }

    pub fn set_nn(&mut self, nn: NnParams) {
        self.model.nn = nn;
    }

    pub fn set_rf(&mut self, rf: RfParams) {
        self.model.rf = rf;
    }

    pub fn set_svm(&mut self, svm: SvmParams) {
        self.model.svm = svm;
    }

    pub fn set_knn(&mut self, knn: KnnParams) {
        self.model.knn = knn;
    }

    /// Replaces the whole model configuration, hyperparameter groups included.
    pub fn set_model(&mut self, model: ModelConfig) {
        self.model = model;
    }

    /// Edits a copy of the network settings and stores it back.
    pub fn update_nn(&mut self, f: impl FnOnce(&mut NnParams)) {
        let mut nn = self.model.nn;
        f(&mut nn);
        self.set_nn(nn);
    }

    pub fn update_rf(&mut self, f: impl FnOnce(&mut RfParams)) {
        let mut rf = self.model.rf;
        f(&mut rf);
        self.set_rf(rf);
    }

    pub fn update_svm(&mut self, f: impl FnOnce(&mut SvmParams)) {
        let mut svm = self.model.svm;
        f(&mut svm);
        self.set_svm(svm);
    }

    pub fn update_knn(&mut self, f: impl FnOnce(&mut KnnParams)) {
        let mut knn = self.model.knn;
        f(&mut knn);
        self.set_knn(knn);
    }

    pub fn set_preprocess_result(&mut self, result: PreprocessResult) {
        self.results.preprocess = Some(result);
    }

    pub fn set_training_result(&mut self, result: TrainingResult) {
        self.results.training = Some(result);
    }

    pub fn clear_training_result(&mut self) {
        self.results.training = None;
    }
}
