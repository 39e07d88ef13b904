use std::fmt;

use comms::{
    payload::{Predictions, Row},
    specs::{ModelKind, ProblemKind},
};

/// Problem derived by the preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    /// Number of output units the network ends with.
    pub cardinality: usize,
}

impl Default for Problem {
    fn default() -> Self {
        Self {
            kind: ProblemKind::Regression,
            cardinality: 1,
        }
    }
}

impl Problem {
    /// Describes the fixed output layer appended after the hidden stack.
    pub fn output_layer(&self) -> OutputLayer {
        OutputLayer {
            kind: self.kind,
            units: self.cardinality,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayer {
    pub kind: ProblemKind,
    pub units: usize,
}

impl fmt::Display for OutputLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.units == 1 { "" } else { "s" };
        write!(f, "{}, {} output node{plural}", self.kind, self.units)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreprocessResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// One human readable line per applied transform.
    pub transforms: Vec<String>,
}

/// Named view over a positional metric list. Missing entries stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricReport {
    pub loss: Option<f64>,
    pub accuracy: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

impl MetricReport {
    /// Reads `[loss, accuracy, precision, recall, f1]`.
    pub fn from_test(metrics: &[f64]) -> Self {
        let at = |i: usize| metrics.get(i).copied();
        Self {
            loss: at(0),
            accuracy: at(1),
            precision: at(2),
            recall: at(3),
            f1: at(4),
        }
    }

    /// Reads `[accuracy, precision, recall, f1]`; validation carries no loss.
    pub fn from_validation(metrics: &[f64]) -> Self {
        let at = |i: usize| metrics.get(i).copied();
        Self {
            loss: None,
            accuracy: at(0),
            precision: at(1),
            recall: at(2),
            f1: at(3),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for MetricReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = [
            ("loss", self.loss),
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("f1", self.f1),
        ];

        let mut first = true;
        for (name, value) in entries {
            let Some(value) = value else { continue };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingResult {
    /// Model family the run was trained with.
    pub model: ModelKind,
    /// Validation loss per epoch, empty for non-network models.
    pub val_losses: Vec<f64>,
    pub val_metrics: Vec<f64>,
    pub test_metrics: Vec<f64>,
    pub predictions: Predictions,
}

impl TrainingResult {
    pub fn best_val_loss(&self) -> Option<f64> {
        self.val_losses.iter().copied().reduce(f64::min)
    }

    pub fn test_report(&self) -> MetricReport {
        MetricReport::from_test(&self.test_metrics)
    }

    pub fn validation_report(&self) -> MetricReport {
        MetricReport::from_validation(&self.val_metrics)
    }

    /// Predicted and true values, paired by sample.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.predictions
            .y_pred
            .iter()
            .copied()
            .zip(self.predictions.y_test.iter().copied())
    }
}

/// Outputs of the last preprocessing and training runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    pub preprocess: Option<PreprocessResult>,
    pub training: Option<TrainingResult>,
}

impl Results {
    pub fn is_empty(&self) -> bool {
        self.preprocess.is_none() && self.training.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(val_losses: Vec<f64>, test_metrics: Vec<f64>) -> TrainingResult {
        TrainingResult {
            model: ModelKind::NeuralNetwork,
            val_losses,
            val_metrics: vec![80.0, 81.0, 79.0, 80.5],
            test_metrics,
            predictions: (vec![1.0, 0.0], vec![1.0, 1.0]).into(),
        }
    }

    #[test]
    fn test_metrics_map_in_order() {
        let report = result(vec![], vec![0.3, 88.0, 90.0, 85.0, 87.0]).test_report();
        assert_eq!(report.loss, Some(0.3));
        assert_eq!(report.accuracy, Some(88.0));
        assert_eq!(report.precision, Some(90.0));
        assert_eq!(report.recall, Some(85.0));
        assert_eq!(report.f1, Some(87.0));
    }

    #[test]
    fn regression_reports_only_loss() {
        let report = result(vec![], vec![12.5]).test_report();
        assert_eq!(report.loss, Some(12.5));
        assert_eq!(report.accuracy, None);
        assert_eq!(report.to_string(), "loss=12.5");
    }

    #[test]
    fn validation_report_has_no_loss() {
        let report = result(vec![], vec![]).validation_report();
        assert_eq!(report.loss, None);
        assert_eq!(report.accuracy, Some(80.0));
        assert_eq!(report.f1, Some(80.5));
    }

    #[test]
    fn best_val_loss_is_the_minimum() {
        assert_eq!(result(vec![0.9, 0.4, 0.6], vec![]).best_val_loss(), Some(0.4));
        assert_eq!(result(vec![], vec![]).best_val_loss(), None);
    }

    #[test]
    fn output_layer_description() {
        assert_eq!(
            Problem::default().output_layer().to_string(),
            "regression, 1 output node"
        );
        let problem = Problem {
            kind: ProblemKind::Classification,
            cardinality: 3,
        };
        assert_eq!(
            problem.output_layer().to_string(),
            "classification, 3 output nodes"
        );
    }
}
