//! Option sets shared by both ends of the wire.

pub mod dataset;
pub mod model;

pub use dataset::{DatasetSelection, ProblemKind};
pub use model::{
    Activation, Algorithm, Kernel, LayerType, MaxFeatures, Metric, ModelKind, Optimizer, Weights,
};
