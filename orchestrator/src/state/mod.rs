mod results;
mod store;

pub use results::{
    MetricReport, OutputLayer, PreprocessResult, Problem, Results, TrainingResult,
};
pub use store::{CommonConfig, ConfigStore};
