mod adapter;
pub mod datasets;
mod env;
pub mod json;
pub mod model;
pub mod registry;

pub use adapter::Adapter;
pub use env::{ClientConfig, WEBAPI_URL};
pub use model::{
    KnnParams, LayerSpec, LayerStack, MAX_LAYERS, ModelConfig, NnParams, RfParams, SvmParams,
};
