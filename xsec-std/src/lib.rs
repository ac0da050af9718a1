//! xsec Standard Library
//!
//! Section domain types, the elastic analysis engine and the Functions
//! that expose them as components.

pub mod domain;
pub mod engine;
pub mod functions;

use engine::{ElasticEngine, SharedEngine};
use xsec_function::FunctionRegistry;

/// Load the standard Functions into a registry, analysing with `engine`
pub fn load_standard_library(registry: FunctionRegistry, engine: SharedEngine) -> FunctionRegistry {
    let for_load = engine.clone();
    let for_deformation = engine;
    registry
        .with_function(|| Box::new(functions::CreateMaterial::new()))
        .with_function(|| Box::new(functions::CreateRectangularSection::new()))
        .with_function(|| Box::new(functions::SectionCorners::new()))
        .with_function(|| Box::new(functions::CreateLoad::new()))
        .with_function(|| Box::new(functions::CreateDeformation::new()))
        .with_function(move || Box::new(functions::SolveLoad::new(for_load.clone())))
        .with_function(move || Box::new(functions::SolveDeformation::new(for_deformation.clone())))
}

/// Create registry with standard library and the elastic engine
pub fn standard_registry() -> FunctionRegistry {
    load_standard_library(FunctionRegistry::new(), ElasticEngine::shared())
}
