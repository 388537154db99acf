pub mod analyzer;
pub mod ast;
pub mod converter;
pub mod model;
pub mod synthesizer;
pub mod types;

use anyhow::{Context, Result};
use ast::Node;
use converter::ModelBuilder;
use model::ContractModel;
use synthesizer::EmptyAccessPolicy;
use types::TypeMap;

#[derive(Debug, Clone, Default)]
pub struct TranspileOptions {
    pub types: TypeMap,
    pub policy: EmptyAccessPolicy,
}

impl TranspileOptions {
    pub fn strict() -> Self {
        TranspileOptions {
            policy: EmptyAccessPolicy::Reject,
            ..Self::default()
        }
    }
}

pub fn convert(tree: &Node, options: &TranspileOptions) -> Result<ContractModel> {
    let contract = ModelBuilder::new(&options.types, options.policy).build(tree)?;
    Ok(contract)
}

/// Parses `source`, builds the contract model and renders it as Cairo.
pub fn transpile(source: &str, options: &TranspileOptions) -> Result<String> {
    let tree = crate::parser::parse(source)?;
    let contract = convert(&tree, options).with_context(|| "Failed to build contract model")?;
    Ok(crate::generator::generate(&contract))
}
