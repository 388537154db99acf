use super::analyzer;
use super::ast::{Node, NodeKind};
use super::model::*;
use super::synthesizer::{self, EmptyAccessPolicy};
use super::types::TypeMap;
use crate::error::TranspileError;
use log::{debug, info, warn};

/// Decorator that marks a method as read-only.
const VIEW_DECORATOR: &str = "view";

/// Builds a [`ContractModel`] from the first class declaration in a syntax tree.
pub struct ModelBuilder<'a> {
    types: &'a TypeMap,
    policy: EmptyAccessPolicy,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(types: &'a TypeMap, policy: EmptyAccessPolicy) -> Self {
        ModelBuilder { types, policy }
    }

    pub fn build(&self, tree: &Node) -> Result<ContractModel, TranspileError> {
        let Some(class) = tree.descendants().find(|node| node.is_class_declaration()) else {
            info!("No class declaration found, producing an empty contract");
            return Ok(ContractModel::default());
        };

        let name = match &class.kind {
            NodeKind::ClassDeclaration { name: Some(name) } => name.clone(),
            _ => ANONYMOUS_CONTRACT_NAME.to_string(),
        };
        debug!("Building contract model for {}", name);

        let mut contract = ContractModel {
            name,
            storage: Vec::new(),
            functions: Vec::new(),
        };

        for member in &class.children {
            match &member.kind {
                NodeKind::PropertyDeclaration {
                    name,
                    type_annotation,
                    ..
                } => {
                    if contract.storage.iter().any(|field| &field.name == name) {
                        warn!("Storage field {} is declared more than once", name);
                    }
                    contract.storage.push(StorageField {
                        name: name.clone(),
                        ty: self.types.resolve(type_annotation.as_deref()).to_string(),
                    });
                }
                NodeKind::MethodDeclaration {
                    name,
                    modifiers,
                    return_type,
                } => {
                    let function =
                        self.build_function(member, name, modifiers, return_type.as_deref())?;
                    contract.functions.push(function);
                }
                _ => {}
            }
        }

        Ok(contract)
    }

    fn build_function(
        &self,
        method: &Node,
        name: &str,
        modifiers: &[String],
        return_type: Option<&str>,
    ) -> Result<FunctionModel, TranspileError> {
        let classification = if method.decorator_names().any(|d| d == VIEW_DECORATOR) {
            Classification::View
        } else {
            Classification::Mutating
        };

        let visibility = if modifiers.iter().any(|m| m == "private" || m == "protected") {
            Visibility::Internal
        } else {
            Visibility::External
        };

        let params = method
            .children
            .iter()
            .filter_map(|child| match &child.kind {
                NodeKind::Parameter {
                    name,
                    type_annotation,
                } => Some(Parameter {
                    name: name.clone(),
                    ty: self.types.resolve(type_annotation.as_deref()).to_string(),
                }),
                _ => None,
            })
            .collect();

        let analysis = method
            .children
            .iter()
            .find(|child| child.is_block())
            .map(analyzer::analyze)
            .unwrap_or_default();
        debug!("Function {} ({:?}): {:?}", name, classification, analysis);

        let instructions = synthesizer::synthesize(name, classification, &analysis, self.policy)?;

        Ok(FunctionModel {
            name: name.to_string(),
            params,
            return_type: self.types.resolve(return_type).to_string(),
            classification,
            visibility,
            instructions,
        })
    }
}
