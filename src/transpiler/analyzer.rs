use super::ast::{BinaryOperator, Node, Visitor};
use super::model::{MutationKind, StateMutation};
use log::trace;

/// What a method body does with instance state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyAnalysis {
    /// Distinct `this.<field>` names in first-occurrence order.
    pub state_accesses: Vec<String>,
    /// Recognized field assignments in document order, duplicates kept.
    pub mutations: Vec<StateMutation>,
    pub has_return: bool,
}

pub fn analyze(body: &Node) -> BodyAnalysis {
    let mut accesses = StateAccessCollector::default();
    body.accept(&mut accesses);

    let mut mutations = MutationCollector::default();
    body.accept(&mut mutations);

    let has_return = body.descendants().any(Node::is_return_statement);

    BodyAnalysis {
        state_accesses: accesses.fields,
        mutations: mutations.mutations,
        has_return,
    }
}

#[derive(Default)]
struct StateAccessCollector {
    fields: Vec<String>,
}

impl Visitor for StateAccessCollector {
    fn visit(&mut self, node: &Node) {
        if let Some(field) = node.as_instance_member() {
            if !self.fields.iter().any(|seen| seen == field) {
                trace!("state access: {}", field);
                self.fields.push(field.to_string());
            }
        }
    }
}

#[derive(Default)]
struct MutationCollector {
    mutations: Vec<StateMutation>,
}

impl Visitor for MutationCollector {
    fn visit(&mut self, node: &Node) {
        let Some((operator, left, right)) = node.as_binary() else {
            return;
        };
        let Some(field) = left.as_instance_member() else {
            return;
        };

        let (kind, expr) = match operator {
            BinaryOperator::Assign => (MutationKind::Assign, right.text.clone()),
            BinaryOperator::AddAssign => (
                MutationKind::AddAssign,
                format!("self.{}.read() + {}", field, right.text),
            ),
            BinaryOperator::SubAssign => (
                MutationKind::SubAssign,
                format!("self.{}.read() - {}", field, right.text),
            ),
            _ => return,
        };

        trace!("state mutation: {} {} {}", field, operator, right.text);
        self.mutations.push(StateMutation {
            field: field.to_string(),
            kind,
            expr,
        });
    }
}
