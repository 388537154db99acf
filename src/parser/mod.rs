use crate::transpiler::ast::{BinaryOperator, Node, NodeKind, Span};
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/typescript.pest"]
pub struct TypeScriptParser;

/// Parses source text into a syntax tree rooted at a `SourceFile` node.
pub fn parse(source: &str) -> Result<Node> {
    let mut pairs = TypeScriptParser::parse(Rule::source_file, source)
        .with_context(|| "Failed to parse source, syntax error")?;

    let root = pairs
        .next()
        .ok_or_else(|| anyhow!("Invalid source structure"))?;

    TreeBuilder::new(source).build_source_file(root)
}

struct TreeBuilder<'i> {
    source: &'i str,
    pratt: PrattParser<Rule>,
}

impl<'i> TreeBuilder<'i> {
    fn new(source: &'i str) -> Self {
        let pratt = PrattParser::new()
            .op(Op::infix(Rule::assign, Assoc::Right)
                | Op::infix(Rule::add_assign, Assoc::Right)
                | Op::infix(Rule::sub_assign, Assoc::Right)
                | Op::infix(Rule::mul_assign, Assoc::Right)
                | Op::infix(Rule::div_assign, Assoc::Right)
                | Op::infix(Rule::mod_assign, Assoc::Right))
            .op(Op::infix(Rule::conditional, Assoc::Right))
            .op(Op::infix(Rule::nullish, Assoc::Left))
            .op(Op::infix(Rule::or, Assoc::Left))
            .op(Op::infix(Rule::and, Assoc::Left))
            .op(Op::infix(Rule::strict_eq, Assoc::Left)
                | Op::infix(Rule::strict_not_eq, Assoc::Left)
                | Op::infix(Rule::eq, Assoc::Left)
                | Op::infix(Rule::not_eq, Assoc::Left))
            .op(Op::infix(Rule::lt, Assoc::Left)
                | Op::infix(Rule::lt_eq, Assoc::Left)
                | Op::infix(Rule::gt, Assoc::Left)
                | Op::infix(Rule::gt_eq, Assoc::Left)
                | Op::infix(Rule::instanceof, Assoc::Left)
                | Op::infix(Rule::in_op, Assoc::Left))
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left)
                | Op::infix(Rule::div, Assoc::Left)
                | Op::infix(Rule::modulo, Assoc::Left))
            .op(Op::prefix(Rule::unary_operator))
            .op(Op::postfix(Rule::update_operator) | Op::postfix(Rule::type_assertion));

        TreeBuilder { source, pratt }
    }

    fn node(&self, kind: NodeKind, start: usize, end: usize, children: Vec<Node>) -> Node {
        Node {
            kind,
            text: self.source[start..end].to_string(),
            span: Span { start, end },
            children,
        }
    }

    fn spanned(&self, kind: NodeKind, span: pest::Span<'_>, children: Vec<Node>) -> Node {
        self.node(kind, span.start(), span.end(), children)
    }

    fn build_source_file(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut children = Vec::new();
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::EOI => {}
                Rule::import_declaration => {
                    children.push(self.spanned(NodeKind::Import, item.as_span(), Vec::new()));
                }
                _ => children.push(self.build_statement(item)?),
            }
        }
        Ok(self.spanned(NodeKind::SourceFile, span, children))
    }

    fn build_statement(&self, pair: Pair<Rule>) -> Result<Node> {
        trace!("Building statement: {:?}", pair.as_rule());
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::class_declaration => self.build_class(pair),
            Rule::function_declaration => self.build_function(pair),
            Rule::block => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::Block, span, children))
            }
            Rule::return_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::ReturnStatement, span, children))
            }
            Rule::throw_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::ThrowStatement, span, children))
            }
            Rule::if_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::IfStatement, span, children))
            }
            Rule::while_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::WhileStatement, span, children))
            }
            Rule::for_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::ForStatement, span, children))
            }
            Rule::expression_statement => {
                let children = self.build_statements(pair.into_inner())?;
                Ok(self.spanned(NodeKind::ExpressionStatement, span, children))
            }
            Rule::empty_statement => Ok(self.spanned(NodeKind::EmptyStatement, span, Vec::new())),
            Rule::variable_statement | Rule::for_binding => {
                let mut name = String::new();
                let mut type_annotation = None;
                let mut children = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::identifier => name = item.as_str().to_string(),
                        Rule::type_annotation => type_annotation = Some(item.as_str().to_string()),
                        Rule::expression => children.push(self.build_expression(item)?),
                        _ => {}
                    }
                }
                Ok(self.spanned(
                    NodeKind::VariableStatement {
                        name,
                        type_annotation,
                    },
                    span,
                    children,
                ))
            }
            Rule::expression => self.build_expression(pair),
            rule => Err(anyhow!("Unexpected statement type: {:?}", rule)),
        }
    }

    /// Builds the statement and expression children of a compound statement,
    /// skipping keyword tokens.
    fn build_statements(&self, pairs: Pairs<Rule>) -> Result<Vec<Node>> {
        pairs
            .filter(|pair| !is_keyword_token(pair.as_rule()))
            .map(|pair| self.build_statement(pair))
            .collect()
    }

    fn build_class(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = None;
        let mut members = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => name = Some(item.as_str().to_string()),
                Rule::property_declaration => members.push(self.build_property(item)?),
                Rule::method_declaration => members.push(self.build_method(item)?),
                Rule::constructor_declaration => members.push(self.build_constructor(item)?),
                _ => {}
            }
        }

        debug!(
            "Found class declaration {} with {} members",
            name.as_deref().unwrap_or("<anonymous>"),
            members.len()
        );
        Ok(self.spanned(NodeKind::ClassDeclaration { name }, span, members))
    }

    fn build_property(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = String::new();
        let mut modifiers = Vec::new();
        let mut type_annotation = None;
        let mut children = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::decorator => children.push(self.build_decorator(item)?),
                Rule::modifier => modifiers.push(item.as_str().to_string()),
                Rule::identifier => name = item.as_str().to_string(),
                Rule::type_annotation => type_annotation = Some(item.as_str().to_string()),
                Rule::expression => children.push(self.build_expression(item)?),
                _ => {}
            }
        }

        debug!("Found property declaration {}", name);
        Ok(self.spanned(
            NodeKind::PropertyDeclaration {
                name,
                modifiers,
                type_annotation,
            },
            span,
            children,
        ))
    }

    fn build_method(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = String::new();
        let mut modifiers = Vec::new();
        let mut return_type = None;
        let mut children = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::decorator => children.push(self.build_decorator(item)?),
                Rule::modifier => modifiers.push(item.as_str().to_string()),
                Rule::identifier => name = item.as_str().to_string(),
                Rule::parameter => children.push(self.build_parameter(item)?),
                Rule::type_annotation => return_type = Some(item.as_str().to_string()),
                Rule::block => children.push(self.build_statement(item)?),
                _ => {}
            }
        }

        debug!("Found method declaration {}", name);
        Ok(self.spanned(
            NodeKind::MethodDeclaration {
                name,
                modifiers,
                return_type,
            },
            span,
            children,
        ))
    }

    fn build_constructor(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut children = Vec::new();
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::parameter => children.push(self.build_parameter(item)?),
                Rule::block => children.push(self.build_statement(item)?),
                _ => {}
            }
        }
        Ok(self.spanned(NodeKind::Constructor, span, children))
    }

    fn build_function(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = String::new();
        let mut return_type = None;
        let mut children = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => name = item.as_str().to_string(),
                Rule::parameter => children.push(self.build_parameter(item)?),
                Rule::type_annotation => return_type = Some(item.as_str().to_string()),
                Rule::block => children.push(self.build_statement(item)?),
                _ => {}
            }
        }

        Ok(self.spanned(
            NodeKind::FunctionDeclaration { name, return_type },
            span,
            children,
        ))
    }

    fn build_parameter(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = String::new();
        let mut type_annotation = None;
        let mut children = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => name = item.as_str().to_string(),
                Rule::type_annotation => type_annotation = Some(item.as_str().to_string()),
                Rule::expression => children.push(self.build_expression(item)?),
                _ => {}
            }
        }

        Ok(self.spanned(
            NodeKind::Parameter {
                name,
                type_annotation,
            },
            span,
            children,
        ))
    }

    fn build_decorator(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let name = inner
            .next()
            .ok_or_else(|| anyhow!("Decorator name not found"))?
            .as_str()
            .to_string();
        let args = inner
            .map(|arg| self.build_expression(arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.spanned(NodeKind::Decorator { name }, span, args))
    }

    fn build_expression(&self, pair: Pair<Rule>) -> Result<Node> {
        self.pratt
            .map_primary(|primary| self.build_postfix_expression(primary))
            .map_prefix(|op, operand| {
                let operand = operand?;
                let start = op.as_span().start();
                let end = operand.span.end;
                let kind = NodeKind::PrefixUnary {
                    operator: op.as_str().to_string(),
                };
                Ok(self.node(kind, start, end, vec![operand]))
            })
            .map_postfix(|operand, op| {
                let operand = operand?;
                let start = operand.span.start;
                let end = op.as_span().end();
                let kind = match op.as_rule() {
                    Rule::type_assertion => NodeKind::TypeAssertion {
                        type_annotation: op
                            .into_inner()
                            .find(|item| item.as_rule() == Rule::type_annotation)
                            .ok_or_else(|| anyhow!("Type assertion without a type"))?
                            .as_str()
                            .to_string(),
                    },
                    _ => NodeKind::PostfixUnary {
                        operator: op.as_str().to_string(),
                    },
                };
                Ok(self.node(kind, start, end, vec![operand]))
            })
            .map_infix(|left, op, right| {
                let (left, right) = (left?, right?);
                let (start, end) = (left.span.start, right.span.end);
                if op.as_rule() == Rule::conditional {
                    let consequent = op
                        .into_inner()
                        .next()
                        .ok_or_else(|| anyhow!("Conditional without a consequent"))?;
                    let consequent = self.build_expression(consequent)?;
                    return Ok(self.node(
                        NodeKind::ConditionalExpression,
                        start,
                        end,
                        vec![left, consequent, right],
                    ));
                }
                let operator = binary_operator(op.as_rule())?;
                Ok(self.node(
                    NodeKind::BinaryExpression { operator },
                    start,
                    end,
                    vec![left, right],
                ))
            })
            .parse(pair.into_inner())
    }

    fn build_postfix_expression(&self, pair: Pair<Rule>) -> Result<Node> {
        let start = pair.as_span().start();
        let mut inner = pair.into_inner();
        let primary = inner
            .next()
            .ok_or_else(|| anyhow!("Expression must have a primary term"))?;
        let mut node = self.build_primary(primary)?;

        for suffix in inner {
            let end = suffix.as_span().end();
            node = match suffix.as_rule() {
                Rule::member_suffix => {
                    let name = suffix
                        .into_inner()
                        .next()
                        .ok_or_else(|| anyhow!("Member name not found"))?
                        .as_str()
                        .to_string();
                    self.node(NodeKind::PropertyAccess { name }, start, end, vec![node])
                }
                Rule::call_suffix | Rule::index_suffix => {
                    let kind = if suffix.as_rule() == Rule::call_suffix {
                        NodeKind::CallExpression
                    } else {
                        NodeKind::ElementAccess
                    };
                    let mut children = vec![node];
                    for arg in suffix.into_inner() {
                        children.push(self.build_expression(arg)?);
                    }
                    self.node(kind, start, end, children)
                }
                rule => return Err(anyhow!("Unexpected expression suffix: {:?}", rule)),
            };
        }

        Ok(node)
    }

    fn build_primary(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::this_keyword => Ok(self.spanned(NodeKind::ThisKeyword, span, Vec::new())),
            Rule::identifier => {
                let name = pair.as_str().to_string();
                Ok(self.spanned(NodeKind::Identifier { name }, span, Vec::new()))
            }
            Rule::literal => Ok(self.spanned(NodeKind::Literal, span, Vec::new())),
            Rule::new_expression => {
                let target = pair
                    .into_inner()
                    .find(|item| item.as_rule() == Rule::postfix_expression)
                    .ok_or_else(|| anyhow!("Nothing to construct after new"))?;
                let target = self.build_postfix_expression(target)?;
                Ok(self.spanned(NodeKind::NewExpression, span, vec![target]))
            }
            Rule::arrow_function => {
                let mut children = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::identifier => {
                            let kind = NodeKind::Parameter {
                                name: item.as_str().to_string(),
                                type_annotation: None,
                            };
                            children.push(self.spanned(kind, item.as_span(), Vec::new()));
                        }
                        Rule::arrow_parameters => {
                            for param in item.into_inner() {
                                children.push(self.build_parameter(param)?);
                            }
                        }
                        Rule::block => children.push(self.build_statement(item)?),
                        Rule::expression => children.push(self.build_expression(item)?),
                        _ => {}
                    }
                }
                Ok(self.spanned(NodeKind::ArrowFunction, span, children))
            }
            Rule::object_literal => {
                let children = pair
                    .into_inner()
                    .map(|property| self.build_object_property(property))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.spanned(NodeKind::ObjectLiteral, span, children))
            }
            Rule::parenthesized | Rule::array_literal => {
                let kind = if pair.as_rule() == Rule::parenthesized {
                    NodeKind::Parenthesized
                } else {
                    NodeKind::ArrayLiteral
                };
                let children = pair
                    .into_inner()
                    .map(|expr| self.build_expression(expr))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.spanned(kind, span, children))
            }
            rule => Err(anyhow!("Unexpected term type: {:?}", rule)),
        }
    }

    fn build_object_property(&self, pair: Pair<Rule>) -> Result<Node> {
        let span = pair.as_span();
        let mut name = String::new();
        let mut children = Vec::new();
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::property_name | Rule::string => name = item.as_str().to_string(),
                Rule::expression => children.push(self.build_expression(item)?),
                _ => {}
            }
        }
        Ok(self.spanned(NodeKind::ObjectProperty { name }, span, children))
    }
}

fn is_keyword_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::return_kw
            | Rule::throw_kw
            | Rule::if_kw
            | Rule::else_kw
            | Rule::while_kw
            | Rule::for_kw
            | Rule::of_kw
            | Rule::in_op
            | Rule::declaration_kw
    )
}

fn binary_operator(rule: Rule) -> Result<BinaryOperator> {
    let operator = match rule {
        Rule::assign => BinaryOperator::Assign,
        Rule::add_assign => BinaryOperator::AddAssign,
        Rule::sub_assign => BinaryOperator::SubAssign,
        Rule::mul_assign => BinaryOperator::MulAssign,
        Rule::div_assign => BinaryOperator::DivAssign,
        Rule::mod_assign => BinaryOperator::ModAssign,
        Rule::or => BinaryOperator::Or,
        Rule::and => BinaryOperator::And,
        Rule::strict_eq => BinaryOperator::StrictEq,
        Rule::strict_not_eq => BinaryOperator::StrictNotEq,
        Rule::eq => BinaryOperator::Eq,
        Rule::not_eq => BinaryOperator::NotEq,
        Rule::lt => BinaryOperator::Lt,
        Rule::lt_eq => BinaryOperator::LtEq,
        Rule::gt => BinaryOperator::Gt,
        Rule::gt_eq => BinaryOperator::GtEq,
        Rule::instanceof => BinaryOperator::InstanceOf,
        Rule::in_op => BinaryOperator::In,
        Rule::nullish => BinaryOperator::Nullish,
        Rule::add => BinaryOperator::Add,
        Rule::sub => BinaryOperator::Sub,
        Rule::mul => BinaryOperator::Mul,
        Rule::div => BinaryOperator::Div,
        Rule::modulo => BinaryOperator::Mod,
        rule => return Err(anyhow!("Unknown binary operator: {:?}", rule)),
    };
    Ok(operator)
}
