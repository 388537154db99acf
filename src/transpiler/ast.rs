/// Byte range of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A syntax tree node. `text` is the verbatim source text covered by `span`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
    pub span: Span,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    SourceFile,
    Import,
    ClassDeclaration {
        name: Option<String>,
    },
    /// Children: decorators, then the initializer if present.
    PropertyDeclaration {
        name: String,
        modifiers: Vec<String>,
        type_annotation: Option<String>,
    },
    /// Children: decorators, parameters, then the body block.
    MethodDeclaration {
        name: String,
        modifiers: Vec<String>,
        return_type: Option<String>,
    },
    /// Children: parameters, then the body block.
    Constructor,
    FunctionDeclaration {
        name: String,
        return_type: Option<String>,
    },
    /// Children: the default value if present.
    Parameter {
        name: String,
        type_annotation: Option<String>,
    },
    /// Children: call arguments, if any.
    Decorator {
        name: String,
    },
    Block,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    WhileStatement,
    /// Children: the loop binding or initializer, loop expressions, then the body.
    ForStatement,
    VariableStatement {
        name: String,
        type_annotation: Option<String>,
    },
    ExpressionStatement,
    EmptyStatement,
    /// Children: left operand, right operand.
    BinaryExpression {
        operator: BinaryOperator,
    },
    PrefixUnary {
        operator: String,
    },
    PostfixUnary {
        operator: String,
    },
    /// `expr as T`. Children: the expression.
    TypeAssertion {
        type_annotation: String,
    },
    /// Children: condition, consequent, alternate.
    ConditionalExpression,
    /// Children: the constructed expression, including its call arguments.
    NewExpression,
    /// Children: parameters, then the body block or expression.
    ArrowFunction,
    /// Children: the base expression.
    PropertyAccess {
        name: String,
    },
    /// Children: the callee, then the arguments.
    CallExpression,
    /// Children: the base expression, then the index.
    ElementAccess,
    Parenthesized,
    ArrayLiteral,
    ObjectLiteral,
    /// Children: the value if present.
    ObjectProperty {
        name: String,
    },
    ThisKeyword,
    Identifier {
        name: String,
    },
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    Nullish,
    Or,
    And,
    StrictEq,
    StrictNotEq,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    InstanceOf,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Assign => "=",
            BinaryOperator::AddAssign => "+=",
            BinaryOperator::SubAssign => "-=",
            BinaryOperator::MulAssign => "*=",
            BinaryOperator::DivAssign => "/=",
            BinaryOperator::ModAssign => "%=",
            BinaryOperator::Nullish => "??",
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::InstanceOf => "instanceof",
            BinaryOperator::In => "in",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-order visitor over a syntax tree.
pub trait Visitor {
    fn visit(&mut self, node: &Node);
}

impl Node {
    /// Visits this node and every descendant, depth first, parents before children.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit(self);
        for child in &self.children {
            child.accept(visitor);
        }
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub fn is_class_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::ClassDeclaration { .. })
    }

    pub fn is_property_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::PropertyDeclaration { .. })
    }

    pub fn is_method_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::MethodDeclaration { .. })
    }

    pub fn is_return_statement(&self) -> bool {
        matches!(self.kind, NodeKind::ReturnStatement)
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block)
    }

    /// Name of the member when this node is `this.<name>`.
    pub fn as_instance_member(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::PropertyAccess { name } => match self.children.first() {
                Some(base) if base.kind == NodeKind::ThisKeyword => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Operator and operands when this node is a binary expression.
    pub fn as_binary(&self) -> Option<(BinaryOperator, &Node, &Node)> {
        match (&self.kind, self.children.as_slice()) {
            (NodeKind::BinaryExpression { operator }, [left, right]) => Some((*operator, left, right)),
            _ => None,
        }
    }

    pub fn decorator_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match &child.kind {
            NodeKind::Decorator { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
