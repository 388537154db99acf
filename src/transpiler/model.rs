/// Contract name used when the class declaration has no name.
pub const ANONYMOUS_CONTRACT_NAME: &str = "Contract";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractModel {
    pub name: String,
    pub storage: Vec<StorageField>,
    pub functions: Vec<FunctionModel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageField {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionModel {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: String,
    pub classification: Classification,
    pub visibility: Visibility,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    View,
    Mutating,
}

/// Recorded from the source modifiers. Not differentiated in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    External,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Read { field: String },
    Write { field: String, expr: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Assign,
    AddAssign,
    SubAssign,
}

/// An assignment to an instance field found in a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMutation {
    pub field: String,
    pub kind: MutationKind,
    pub expr: String,
}
