use crate::transpiler::model::{Classification, ContractModel, FunctionModel, Instruction};

const INDENT: &str = "    ";

pub fn generate(contract: &ContractModel) -> String {
    let mut output = String::new();

    output.push_str(&generate_interface(contract));
    output.push('\n');

    output.push_str("#[starknet::contract]\n");
    output.push_str(&format!("mod {} {{\n", contract.name));
    output.push_str(&generate_storage(contract));
    output.push('\n');
    output.push_str(&generate_impl(contract));
    output.push_str("}\n");

    output
}

fn interface_name(contract: &ContractModel) -> String {
    format!("I{}", contract.name)
}

fn generate_interface(contract: &ContractModel) -> String {
    let mut output = String::new();

    output.push_str("#[starknet::interface]\n");
    output.push_str(&format!("trait {}<TContractState> {{\n", interface_name(contract)));
    for func in &contract.functions {
        output.push_str(INDENT);
        output.push_str(&signature(func, "TContractState"));
        output.push_str(";\n");
    }
    output.push_str("}\n");

    output
}

fn generate_storage(contract: &ContractModel) -> String {
    let fields: Vec<String> = contract
        .storage
        .iter()
        .map(|field| format!("{}{}{}: {}", INDENT, INDENT, field.name, field.ty))
        .collect();

    let mut output = String::new();
    output.push_str(&format!("{}#[storage]\n", INDENT));
    output.push_str(&format!("{}struct Storage {{\n", INDENT));
    if !fields.is_empty() {
        output.push_str(&fields.join(",\n"));
        output.push('\n');
    }
    output.push_str(&format!("{}}}\n", INDENT));
    output
}

fn generate_impl(contract: &ContractModel) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}#[abi(embed_v0)]\n", INDENT));
    output.push_str(&format!(
        "{}impl {}Impl of super::{}<ContractState> {{\n",
        INDENT,
        contract.name,
        interface_name(contract)
    ));

    let bodies: Vec<String> = contract.functions.iter().map(generate_function).collect();
    output.push_str(&bodies.join("\n"));

    output.push_str(&format!("{}}}\n", INDENT));
    output
}

fn generate_function(func: &FunctionModel) -> String {
    let indent = INDENT.repeat(2);
    let body_indent = INDENT.repeat(3);

    let mut output = format!("{}{} {{\n", indent, signature(func, "ContractState"));
    for instruction in &func.instructions {
        output.push_str(&body_indent);
        output.push_str(&generate_instruction(instruction));
        output.push('\n');
    }
    output.push_str(&format!("{}}}\n", indent));
    output
}

fn signature(func: &FunctionModel, state_type: &str) -> String {
    let state_param = match func.classification {
        Classification::View => format!("self: @{}", state_type),
        Classification::Mutating => format!("ref self: {}", state_type),
    };

    let mut params = vec![state_param];
    params.extend(func.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));

    format!("fn {}({}) -> {}", func.name, params.join(", "), func.return_type)
}

fn generate_instruction(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Read { field } => format!("self.{}.read()", field),
        Instruction::Write { field, expr } => format!("self.{}.write({});", field, expr),
    }
}
