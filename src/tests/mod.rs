use super::error::TranspileError;
use super::generator;
use super::parser;
use super::transpiler::{self, model::*, TranspileOptions};
use anyhow::Result;

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> Result<ContractModel> {
        let tree = parser::parse(source)?;
        transpiler::convert(&tree, &TranspileOptions::default())
    }

    fn read(field: &str) -> Instruction {
        Instruction::Read {
            field: field.to_string(),
        }
    }

    fn write(field: &str, expr: &str) -> Instruction {
        Instruction::Write {
            field: field.to_string(),
            expr: expr.to_string(),
        }
    }

    #[test]
    fn test_no_class_gives_empty_model() -> Result<()> {
        let contract = build(
            r#"
            function helper(x: number): number {
                return x + 1;
            }
            let total = helper(2);
        "#,
        )?;
        assert_eq!(contract, ContractModel::default());
        assert_eq!(contract.name, "");
        Ok(())
    }

    #[test]
    fn test_anonymous_class_gets_placeholder_name() -> Result<()> {
        let contract = build("export default class { count: number; }")?;
        assert_eq!(contract.name, ANONYMOUS_CONTRACT_NAME);
        assert_eq!(contract.storage.len(), 1);
        Ok(())
    }

    #[test]
    fn test_first_class_found_depth_first() -> Result<()> {
        let contract = build(
            r#"
            function factory() {
                class Inner { value: boolean; }
            }
            class Outer { total: number; }
        "#,
        )?;
        assert_eq!(contract.name, "Inner");
        assert_eq!(
            contract.storage,
            vec![StorageField {
                name: "value".to_string(),
                ty: "bool".to_string()
            }]
        );
        Ok(())
    }

    #[test]
    fn test_storage_types_and_order() -> Result<()> {
        let contract = build(
            r#"
            class Ledger {
                count: number;
                open: boolean;
                supply: bigint;
                label: string;
                owner: Address;
                tags: Array<string>;
                untyped = 5;
            }
        "#,
        )?;
        let fields: Vec<(&str, &str)> = contract
            .storage
            .iter()
            .map(|f| (f.name.as_str(), f.ty.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("count", "felt252"),
                ("open", "bool"),
                ("supply", "u256"),
                ("label", "felt252"),
                ("owner", "felt252"),
                ("tags", "felt252"),
                ("untyped", "felt252"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_fields_are_kept() -> Result<()> {
        let contract = build("class Dup { a: number; a: boolean; }")?;
        assert_eq!(contract.storage.len(), 2);
        assert_eq!(contract.storage[1].ty, "bool");
        Ok(())
    }

    #[test]
    fn test_view_getter_scenario() -> Result<()> {
        let contract = build(
            r#"
            class Bank {
                balance: number;

                @view
                getBalance(): number {
                    return this.balance;
                }
            }
        "#,
        )?;
        let func = &contract.functions[0];
        assert_eq!(func.name, "getBalance");
        assert_eq!(func.classification, Classification::View);
        assert_eq!(func.instructions, vec![read("balance")]);

        let code = generator::generate(&contract);
        assert!(code.contains("balance: felt252"));
        assert!(code.contains("fn getBalance(self: @TContractState) -> felt252;"));
        assert!(code.contains(
            "        fn getBalance(self: @ContractState) -> felt252 {\n            self.balance.read()\n        }\n"
        ));
        Ok(())
    }

    #[test]
    fn test_deposit_scenario() -> Result<()> {
        let contract = build(
            r#"
            class Bank {
                balance: number;

                deposit(amount: number): number {
                    this.balance += amount;
                    return this.balance;
                }
            }
        "#,
        )?;
        let func = &contract.functions[0];
        assert_eq!(func.classification, Classification::Mutating);
        assert_eq!(
            func.params,
            vec![Parameter {
                name: "amount".to_string(),
                ty: "felt252".to_string()
            }]
        );
        assert_eq!(
            func.instructions,
            vec![
                write("balance", "self.balance.read() + amount"),
                read("balance")
            ]
        );

        let code = generator::generate(&contract);
        assert!(code.contains("fn deposit(ref self: TContractState, amount: felt252) -> felt252;"));
        assert!(code.contains("self.balance.write(self.balance.read() + amount);\n"));
        Ok(())
    }

    #[test]
    fn test_no_access_no_return_has_no_instructions() -> Result<()> {
        let contract = build(
            r#"
            class Bank {
                balance: number;
                ping(x: number) {
                    let y = x * 2;
                }
            }
        "#,
        )?;
        assert!(contract.functions[0].instructions.is_empty());
        assert_eq!(contract.functions[0].return_type, "felt252");
        Ok(())
    }

    #[test]
    fn test_trailing_read_ignores_what_is_returned() -> Result<()> {
        let contract = build(
            r#"
            class Pool {
                fee: number;
                reserve: number;

                swap(amount: number): boolean {
                    this.fee = amount / 100;
                    this.reserve -= amount;
                    this.reserve = 0;
                    this.fee *= 2;
                    return true;
                }
            }
        "#,
        )?;
        let func = &contract.functions[0];
        assert_eq!(func.return_type, "bool");
        assert_eq!(
            func.instructions,
            vec![
                write("fee", "amount / 100"),
                write("reserve", "self.reserve.read() - amount"),
                write("reserve", "0"),
                read("fee"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_classification_and_visibility() -> Result<()> {
        let contract = build(
            r#"
            class Vault {
                locked: boolean;
                constructor() { this.locked = false; }

                @view()
                isLocked(): boolean { return this.locked; }

                @external
                lock() { this.locked = true; }

                private unlock() { this.locked = false; }
            }
        "#,
        )?;
        let summary: Vec<(&str, Classification, Visibility)> = contract
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f.classification, f.visibility))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("isLocked", Classification::View, Visibility::External),
                ("lock", Classification::Mutating, Visibility::External),
                ("unlock", Classification::Mutating, Visibility::Internal),
            ]
        );

        // Internal functions are emitted exactly like external ones.
        let code = generator::generate(&contract);
        assert!(code.contains("fn unlock(ref self: TContractState) -> felt252;"));
        assert!(code.contains("        fn unlock(ref self: ContractState) -> felt252 {\n            self.locked.write(false);\n        }\n"));
        Ok(())
    }

    #[test]
    fn test_empty_access_lenient_and_strict() -> Result<()> {
        let source = r#"
            class Clock {
                ticks: number;
                @view
                now(): number { return 42; }
            }
        "#;

        let lenient = build(source)?;
        assert!(lenient.functions[0].instructions.is_empty());

        let tree = parser::parse(source)?;
        let err = transpiler::convert(&tree, &TranspileOptions::strict()).unwrap_err();
        match err.downcast_ref::<TranspileError>() {
            Some(TranspileError::EmptyStateAccess { function }) => assert_eq!(function, "now"),
            None => panic!("Expected EmptyStateAccess, got {:?}", err),
        }
        Ok(())
    }

    #[test]
    fn test_generated_contract_layout() -> Result<()> {
        let code = transpiler::transpile(
            r#"
            export class Token {
                balance: number;
                owner: string;

                @view
                getOwner(): string {
                    return this.owner;
                }

                transfer(to: string, amount: number) {
                    this.balance -= amount;
                    this.owner = to;
                }
            }
        "#,
            &TranspileOptions::default(),
        )?;

        let expected = "\
#[starknet::interface]
trait IToken<TContractState> {
    fn getOwner(self: @TContractState) -> felt252;
    fn transfer(ref self: TContractState, to: felt252, amount: felt252) -> felt252;
}

#[starknet::contract]
mod Token {
    #[storage]
    struct Storage {
        balance: felt252,
        owner: felt252
    }

    #[abi(embed_v0)]
    impl TokenImpl of super::IToken<ContractState> {
        fn getOwner(self: @ContractState) -> felt252 {
            self.owner.read()
        }

        fn transfer(ref self: ContractState, to: felt252, amount: felt252) -> felt252 {
            self.balance.write(self.balance.read() - amount);
            self.owner.write(to);
        }
    }
}
";
        assert_eq!(code, expected);
        Ok(())
    }

    #[test]
    fn test_empty_model_still_renders() {
        let code = generator::generate(&ContractModel::default());
        assert!(code.starts_with("#[starknet::interface]\ntrait I<TContractState> {\n}\n\n"));
        assert!(code.contains("    struct Storage {\n    }\n"));
    }

    #[test]
    fn test_assignment_keeps_whole_right_hand_side() -> Result<()> {
        let contract = build(
            r#"
            class Registry {
                entry: Entry
                size: number

                reset() {
                    this.entry = new Entry(0)
                    this.size = this.size as number
                }
            }
        "#,
        )?;
        assert_eq!(
            contract.functions[0].instructions,
            vec![
                write("entry", "new Entry(0)"),
                write("size", "this.size as number"),
            ]
        );

        let code = generator::generate(&contract);
        assert!(code.contains("self.entry.write(new Entry(0));\n"));
        Ok(())
    }

    #[test]
    fn test_truncated_statement_fails_instead_of_converting() {
        assert!(build("class Broken { x: number; set() { this.x = a b; } }").is_err());
    }
}
