//! End-to-end pipeline tests through the public API.

use pretty_assertions::assert_eq;

use faun::ast::{
    ArithExpr, ArithOp, ClassDecl, CompilationUnit, Expr, Factor, NamespaceDecl, Param,
    RoutineDecl, Term, TermOp,
};
use faun::{CompileOptions, Instruction, Module, compile};

fn unit(namespace: Option<NamespaceDecl>, effects: Vec<RoutineDecl>, functions: Vec<RoutineDecl>) -> CompilationUnit {
    CompilationUnit {
        namespace,
        uses: Vec::new(),
        exposes: Vec::new(),
        class: ClassDecl {
            name: "Main".into(),
            effects,
            functions,
        },
    }
}

fn param(name: &str, type_name: &str) -> Param {
    Param {
        name: name.into(),
        type_name: type_name.into(),
    }
}

#[test]
fn add_function_compiles_to_loads_add_and_value_return() {
    let body = Expr::Arith(ArithExpr::Binary {
        left: Term::Simple(Factor::Ident("a".into())),
        right: Term::Simple(Factor::Ident("b".into())),
        op: ArithOp::Add,
    });
    let unit = unit(
        None,
        Vec::new(),
        vec![RoutineDecl {
            name: "add".into(),
            params: [param("a", "Int"), param("b", "Int")].into_iter().collect(),
            return_type: "Int".into(),
            body,
        }],
    );

    let module = compile(&unit, &CompileOptions::default()).unwrap();
    let add = &module.routines[0];
    // The declaration's inferred type is Int -> Int -> Int, flattened into
    // the two-parameter descriptor.
    assert_eq!(add.descriptor, "(II)I");
    assert_eq!(
        add.instructions,
        vec![
            Instruction::LoadParam(0),
            Instruction::LoadParam(1),
            Instruction::Add,
            Instruction::ReturnValue,
        ]
    );
}

#[test]
fn print_effect_compiles_to_stream_push_invoke_and_bare_return() {
    let unit = unit(
        None,
        vec![RoutineDecl {
            name: "main".into(),
            params: Default::default(),
            return_type: "Unit".into(),
            body: Expr::Print(Box::new(Expr::Str("hi".into()))),
        }],
        Vec::new(),
    );

    let module = compile(&unit, &CompileOptions::default()).unwrap();
    let main = &module.routines[0];
    assert_eq!(main.descriptor, "()V");
    assert_eq!(
        main.instructions,
        vec![
            Instruction::PushStream,
            Instruction::PushStr("hi".into()),
            Instruction::InvokePrint {
                descriptor: "(Ljava/lang/String;)V".into()
            },
            Instruction::Return,
        ]
    );
}

#[test]
fn grouping_changes_order_but_adds_no_instructions() {
    // (1 + 2) * 3
    let body = Expr::Arith(ArithExpr::Operand(Term::Binary {
        left: Factor::Paren(Box::new(ArithExpr::Binary {
            left: Term::Simple(Factor::Int(1)),
            right: Term::Simple(Factor::Int(2)),
            op: ArithOp::Add,
        })),
        right: Factor::Int(3),
        op: TermOp::Multiply,
    }));
    let unit = unit(
        None,
        Vec::new(),
        vec![RoutineDecl {
            name: "nine".into(),
            params: Default::default(),
            return_type: "Int".into(),
            body,
        }],
    );

    let module = compile(&unit, &CompileOptions::default()).unwrap();
    assert_eq!(
        module.routines[0].instructions,
        vec![
            Instruction::PushInt(1),
            Instruction::PushInt(2),
            Instruction::Add,
            Instruction::PushInt(3),
            Instruction::Mul,
            Instruction::ReturnValue,
        ]
    );
}

#[test]
fn namespace_and_class_name_form_the_module_identity() {
    let unit = unit(
        Some(NamespaceDecl {
            segments: vec!["a".into(), "b".into()],
        }),
        Vec::new(),
        vec![RoutineDecl {
            name: "one".into(),
            params: Default::default(),
            return_type: "Int".into(),
            body: Expr::Arith(ArithExpr::Operand(Term::Simple(Factor::Int(1)))),
        }],
    );

    let module = compile(&unit, &CompileOptions::default()).unwrap();
    assert_eq!(module.qualified_name, "a/b/Main");
}

#[test]
fn compiling_twice_yields_byte_identical_output() {
    let unit = unit(
        Some(NamespaceDecl {
            segments: vec!["a".into(), "b".into()],
        }),
        vec![RoutineDecl {
            name: "main".into(),
            params: Default::default(),
            return_type: "Unit".into(),
            body: Expr::Print(Box::new(Expr::Str("hi".into()))),
        }],
        vec![RoutineDecl {
            name: "add".into(),
            params: [param("a", "Int"), param("b", "Int")].into_iter().collect(),
            return_type: "Int".into(),
            body: Expr::Arith(ArithExpr::Binary {
                left: Term::Simple(Factor::Ident("a".into())),
                right: Term::Simple(Factor::Ident("b".into())),
                op: ArithOp::Add,
            }),
        }],
    );

    let options = CompileOptions::default();
    let first = compile(&unit, &options).unwrap().to_bytes().unwrap();
    let second = compile(&unit, &options).unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
}

#[test]
fn compiled_modules_survive_the_byte_format() {
    let unit = unit(
        None,
        vec![RoutineDecl {
            name: "main".into(),
            params: Default::default(),
            return_type: "Unit".into(),
            body: Expr::Print(Box::new(Expr::Str("hi".into()))),
        }],
        Vec::new(),
    );

    let module = compile(&unit, &CompileOptions::default()).unwrap();
    let bytes = module.to_bytes().unwrap();
    assert_eq!(Module::from_bytes(&bytes).unwrap(), module);
}

#[test]
fn type_errors_abort_with_no_output() {
    let unit = unit(
        None,
        Vec::new(),
        vec![RoutineDecl {
            name: "broken".into(),
            params: Default::default(),
            return_type: "Int".into(),
            body: Expr::Str("hi".into()),
        }],
    );

    let error = compile(&unit, &CompileOptions::default()).unwrap_err();
    let rendered = error.to_string();
    assert!(rendered.contains("cannot unify"), "got: {}", rendered);
}
