use threepass::{
    BinOp, Compiler, Error, FoldError, Node, Op, ParseErrorKind, ParserError, Program,
    RuntimeError, compile, fold, generate, parse, simulate,
};

const REFERENCE: &str = "[ x y z ] ( 2*3*x + 5*y - 3*z ) / (1 + 3 + 2*2)";

fn run(source: &str, args: &[i64]) -> i64 {
    let program = compile(source).expect("compile should succeed");
    simulate(&program, args).expect("simulate should succeed")
}

#[test]
fn test_reference_program() {
    let program = compile(REFERENCE).unwrap();
    assert_eq!(simulate(&program, &[4, 0, 0]).unwrap(), 3);
    assert_eq!(simulate(&program, &[4, 8, 0]).unwrap(), 8);
    assert_eq!(simulate(&program, &[4, 8, 16]).unwrap(), 2);
}

#[test]
fn test_reference_program_divisor_is_folded() {
    let program = compile(REFERENCE).unwrap();
    // (1 + 3 + 2*2) collapses into a single immediate
    assert!(program.ops().contains(&Op::Imm(8)));
    assert_eq!(program.arity(), 3);
}

#[test]
fn test_constant_only_folding() {
    let folded = fold(parse("[] 2+3*4").unwrap()).unwrap();
    assert_eq!(folded, Node::Immediate(14));
}

#[test]
fn test_folded_value_matches_tree_evaluation() {
    for source in [
        "[] 2+3*4",
        "[] (2+3)*4",
        "[] 100 / 7 / 2 - 3 * (4 - 9)",
        "[] ((((1))))",
        "[] 9223372036854775807 + 1",
    ] {
        let tree = parse(source).unwrap();
        let expected = tree.eval(&[]).unwrap();
        assert_eq!(fold(tree).unwrap(), Node::Immediate(expected), "{}", source);
    }
}

#[test]
fn test_precedence_and_grouping() {
    assert_eq!(run("[] 2+3*4", &[]), 14);
    assert_eq!(run("[] (2+3)*4", &[]), 20);
    assert_eq!(run("[] 10 - 4 - 3", &[]), 3);
}

#[test]
fn test_truncating_division() {
    assert_eq!(run("[] 7/2", &[]), 3);
    assert_eq!(run("[ a ] a / 2", &[-7]), -3);
}

#[test]
fn test_empty_argument_list() {
    assert_eq!(run("[] 5-2", &[]), 3);
}

#[test]
fn test_push_count_equals_node_count() {
    for source in [REFERENCE, "[ a ] a", "[ a b ] a * b - (a + 1)", "[] 1 + 2"] {
        let tree = fold(parse(source).unwrap()).unwrap();
        let program = generate(&tree);
        assert_eq!(program.count(Op::Push), tree.node_count(), "{}", source);
    }
}

#[test]
fn test_vm_agrees_with_tree_evaluation() {
    let source = "[ a b c ] a * (b - c) / (a + 1) + c * c";
    let tree = parse(source).unwrap();
    let program = compile(source).unwrap();
    for args in [[1, 2, 3], [0, -5, 7], [-4, 9, 1], [100, 3, 3]] {
        assert_eq!(
            simulate(&program, &args).ok(),
            tree.eval(&args),
            "{:?}",
            args
        );
    }
}

#[test]
fn test_unknown_identifier() {
    let err = compile("[ x ] y").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParserError {
            kind: ParseErrorKind::UnknownIdentifier(_),
            ..
        })
    ));
}

#[test]
fn test_division_by_zero_at_compile_time() {
    let err = compile("[] 1/0").unwrap_err();
    assert_eq!(err, Error::Fold(FoldError::DivisionByZero { dividend: 1 }));
}

#[test]
fn test_division_by_zero_at_run_time() {
    let program = compile("[ d ] 1 / d").unwrap();
    assert!(matches!(
        simulate(&program, &[0]),
        Err(RuntimeError::DivisionByZero { .. })
    ));
}

#[test]
fn test_short_argument_vector() {
    let program = compile("[ x y ] x + y").unwrap();
    assert!(matches!(
        simulate(&program, &[1]),
        Err(RuntimeError::IndexOutOfRange { slot: 1, len: 1, .. })
    ));
}

#[test]
fn test_program_survives_assembly_text() {
    let program = compile(REFERENCE).unwrap();
    let reparsed: Program = program.to_string().parse().unwrap();
    assert_eq!(simulate(&reparsed, &[4, 8, 16]).unwrap(), 2);
}

#[test]
fn test_unfolded_program_computes_same_result() {
    let unfolded = Compiler::new().without_folding().compile(REFERENCE).unwrap();
    let folded = compile(REFERENCE).unwrap();
    assert!(unfolded.len() > folded.len());
    assert_eq!(simulate(&unfolded, &[4, 8, 0]).unwrap(), 8);
}

#[test]
fn test_lenient_lexer() {
    assert_eq!(run("[ x, ] x ;* 2.", &[3]), 6);
}

#[test]
fn test_duplicate_parameters_use_last_slot() {
    let tree = parse("[ a a ] a").unwrap();
    assert_eq!(tree, Node::Argument(1));
    assert_eq!(run("[ a a ] a", &[1, 2]), 2);
}

#[test]
fn test_binary_tree_shape() {
    let tree = parse("[ x ] x * 2").unwrap();
    assert_eq!(
        tree,
        Node::binary(BinOp::Mul, Node::Argument(0), Node::Immediate(2))
    );
}

#[test]
fn test_long_operator_chain_is_rejected() {
    let source = format!("[ a ] a{}", "+a".repeat(50_000));
    let err = compile(&source).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParserError {
            kind: ParseErrorKind::MalformedExpression(_),
            ..
        })
    ));
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let source = format!("[] {}1{}", "(".repeat(5_000), ")".repeat(5_000));
    let err = compile(&source).unwrap_err();
    assert!(err.to_string().contains("nested too deeply"));
}

#[test]
fn test_program_and_tree_survive_serialization() {
    let tree = parse(REFERENCE).unwrap();
    let bytes = postcard::to_allocvec(&tree).unwrap();
    assert_eq!(postcard::from_bytes::<Node>(&bytes).unwrap(), tree);

    let program = compile(REFERENCE).unwrap();
    let bytes = postcard::to_allocvec(&program).unwrap();
    let decoded: Program = postcard::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, program);
    assert_eq!(simulate(&decoded, &[4, 8, 16]).unwrap(), 2);
}
