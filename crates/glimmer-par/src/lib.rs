//! AST types and a Pratt parser for Glimmer source (§3, §4.2).

pub mod ast;
pub mod parser;
pub mod precedence;

pub use ast::{Expr, Program, Stmt, TypeNode};
pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::*;

    fn parse(source: &str) -> (Program, Parser) {
        let mut parser = Parser::new(source);
        let program = parser.parse_program();
        (program, parser)
    }

    fn name(parser: &Parser, sym: glimmer_util::Symbol) -> String {
        parser.interner().resolve(sym).to_string()
    }

    #[test]
    fn parses_literals_and_precedence() {
        let (program, parser) = parse("-a * b");
        assert_eq!(program.len(), 1);
        match &program[0] {
            Stmt::Expr(ExprStmt { expr: Expr::Infix(infix), .. }) => {
                assert_eq!(infix.op, InfixOp::Mul);
                match &infix.left {
                    Expr::Prefix(p) => assert_eq!(p.op, PrefixOp::Neg),
                    other => panic!("expected prefix expr, got {:?}", other),
                }
            }
            other => panic!("expected infix expr statement, got {:?}", other),
        }
        assert!(!parser.has_errors());
    }

    #[test]
    fn comparison_binds_looser_than_equals() {
        // 5 > 4 == 3 < 4  =>  (5 > 4) == (3 < 4)
        let (program, _parser) = parse("5 > 4 == 3 < 4");
        match &program[0] {
            Stmt::Expr(ExprStmt { expr: Expr::Infix(infix), .. }) => {
                assert_eq!(infix.op, InfixOp::Eq);
                assert!(matches!(&infix.left, Expr::Infix(l) if l.op == InfixOp::Gt));
                assert!(matches!(&infix.right, Expr::Infix(r) if r.op == InfixOp::Lt));
            }
            other => panic!("expected infix expr statement, got {:?}", other),
        }
    }

    #[test]
    fn index_binds_tighter_than_product() {
        // a * [1,2,3,4][b*c] * d
        let (program, _parser) = parse("a * [1,2,3,4][b*c] * d");
        match &program[0] {
            Stmt::Expr(ExprStmt { expr: Expr::Infix(outer), .. }) => {
                assert_eq!(outer.op, InfixOp::Mul);
                match &outer.left {
                    Expr::Infix(inner) => {
                        assert_eq!(inner.op, InfixOp::Mul);
                        assert!(matches!(&inner.right, Expr::Index(_)));
                    }
                    other => panic!("expected nested infix, got {:?}", other),
                }
            }
            other => panic!("expected infix expr statement, got {:?}", other),
        }
    }

    #[test]
    fn assignment_statement_tracks_compound_operator() {
        let (program, parser) = parse("x += 1");
        match &program[0] {
            Stmt::Assign(assign) => {
                assert_eq!(assign.op, AssignOp::AddAssign);
                assert_eq!(name(&parser, assign.name), "x");
            }
            other => panic!("expected assign stmt, got {:?}", other),
        }
    }

    #[test]
    fn if_at_statement_position_has_no_value() {
        let (program, _parser) = parse("if a == b { print(a) }");
        assert!(matches!(program[0], Stmt::If(_)));
    }

    #[test]
    fn if_at_expression_position_is_an_if_expr() {
        let (program, _parser) = parse("x = if a == b { 1 } else { 2 }");
        match &program[0] {
            Stmt::Assign(AssignStmt { value: Expr::If(_), .. }) => {}
            other => panic!("expected assignment of an if-expression, got {:?}", other),
        }
    }

    #[test]
    fn if_else_if_chain_parses_all_arms() {
        let (program, _parser) = parse("if 1>2 {10} else if 1<2 {20} else {30}");
        match &program[0] {
            Stmt::Expr(ExprStmt { expr: Expr::If(ifexpr), .. }) => {
                assert_eq!(ifexpr.elifs.len(), 1);
                assert!(ifexpr.else_block.is_some());
            }
            other => panic!("expected if-expression statement, got {:?}", other),
        }
    }

    #[test]
    fn foreach_for_parses_one_and_two_loop_vars() {
        let (program, _parser) = parse("for i, v in data { print(i, v) }");
        match &program[0] {
            Stmt::ForEach(fe) => assert_eq!(fe.loop_vars.len(), 2),
            other => panic!("expected foreach stmt, got {:?}", other),
        }

        let (program, _parser) = parse("for v in data { print(v) }");
        match &program[0] {
            Stmt::ForEach(fe) => assert_eq!(fe.loop_vars.len(), 1),
            other => panic!("expected foreach stmt, got {:?}", other),
        }
    }

    #[test]
    fn cstyle_for_with_two_commas_splits_pre_cond_post() {
        let (program, _parser) = parse("for i=0, i<10, i=i+1 { }");
        match &program[0] {
            Stmt::For(f) => {
                assert_eq!(f.pre.len(), 1);
                assert_eq!(f.cond.len(), 1);
                assert_eq!(f.post.len(), 1);
            }
            other => panic!("expected for stmt, got {:?}", other),
        }
    }

    #[test]
    fn cstyle_for_with_no_commas_is_condition_only() {
        let (program, _parser) = parse("for x < 10 { }");
        match &program[0] {
            Stmt::For(f) => {
                assert!(f.pre.is_empty());
                assert_eq!(f.cond.len(), 1);
                assert!(f.post.is_empty());
            }
            other => panic!("expected for stmt, got {:?}", other),
        }
    }

    #[test]
    fn bare_for_brace_is_an_infinite_loop_header() {
        let (program, _parser) = parse("for { x += 1 }");
        match &program[0] {
            Stmt::For(f) => {
                assert!(f.pre.is_empty() && f.cond.is_empty() && f.post.is_empty());
            }
            other => panic!("expected for stmt, got {:?}", other),
        }
    }

    #[test]
    fn function_literal_parses_params_and_return_type() {
        let (program, parser) = parse("add = fn(a: int, b: int) -> int { return a + b }");
        match &program[0] {
            Stmt::Assign(AssignStmt { value: Expr::Function(f), .. }) => {
                assert_eq!(f.params.len(), 2);
                assert_eq!(name(&parser, f.params[0].name), "a");
                assert_eq!(f.return_type, TypeNode::Int);
            }
            other => panic!("expected function literal assignment, got {:?}", other),
        }
    }

    #[test]
    fn empty_array_literal_requires_and_stores_explicit_type() {
        let (program, _parser) = parse("xs = []int");
        match &program[0] {
            Stmt::Assign(AssignStmt { value: Expr::Array(arr), .. }) => {
                assert!(arr.elements.is_empty());
                assert_eq!(arr.explicit_type, Some(TypeNode::Int));
            }
            other => panic!("expected array literal assignment, got {:?}", other),
        }
    }

    #[test]
    fn dict_literal_allows_arbitrary_key_expressions() {
        let (program, _parser) = parse(r#"d = {"one": 1, two: 2+2}"#);
        match &program[0] {
            Stmt::Assign(AssignStmt { value: Expr::Dict(d), .. }) => {
                assert_eq!(d.pairs.len(), 2);
            }
            other => panic!("expected dict literal assignment, got {:?}", other),
        }
    }

    #[test]
    fn nested_array_and_function_type_nodes_parse() {
        let (program, _parser) = parse("f = fn(xs: array[int]) -> dict[int] { xs }");
        match &program[0] {
            Stmt::Assign(AssignStmt { value: Expr::Function(f), .. }) => {
                assert_eq!(f.params[0].ty, TypeNode::Array(Box::new(TypeNode::Int)));
                assert_eq!(f.return_type, TypeNode::Dict(Box::new(TypeNode::Int)));
            }
            other => panic!("expected function literal assignment, got {:?}", other),
        }
    }

    #[test]
    fn missing_prefix_parselet_is_recorded_as_a_diagnostic() {
        let (_program, parser) = parse(") 1");
        assert!(parser.has_errors());
    }

    #[test]
    fn call_expression_parses_argument_list() {
        let (program, _parser) = parse("add(5 + 5, add(5, 5))");
        match &program[0] {
            Stmt::Expr(ExprStmt { expr: Expr::Call(call), .. }) => {
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected call expr statement, got {:?}", other),
        }
    }
}
