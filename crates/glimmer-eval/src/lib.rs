//! glimmer-eval - the tree-walking evaluator.
//!
//! Runs a checked `glimmer_par::ast::Program` to a final `Value`. Nothing
//! here re-derives types; a program is expected to have already passed
//! `glimmer_sem::typecheck` (the CLI pipeline always runs both), so runtime
//! errors here are for the handful of things static typing can't rule out
//! up front (array bounds, missing dict keys, division by zero).

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use env::Environment;
pub use eval::{eval_expr, eval_program, eval_stmt, set_max_call_depth, DEFAULT_MAX_CALL_DEPTH};
pub use value::{FunctionValue, RuntimeError, Value};

use glimmer_par::ast::Program;
use glimmer_util::Interner;

/// Evaluates a whole program against a fresh top-level environment.
pub fn eval(program: &Program, interner: &Interner) -> Value {
    let mut env = Environment::new();
    eval_program(program, &mut env, interner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_par::Parser;

    fn run(src: &str) -> Value {
        let mut parser = Parser::new(src);
        let program = parser.parse_program();
        assert!(!parser.has_errors(), "unexpected parse errors for: {src}");
        eval(&program, parser.interner())
    }

    #[test]
    fn arithmetic_with_mixed_int_bool_promotes_to_int() {
        assert_eq!(run("1 + true"), Value::Int(2));
    }

    #[test]
    fn arithmetic_with_mixed_float_int_promotes_to_float() {
        assert_eq!(run("1.5 + 1"), Value::Float(2.5));
    }

    #[test]
    fn string_concat_and_removal() {
        assert_eq!(run(r#""hello" + " world""#), Value::string("hello world"));
        assert_eq!(run(r#""hello" - "l""#), Value::string("helo"));
        assert_eq!(run(r#""hello" / "l""#), Value::string("heo"));
    }

    #[test]
    fn string_times_string_is_a_character_cross_product() {
        assert_eq!(run(r#""ab" * "xy""#), Value::string("axaybxby"));
    }

    #[test]
    fn string_times_int_repeats() {
        assert_eq!(run(r#""ab" * 3"#), Value::string("ababab"));
    }

    #[test]
    fn assignment_then_lookup() {
        assert_eq!(run("x = 5\nx + 1"), Value::Int(6));
    }

    #[test]
    fn compound_assignment_desugars_through_infix() {
        assert_eq!(run("x = 5\nx += 3\nx"), Value::Int(8));
    }

    #[test]
    fn if_expression_yields_the_taken_branch_value() {
        assert_eq!(run("if true { 1 } else { 2 }"), Value::Int(1));
        assert_eq!(run("if false { 1 } else { 2 }"), Value::Int(2));
    }

    #[test]
    fn c_style_for_loop_accumulates_and_leaves_i_visible() {
        assert_eq!(run("total = 0\nfor i = 0, i < 5, i = i + 1 { total += i }\ntotal"), Value::Int(10));
        assert_eq!(run("for i = 0, i < 10, i = i + 1 { }\ni"), Value::Int(10));
    }

    #[test]
    fn break_escapes_a_loop_through_a_nested_if() {
        // Corrects the upstream evaluator's gap where a non-loop block only
        // forwarded return/error, not break/continue, so a break nested
        // inside an if-statement would never reach the loop.
        assert_eq!(run("x = 0\nfor { x += 1\nif x >= 10 { break } }\nx"), Value::Int(10));
    }

    #[test]
    fn continue_skips_straight_to_the_post_step() {
        assert_eq!(
            run("sum = 0\nfor i = 0, i < 5, i = i + 1 { if i == 2 { continue }\nsum += i }\nsum"),
            Value::Int(1 + 3 + 4)
        );
    }

    #[test]
    fn foreach_over_array_binds_index_and_element() {
        assert_eq!(run("total = 0\nfor i, v in [10, 20, 30] { total += i + v }\ntotal"), Value::Int(0 + 10 + 1 + 20 + 2 + 30));
    }

    #[test]
    fn recursive_function_computes_factorial() {
        let src = "fact = fn(n: int) -> int { if n < 2 { return 1 }\nreturn n * fact(n - 1) }\nfact(5)";
        assert_eq!(run(src), Value::Int(120));
    }

    #[test]
    fn return_escapes_out_of_a_nested_loop() {
        let src = "f = fn(xs: array[int]) -> int { for v in xs { if v == 3 { return v } }\nreturn -1 }\nf([1, 2, 3, 4])";
        assert_eq!(run(src), Value::Int(3));
    }

    #[test]
    fn array_index_out_of_range_is_a_runtime_error() {
        assert!(run("[1, 2, 3][5]").is_error());
    }

    #[test]
    fn dict_missing_key_is_a_runtime_error() {
        assert!(run(r#"{"a": 1}["b"]"#).is_error());
    }

    #[test]
    fn builtin_len_head_tail_push_pop() {
        assert_eq!(run("len([1, 2, 3])"), Value::Int(3));
        assert_eq!(run("head([1, 2, 3])"), Value::Int(1));
        assert_eq!(run("tail([1, 2, 3])"), Value::Int(3));
        assert_eq!(run("push([1, 2], 3)"), Value::Array(std::rc::Rc::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)])));
        assert_eq!(run("pop([1, 2, 3])"), Value::Array(std::rc::Rc::new(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn builtin_range_is_supported_despite_absence_upstream() {
        assert_eq!(
            run("range(3)"),
            Value::Array(std::rc::Rc::new(vec![Value::Int(0), Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn truthiness_quirk_treats_the_string_zero_as_falsy() {
        assert_eq!(run(r#"if "0" { 1 } else { 2 }"#), Value::Int(2));
        assert_eq!(run(r#"if "0.0" { 1 } else { 2 }"#), Value::Int(1));
    }

    #[test]
    fn recursion_guard_reports_an_error_instead_of_overflowing_the_stack() {
        // Recurses well past `DEFAULT_MAX_CALL_DEPTH` rather than lowering
        // the process-wide limit, since `set_max_call_depth` is a shared
        // atomic and other tests run concurrently in the same process.
        let src = "loopy = fn(n: int) -> int { return loopy(n + 1) }\nloopy(0)";
        assert!(run(src).is_error());
    }

    #[test]
    fn closures_capture_a_snapshot_not_a_live_reference() {
        let src = "x = 1\nmake = fn() -> fn() -> int { return fn() -> int { return x } }\nf = make()\nx = 2\nf()";
        assert_eq!(run(src), Value::Int(1));
    }
}
