mod common;

use common::{compile_and_assert_clean, compile_and_expect_error};
use lumina_error::ErrorCode;

#[test]
fn rejects_empty_parenthesized_expression() {
    compile_and_expect_error(
        r#"
        void run() {
            float f = ();
        }
        "#,
        ErrorCode::EmptyParenthesizedExpression,
        "",
    );
}

#[test]
fn accepts_flat_left_to_right_compound_expression() {
    compile_and_assert_clean(
        r#"
        void run() {
            float a = 1.0;
            float b = 2.0;
            float c = a + b - a;
        }
        "#,
    );
}

#[test]
fn accepts_if_else_if_else_chain() {
    compile_and_assert_clean(
        r#"
        void run() {
            float f = 1.0;
            if (f > 0.0) {
                f = 2.0;
            } else if (f < 0.0) {
                f = 3.0;
            } else {
                f = 4.0;
            }
        }
        "#,
    );
}

#[test]
fn accepts_for_loop_with_assignment_increment() {
    compile_and_assert_clean(
        r#"
        void run() {
            int i = 0;
            for (i = 0; i < 10; i = i + 1) {
                discard;
            }
        }
        "#,
    );
}
