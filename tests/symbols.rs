mod common;

use common::{compile_and_assert_clean, compile_and_expect_error};
use lumina_error::ErrorCode;

#[test]
fn resolves_overloaded_functions_by_parameter_type() {
    compile_and_assert_clean(
        r#"
        float lighten(float f) {
            return f;
        }

        Vector3 lighten(Vector3 v) {
            return v;
        }

        void run() {
            float a = lighten(1.0);
            Vector3 b = lighten(Vector3(1.0, 1.0, 1.0));
        }
        "#,
    );
}

#[test]
fn rejects_exact_duplicate_overload() {
    compile_and_expect_error(
        r#"
        float lighten(float f) {
            return f;
        }

        float lighten(float f) {
            return f;
        }
        "#,
        ErrorCode::DuplicateOverload,
        "",
    );
}

#[test]
fn rejects_overload_disagreeing_on_return_type() {
    compile_and_expect_error(
        r#"
        float tint(Vector3 v) {
            return 0.0;
        }

        int tint(float f) {
            return 0;
        }
        "#,
        ErrorCode::DisagreeingOverloadReturnType,
        "",
    );
}

#[test]
fn rejects_call_with_no_matching_overload() {
    compile_and_expect_error(
        r#"
        float tint(Vector3 v) {
            return 0.0;
        }

        void run() {
            float f = tint(1.0);
        }
        "#,
        ErrorCode::NoMatchingOverload,
        "",
    );
}

#[test]
fn rejects_duplicate_parameter_names() {
    compile_and_expect_error(
        r#"
        float add(float a, float a) {
            return a;
        }
        "#,
        ErrorCode::DuplicateParameter,
        "",
    );
}

#[test]
fn rejects_non_void_function_returning_nothing() {
    compile_and_expect_error(
        r#"
        Vector3 tint() {
            return;
        }
        "#,
        ErrorCode::WrongReturnType,
        "",
    );
}

#[test]
fn resolves_namespaced_functions_by_search_order() {
    compile_and_assert_clean(
        r#"
        namespace lib {
            float square(float f) {
                return f * f;
            }
        }

        namespace lib {
            void run() {
                float f = square(2.0);
            }
        }
        "#,
    );
}

#[test]
fn allows_identical_overload_in_a_distinct_namespace() {
    compile_and_assert_clean(
        r#"
        float helper(float x) {
            return x;
        }

        namespace A {
            float helper(float x) {
                return x;
            }
        }
        "#,
    );
}
