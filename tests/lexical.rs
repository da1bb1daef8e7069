mod common;

use common::compile_and_assert_clean;
use rstest::rstest;

#[test]
fn accepts_line_and_block_comments_anywhere() {
    compile_and_assert_clean(
        r#"
        // a leading comment
        /* a block
           comment */
        void run() {
            // inline comment
            float f = 1.0; /* trailing */
        }
        "#,
    );
}

#[test]
fn accepts_tabs_between_tokens() {
    compile_and_assert_clean("void\trun()\t{\n\tfloat\tf\t=\t1.0;\n}\n");
}

#[test]
fn accepts_true_and_false_as_number_shaped_tokens() {
    compile_and_assert_clean(
        r#"
        void run() {
            bool b = true;
            bool c = false;
        }
        "#,
    );
}

#[rstest]
#[case("int i = 1;")]
#[case("uint u = 1;")]
#[case("float f = 1.0;")]
#[case("float f = 1;")]
#[case("bool b = true;")]
fn accepts_declarations_across_every_primitive_shape(#[case] statement: &str) {
    compile_and_assert_clean(&format!("void run() {{ {statement} }}"));
}
