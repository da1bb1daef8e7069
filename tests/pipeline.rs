mod common;

use common::{compile_and_assert_clean, compile_and_expect_error};
use lumina_error::ErrorCode;

#[test]
fn accepts_the_two_legal_pipeline_flow_pairs() {
    compile_and_assert_clean(
        r#"
        Input -> VertexPass : Vector3 position;
        VertexPass -> FragmentPass : Vector3 color;

        VertexPass() {
        }

        FragmentPass() {
        }
        "#,
    );
}

#[test]
fn rejects_input_to_fragment_pass_pair() {
    compile_and_expect_error(
        "Input -> FragmentPass : Vector3 position;",
        ErrorCode::ForbiddenPipelinePair,
        "",
    );
}

#[test]
fn rejects_non_vector_pipeline_flow_type() {
    compile_and_expect_error(
        r#"
        struct Material {
            float shininess;
        };
        Input -> VertexPass : Material m;
        "#,
        ErrorCode::InvalidPipelineFlowType,
        "",
    );
}

#[test]
fn rejects_duplicate_pipeline_flow_variable_name() {
    compile_and_expect_error(
        r#"
        Input -> VertexPass : Vector3 position;
        VertexPass -> FragmentPass : float position;
        "#,
        ErrorCode::NonUniquePipelineVariable,
        "",
    );
}

#[test]
fn rejects_input_stage_as_a_pipeline_body() {
    compile_and_expect_error(
        r#"
        Input() {
        }
        "#,
        ErrorCode::InputPipelineBody,
        "",
    );
}

#[test]
fn rejects_repeated_pipeline_body_for_the_same_stage() {
    compile_and_expect_error(
        r#"
        VertexPass() {
        }
        VertexPass() {
        }
        "#,
        ErrorCode::RepeatedPipelineBody,
        "",
    );
}
