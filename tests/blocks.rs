mod common;

use common::{compile_and_assert_clean, compile_and_expect_error};
use lumina_error::ErrorCode;

#[test]
fn declares_a_structure_and_resolves_field_access() {
    compile_and_assert_clean(
        r#"
        struct Material {
            float shininess;
            Vector3 albedo;
        };

        void run() {
            Material m;
            m.shininess = 1.0;
            m.albedo = Vector3(1.0, 1.0, 1.0);
            float s = m.shininess;
        }
        "#,
    );
}

#[test]
fn attribute_and_constant_block_members_are_visible_as_globals() {
    compile_and_assert_clean(
        r#"
        AttributeBlock Frame {
            float time;
        };

        ConstantBlock Camera {
            Vector3 position;
        };

        void run() {
            float t = time;
            Vector3 p = position;
        }
        "#,
    );
}

#[test]
fn rejects_block_as_element_type_of_another_block() {
    compile_and_expect_error(
        r#"
        AttributeBlock Inner {
            float value;
        };

        struct Outer {
            Inner field;
        };
        "#,
        ErrorCode::UnsupportedElementType,
        "",
    );
}

#[test]
fn declares_texture_and_rejects_duplicate_in_same_namespace() {
    compile_and_expect_error(
        r#"
        Texture Albedo;
        Texture Albedo;
        "#,
        ErrorCode::DuplicateTexture,
        "",
    );
}

#[test]
fn rejects_non_positive_array_size() {
    compile_and_expect_error(
        r#"
        struct Palette {
            float weights[0];
        };
        "#,
        ErrorCode::InvalidArraySize,
        "",
    );
}
