//! Test utilities for modelgen_plugin.

/// Helper to compile WAT to WASM bytes
pub fn wat_to_wasm(wat_source: &str) -> Vec<u8> {
    wat::parse_str(wat_source).expect("Invalid WAT")
}

/// A module whose initial memory (200 MB) exceeds the default page limit.
pub fn oversized_memory_wat() -> String {
    r#"
    (module
        (memory (export "memory") 3200)
        (func (export "get_manifest") (result i32) (i32.const 0))
        (func (export "generate") (result i32) (i32.const 0))
    )
    "#
    .to_string()
}

/// A module that never returns from `get_manifest`.
pub fn looping_manifest_wat() -> String {
    r#"
    (module
        (memory (export "memory") 1)
        (func (export "get_manifest") (result i32)
            (loop
                (br 0)
            )
            (i32.const 0)
        )
        (func (export "generate") (result i32) (i32.const 0))
    )
    "#
    .to_string()
}

/// A module without a `generate` export.
pub fn missing_generate_wat() -> String {
    r#"
    (module
        (memory (export "memory") 1)
        (func (export "get_manifest") (result i32) (i32.const 0))
    )
    "#
    .to_string()
}
