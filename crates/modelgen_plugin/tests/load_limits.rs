use modelgen_plugin::{GeneratorHost, PluginError, PluginOptions};

/// Helper to compile WAT to WASM bytes
fn wat_to_wasm(wat: &str) -> Vec<u8> {
    wat::parse_str(wat).expect("Invalid WAT")
}

#[test]
fn test_generator_host_memory_limit_breach() {
    let mut host = GeneratorHost::new();

    // 8192 pages * 64KB = 512MB, far above the configured limit.
    // Extism ABI imports avoid an ABI mismatch error masking the real one.
    let wasm = wat_to_wasm(
        r#"
        (module
            (import "extism:host/env" "output_set" (func $output_set (param i64 i64)))
            (memory (export "memory") 8192)

            (data (i32.const 0) "{\"name\":\"dos-gen\",\"version\":\"1.0.0\"}")

            (func (export "get_manifest")
                (call $output_set (i64.const 0) (i64.const 36))
            )

            (func (export "generate")
                (call $output_set (i64.const 0) (i64.const 0))
            )
        )
        "#,
    );

    let options = PluginOptions {
        memory_max_pages: Some(256),
        ..PluginOptions::default()
    };
    let result = host.load_module_bytes("dos-gen.wasm", &wasm, options);

    match result {
        Err(PluginError::LoadError { module, message })
            if module.ends_with("dos-gen.wasm")
                && (message.to_lowercase().contains("limit")
                    || message.to_lowercase().contains("memory")
                    || message.to_lowercase().contains("oom")
                    || message.contains("Failed to create plugin")) => {}
        Ok(_) => panic!("Expected a memory error, but load succeeded"),
        Err(e) => panic!("Expected a memory error, but got: {:?}", e),
    }
    assert!(host.is_empty());
}

#[test]
fn test_generator_host_missing_module_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut host = GeneratorHost::new();

    let result = host.load_module(temp_dir.path().join("absent.wasm"), PluginOptions::default());

    match result {
        Err(PluginError::Io { module, .. }) => assert!(module.ends_with("absent.wasm")),
        other => panic!("Expected an I/O error, got: {:?}", other.map(|m| m.name)),
    }
}

#[test]
fn test_generator_host_rejects_garbage_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("garbage.wasm");
    std::fs::write(&path, b"\0asm-but-not-really").unwrap();

    let mut host = GeneratorHost::new();
    let result = host.load_module(&path, PluginOptions::default());

    match result {
        Err(error @ PluginError::LoadError { .. }) => {
            assert_eq!(error.module(), Some(path.as_path()));
        }
        other => panic!("Expected a load error, got: {:?}", other.map(|m| m.name)),
    }
}
