//! Integration tests for CLI commands
//!
//! Tests for init, generate and list.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a command for the mgen CLI
fn mgen_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mgen"))
}

mod init_command {
    use super::*;

    #[test]
    fn creates_new_config_file() {
        let temp_dir = TempDir::new().unwrap();

        mgen_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("Created .modelgen.jsonc"));

        let content = fs::read_to_string(temp_dir.path().join(".modelgen.jsonc")).unwrap();
        assert!(content.contains("cacheSize"));
        assert!(content.contains("generators"));
        assert!(content.contains("tasks"));
    }

    #[test]
    fn fails_when_config_exists_without_force() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".modelgen.jsonc"), "{}").unwrap();

        mgen_cmd()
            .current_dir(temp_dir.path())
            .arg("init")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn overwrites_config_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".modelgen.jsonc");
        fs::write(&config_path, r#"{"custom": "data"}"#).unwrap();

        mgen_cmd()
            .current_dir(temp_dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let content = fs::read_to_string(config_path).unwrap();
        assert!(!content.contains("custom"));
        assert!(content.contains("cacheSize"));
    }

    #[cfg(unix)]
    #[test]
    fn force_replaces_symlink_without_touching_target() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".modelgen.jsonc");
        let target_path = temp_dir.path().join("target_file");
        fs::write(&target_path, "Important Data").unwrap();
        std::os::unix::fs::symlink(&target_path, &config_path).unwrap();

        mgen_cmd()
            .current_dir(temp_dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        assert_eq!(fs::read_to_string(&target_path).unwrap(), "Important Data");
        let meta = fs::symlink_metadata(&config_path).unwrap();
        assert!(meta.is_file());
    }
}

mod generate_command {
    use super::*;

    #[test]
    fn succeeds_without_tasks() {
        let temp_dir = TempDir::new().unwrap();

        mgen_cmd()
            .current_dir(temp_dir.path())
            .arg("generate")
            .assert()
            .success()
            .stderr(predicate::str::contains("No generation tasks configured"));
    }

    #[test]
    fn reports_missing_module_as_task_failure() {
        let temp = assert_fs::TempDir::new().unwrap();

        mgen_cmd()
            .current_dir(temp.path())
            .args([
                "generate",
                "--generator",
                "c",
                "--classpath",
                "absent.wasm",
                "--gen-dir",
                "out",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("failed:"))
            .stdout(predicate::str::contains("1 failed"));

        temp.child("out").assert(predicate::path::missing());
    }

    #[test]
    fn configured_tasks_run_from_config_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let project = temp.child("project");
        project
            .child(".modelgen.json")
            .write_str(
                r#"{
                    "generators": { "c": {} },
                    "tasks": [
                        { "generator": "c", "classpath": ["gen/c.wasm"], "genDir": "src-gen" },
                        { "generator": "c", "classpath": ["gen/c.wasm"], "genDir": "src-gen-2" }
                    ]
                }"#,
            )
            .unwrap();

        let output = mgen_cmd()
            .current_dir(temp.path())
            .arg("--config")
            .arg(project.child(".modelgen.json").path())
            .args(["generate", "--format", "json"])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let failures = report["failures"].as_array().unwrap();
        assert_eq!(failures.len(), 2);
        assert!(failures[0]["error"].as_str().unwrap().contains("gen/c.wasm"));
        assert!(report["outcomes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn negative_cache_size_is_fatal() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".modelgen.jsonc")
            .write_str(
                r#"{
                    "cacheSize": -1,
                    "tasks": [{ "generator": "c", "classpath": ["c.wasm"], "genDir": "out" }]
                }"#,
            )
            .unwrap();

        mgen_cmd()
            .current_dir(temp.path())
            .arg("generate")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("negative cache size"));
    }

    #[test]
    fn invalid_config_is_fatal() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".modelgen.jsonc")
            .write_str(r#"{ "cacheSize": "large" }"#)
            .unwrap();

        mgen_cmd()
            .current_dir(temp.path())
            .arg("generate")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Config validation failed"));
    }

    #[test]
    fn ad_hoc_flags_require_generator() {
        mgen_cmd()
            .args(["generate", "--gen-dir", "out"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--generator"));
    }

    #[test]
    fn generator_without_gen_dir_does_not_run_configured_tasks() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".modelgen.jsonc")
            .write_str(
                r#"{ "tasks": [{ "generator": "c", "classpath": ["c.wasm"], "genDir": "out" }] }"#,
            )
            .unwrap();

        mgen_cmd()
            .current_dir(temp.path())
            .args(["generate", "--generator", "c", "--classpath", "c.wasm"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--gen-dir"))
            .stdout(predicate::str::contains("Ran").not());
    }
}

mod list_command {
    use super::*;

    #[test]
    fn requires_classpath() {
        mgen_cmd().arg("list").assert().failure();
    }

    #[test]
    fn fails_for_non_wasm_module() {
        let temp = assert_fs::TempDir::new().unwrap();
        let jar = temp.child("generator.jar");
        jar.write_binary(b"PK").unwrap();

        mgen_cmd()
            .current_dir(temp.path())
            .args(["list", "--classpath"])
            .arg(jar.path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("generator.jar"));
    }
}
