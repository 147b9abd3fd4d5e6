//! Init command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use modelgen_core::ModelgenConfig;
use tracing::info;

const DEFAULT_CONFIG: &str = r#"{
  // Number of generator classpaths kept loaded between tasks
  "cacheSize": 8,
  "generators": {
    // "c": { "export": "etrice-c", "aliases": [] }
  },
  "tasks": [
    // {
    //   "generator": "c",
    //   "classpath": ["generators/c.wasm"],
    //   "genDir": "src-gen",
    //   "modelpath": ["model"],
    //   "include": ["model/**/*.room"],
    //   "options": { "clean": true }
    // }
  ]
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(ModelgenConfig::CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                // Removes a symlink itself, never its target
                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ModelgenConfig::from_jsonc(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.cache_size, 8);
        assert!(config.tasks.is_empty());
    }
}
