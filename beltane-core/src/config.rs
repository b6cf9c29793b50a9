//! TOML configuration: default root/scale and user-defined scales.
//!
//! A config ships embedded in the binary; a user file, when present, is
//! merged over it. Malformed files or scale entries are logged and skipped,
//! never fatal.

use std::path::PathBuf;

use serde::Deserialize;

use beltane_types::{builtin_scales, PitchClass, ScaleDefinition};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    scales: Vec<ScaleEntry>,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    root: Option<String>,
    scale: Option<String>,
}

#[derive(Deserialize)]
struct ScaleEntry {
    name: String,
    offsets: Vec<u8>,
}

pub struct Config {
    defaults: DefaultsConfig,
    scales: Vec<ScaleEntry>,
}

impl Config {
    pub fn load() -> Self {
        Self::load_with_override(user_config_path())
    }

    fn load_with_override(user_path: Option<PathBuf>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_defaults(&mut base.defaults, user.defaults);
                            base.scales.extend(user.scales);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            scales: base.scales,
        }
    }

    /// The full scale list: builtins plus valid user entries, in order.
    pub fn scales(&self) -> Vec<ScaleDefinition> {
        let mut scales = builtin_scales();
        for entry in &self.scales {
            match ScaleDefinition::new(entry.name.clone(), &entry.offsets) {
                Ok(scale) => scales.push(scale),
                Err(e) => {
                    log::warn!(target: "config", "skipping scale {:?}: {}", entry.name, e)
                }
            }
        }
        scales
    }

    /// Default root pitch class; unknown names fall back to B.
    pub fn default_root(&self) -> PitchClass {
        match self.defaults.root.as_deref() {
            Some(name) => PitchClass::from_name(name).unwrap_or_else(|| {
                log::warn!(target: "config", "unknown root note {:?}, using B", name);
                PitchClass::B
            }),
            None => PitchClass::B,
        }
    }

    /// Index of the default scale within `scales`; unknown names fall back
    /// to the first entry.
    pub fn default_scale_index(&self, scales: &[ScaleDefinition]) -> usize {
        let wanted = self.defaults.scale.as_deref().unwrap_or("Minor Natural");
        scales
            .iter()
            .position(|s| s.name() == wanted)
            .unwrap_or_else(|| {
                log::warn!(target: "config", "unknown scale {:?}, using {:?}", wanted, scales.first().map(|s| s.name()));
                0
            })
    }
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.root.is_some() {
        base.root = user.root;
    }
    if user.scale.is_some() {
        base.scale = user.scale;
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("beltane").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_user_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).expect("create config");
        file.write_all(contents.as_bytes()).expect("write config");
        (dir, path)
    }

    #[test]
    fn test_embedded_defaults() {
        let config = Config::load_with_override(None);
        assert_eq!(config.default_root(), PitchClass::B);
        let scales = config.scales();
        assert_eq!(config.default_scale_index(&scales), 1);
        assert_eq!(scales[1].name(), "Minor Natural");
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let (_dir, path) = write_user_config(
            r#"
[defaults]
root = "F"
scale = "Major"
"#,
        );
        let config = Config::load_with_override(Some(path));
        assert_eq!(config.default_root(), PitchClass::F);
        let scales = config.scales();
        assert_eq!(config.default_scale_index(&scales), 0);
    }

    #[test]
    fn test_user_scales_are_appended_and_validated() {
        let (_dir, path) = write_user_config(
            r#"
[[scales]]
name = "Dorian"
offsets = [0, 2, 3, 5, 7, 9, 10]

[[scales]]
name = "Broken"
offsets = [0, 2, 4]
"#,
        );
        let config = Config::load_with_override(Some(path));
        let scales = config.scales();
        assert_eq!(scales.len(), 3);
        assert_eq!(scales[2].name(), "Dorian");
    }

    #[test]
    fn test_malformed_user_file_is_ignored() {
        let (_dir, path) = write_user_config("defaults = not toml [");
        let config = Config::load_with_override(Some(path));
        assert_eq!(config.default_root(), PitchClass::B);
    }

    #[test]
    fn test_missing_user_file_is_fine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_with_override(Some(dir.path().join("nope.toml")));
        assert_eq!(config.default_root(), PitchClass::B);
    }

    #[test]
    fn test_unknown_root_falls_back() {
        let (_dir, path) = write_user_config(
            r#"
[defaults]
root = "H"
"#,
        );
        let config = Config::load_with_override(Some(path));
        assert_eq!(config.default_root(), PitchClass::B);
    }
}
