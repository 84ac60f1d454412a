//! Search-path configuration for the compiler.
//!
//! Image, font and data files referenced by a theme are located through
//! ordered directory lists. Directories come from two places: repeatable
//! CLI flags and an optional `edje_cc.toml` discovered in the working
//! directory (then the platform config dir). CLI-supplied directories are
//! searched first so a flag can always shadow the config file. Unknown
//! fields in the file are ignored to allow forward evolution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "edje_cc.toml";

/// Raw `edje_cc.toml` contents.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub image_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub data_dirs: Vec<PathBuf>,
}

/// Ordered directory lists handed to the compiler. The current working
/// directory is always an implicit last entry at lookup time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPaths {
    pub image_dirs: Vec<PathBuf>,
    pub font_dirs: Vec<PathBuf>,
    pub data_dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Locate `name` in `dirs`, falling back to the name itself (relative
    /// to the working directory or absolute).
    pub fn find(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
        for dir in dirs {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        let bare = PathBuf::from(name);
        bare.exists().then_some(bare)
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("edje_cc").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<ConfigFile> {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let file: ConfigFile = toml::from_str(&content)
                .with_context(|| format!("malformed config file {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            Ok(file)
        }
        Err(e) if explicit => {
            Err(e).with_context(|| format!("cannot read config file {}", path.display()))
        }
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(ConfigFile::default())
        }
    }
}

/// Merge CLI directories (searched first) with config-file directories.
/// Relative config-file paths are anchored at the config file's parent so
/// a project-local `edje_cc.toml` works from any working directory.
pub fn merge(
    cli_images: Vec<PathBuf>,
    cli_fonts: Vec<PathBuf>,
    cli_data: Vec<PathBuf>,
    file: &ConfigFile,
    anchor: Option<&Path>,
) -> SearchPaths {
    let anchored = |dirs: &[PathBuf]| -> Vec<PathBuf> {
        dirs.iter()
            .map(|d| match (d.is_relative(), anchor) {
                (true, Some(base)) => base.join(d),
                _ => d.clone(),
            })
            .collect()
    };
    let mut paths = SearchPaths {
        image_dirs: cli_images,
        font_dirs: cli_fonts,
        data_dirs: cli_data,
    };
    paths.image_dirs.extend(anchored(&file.image_dirs));
    paths.font_dirs.extend(anchored(&file.font_dirs));
    paths.data_dirs.extend(anchored(&file.data_dirs));
    paths
}

/// Convenience: discover, load and merge in one step, anchoring at the
/// discovered file when it is not in the working directory.
pub fn resolve(
    config_path: Option<PathBuf>,
    cli_images: Vec<PathBuf>,
    cli_fonts: Vec<PathBuf>,
    cli_data: Vec<PathBuf>,
) -> Result<SearchPaths> {
    let path = config_path.clone().unwrap_or_else(discover);
    let file = load_from(config_path)?;
    let cwd = env::current_dir().unwrap_or_default();
    let anchor = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && *p != cwd.as_path())
        .map(Path::to_path_buf);
    Ok(merge(cli_images, cli_fonts, cli_data, &file, anchor.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_dirs_shadow_config_dirs() {
        let file = ConfigFile {
            image_dirs: vec![PathBuf::from("cfg-img")],
            font_dirs: vec![],
            data_dirs: vec![],
        };
        let merged = merge(
            vec![PathBuf::from("cli-img")],
            vec![],
            vec![],
            &file,
            None,
        );
        assert_eq!(
            merged.image_dirs,
            vec![PathBuf::from("cli-img"), PathBuf::from("cfg-img")]
        );
    }

    #[test]
    fn config_relative_dirs_anchor_at_config_file() {
        let file = ConfigFile {
            image_dirs: vec![PathBuf::from("img")],
            font_dirs: vec![],
            data_dirs: vec![],
        };
        let merged = merge(vec![], vec![], vec![], &file, Some(Path::new("/proj")));
        assert_eq!(merged.image_dirs, vec![PathBuf::from("/proj/img")]);
    }

    #[test]
    fn find_prefers_earlier_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("x.png"), b"A").unwrap();
        fs::write(b.join("x.png"), b"B").unwrap();
        let found = SearchPaths::find(&[b.clone(), a.clone()], "x.png").unwrap();
        assert_eq!(found, b.join("x.png"));
    }

    #[test]
    fn parses_toml_shape() {
        let parsed: ConfigFile =
            toml::from_str("image_dirs = [\"img\", \"shared/img\"]\nfont_dirs = [\"fonts\"]\n")
                .unwrap();
        assert_eq!(parsed.image_dirs.len(), 2);
        assert_eq!(parsed.font_dirs.len(), 1);
        assert!(parsed.data_dirs.is_empty());
    }

    #[test]
    fn missing_default_config_is_fine_but_explicit_missing_errors() {
        assert!(load_from(None).is_ok());
        assert!(load_from(Some(PathBuf::from("/definitely/not/here.toml"))).is_err());
    }
}
