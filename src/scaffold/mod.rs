//! Project scaffolding
//!
//! `start-project` copies a template tree into a new directory, replacing
//! `{{ key }}` tokens in file contents. The builtin template is a minimal
//! crawler project: a binary linking one example crawler, the plugin package
//! exporting it, and a `crawlkit.toml`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while instantiating a template
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Destination directory already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Invalid project name: '{0}'")]
    InvalidName(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scaffold operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Files of the builtin project template, relative path first
const BUILTIN_FILES: &[(&str, &str)] = &[
    (
        "Cargo.toml",
        include_str!("../../templates/project/Cargo.toml.tmpl"),
    ),
    (
        "crawlkit.toml",
        include_str!("../../templates/project/crawlkit.toml"),
    ),
    (
        "crawlers/mod.toml",
        include_str!("../../templates/project/crawlers/mod.toml"),
    ),
    (
        "crawlers/example.toml",
        include_str!("../../templates/project/crawlers/example.toml"),
    ),
    (
        "src/main.rs",
        include_str!("../../templates/project/src/main.rs"),
    ),
    (
        "src/example.rs",
        include_str!("../../templates/project/src/example.rs"),
    ),
];

/// A file in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the template root
    pub path: PathBuf,
    pub contents: String,
}

/// A directory tree to copy into new projects
#[derive(Debug, Clone, Default)]
pub struct Template {
    dirs: Vec<PathBuf>,
    files: Vec<TemplateFile>,
}

impl Template {
    /// The project template shipped with crawlkit
    pub fn builtin() -> Self {
        let files: Vec<TemplateFile> = BUILTIN_FILES
            .iter()
            .map(|(path, contents)| TemplateFile {
                path: PathBuf::from(path),
                contents: contents.to_string(),
            })
            .collect();

        let mut dirs: Vec<PathBuf> = files
            .iter()
            .filter_map(|f| f.path.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        dirs.sort();
        dirs.dedup();

        Self { dirs, files }
    }

    /// Loads a template tree from disk
    ///
    /// # Arguments
    ///
    /// * `root` - Template root directory
    ///
    /// # Returns
    ///
    /// * `Ok(Template)` - Every directory and (UTF-8) file under `root`
    /// * `Err(ScaffoldError)` - `root` is not a directory or a file could not be read
    pub fn from_dir(root: &Path) -> ScaffoldResult<Self> {
        if !root.is_dir() {
            return Err(ScaffoldError::Template(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut template = Self::default();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| ScaffoldError::Template(e.to_string()))?
                    .to_path_buf();

                if path.is_dir() {
                    template.dirs.push(rel);
                    pending.push(path);
                } else {
                    let contents = std::fs::read_to_string(&path)?;
                    template.files.push(TemplateFile { path: rel, contents });
                }
            }
        }

        // Parents sort before children
        template.dirs.sort();
        template.files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(template)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }
}

/// Replaces every `{{ key }}` token for the given variables
pub fn process_file_content(data: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(data.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{ {} }}}}", key), value)
    })
}

/// Checks that a project name can be used as a directory name
pub fn validate_project_name(name: &str) -> ScaffoldResult<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidName(name.to_string()))
    }
}

/// Instantiates a template into a new directory
///
/// # Arguments
///
/// * `template` - The template to copy
/// * `dest` - Destination directory; must not exist, its parent must
/// * `vars` - Token substitutions applied to every file
///
/// # Returns
///
/// * `Ok(PathBuf)` - The created project directory
/// * `Err(ScaffoldError)` - The destination exists or a write failed
pub fn instantiate(template: &Template, dest: &Path, vars: &[(&str, &str)]) -> ScaffoldResult<PathBuf> {
    if dest.exists() {
        return Err(ScaffoldError::DestinationExists(dest.to_path_buf()));
    }

    std::fs::create_dir(dest)?;
    tracing::debug!("New dir: {}", dest.display());

    for dir in template.dirs() {
        let path = dest.join(dir);
        std::fs::create_dir_all(&path)?;
        tracing::debug!("New dir: {}", path.display());
    }

    for file in template.files() {
        let path = dest.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, process_file_content(&file.contents, vars))?;
        tracing::debug!("New file: {}", path.display());
    }

    Ok(dest.to_path_buf())
}

/// Creates a new crawler project named `name` inside `parent`
pub fn start_project(template: &Template, parent: &Path, name: &str) -> ScaffoldResult<PathBuf> {
    validate_project_name(name)?;
    instantiate(template, &parent.join(name), &[("project_name", name)])
}
