//! Shared utility module management
//!
//! Generated helpers live in one file per output root
//! (`<root>/utils/gogocodeTransfer.js` by default). Functions are appended
//! once, the file is reformatted as a whole, and consumers get back the
//! specifier to import it with.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use path_clean::PathClean;
use tracing::{debug, warn};

use crate::config::InjectConfig;
use crate::error::{InjectError, Result};
use crate::format::{CodegenFormatter, SourceFormatter};
use crate::parser::ParseOptions;
use crate::tree::ScriptTree;

/// One on-disk utility module, read into memory
#[derive(Debug)]
pub struct UtilityFileRecord {
    path: PathBuf,
    tree: ScriptTree,
}

impl UtilityFileRecord {
    /// Read `path`, creating its missing ancestor directories
    ///
    /// A missing file reads as empty; it is not created until written.
    pub fn load(path: &Path) -> Result<Self> {
        let content = if path.exists() {
            fs::read_to_string(path).map_err(|e| InjectError::io(path, e))?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| InjectError::io(parent, e))?;
            }
            String::new()
        };
        let options = ParseOptions::from_path(&path.to_string_lossy());
        Ok(Self {
            path: path.to_path_buf(),
            tree: ScriptTree::parse(content, options)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        self.tree.source()
    }

    /// Append `function_source` unless the file already contains it
    ///
    /// Returns whether it was appended.
    pub fn ensure_function(&mut self, function_source: &str) -> Result<bool> {
        if self.tree.has_statements(function_source)? {
            return Ok(false);
        }
        self.tree.append(function_source)?;
        Ok(true)
    }

    /// Replace the file on disk with `content`
    pub fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|e| InjectError::io(&self.path, e))
    }
}

/// Creates and extends utility modules and computes their import specifiers
///
/// Updates to the same file are serialized, so callers sharing one manager
/// across threads never lose an appended function.
pub struct UtilityModuleManager {
    config: InjectConfig,
    formatter: Box<dyn SourceFormatter>,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl Default for UtilityModuleManager {
    fn default() -> Self {
        Self::new(InjectConfig::default())
    }
}

impl UtilityModuleManager {
    pub fn new(config: InjectConfig) -> Self {
        Self {
            config,
            formatter: Box::new(CodegenFormatter),
            locks: DashMap::new(),
        }
    }

    /// Use a different formatter for writes
    pub fn with_formatter(mut self, formatter: impl SourceFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn config(&self) -> &InjectConfig {
        &self.config
    }

    /// `<dir of output_root>/<utils_dir>/<file_name>`
    ///
    /// An `output_root` whose last component has an extension is a file and
    /// contributes its parent directory.
    pub fn resolve_path(&self, output_root: &Path, file_name: Option<&str>) -> Result<PathBuf> {
        let root = absolute(output_root)?;
        let root_dir = if root.extension().is_some() {
            root.parent().map(Path::to_path_buf).unwrap_or(root)
        } else {
            root
        };
        let file_name = file_name.unwrap_or(&self.config.utility_file_name);
        Ok(root_dir.join(&self.config.utils_dir).join(file_name).clean())
    }

    /// Make sure `function_source` is defined in the utility module and
    /// return the specifier `consumer_file` imports it with
    ///
    /// A formatter failure is logged and the write skipped; file-system
    /// failures are returned.
    pub fn ensure_utility_function(
        &self,
        function_source: &str,
        output_root: &Path,
        consumer_file: &Path,
        file_name: Option<&str>,
    ) -> Result<String> {
        let path = self.resolve_path(output_root, file_name)?;

        let lock = self.lock_for(&path);
        let _guard = lock.lock();

        let mut record = UtilityFileRecord::load(&path)?;
        if record.ensure_function(function_source)? {
            match self.formatter.format(record.content(), &self.config.format) {
                Ok(formatted) => {
                    debug!("Writing utility module: {}", path.display());
                    record.write(&formatted)?;
                }
                Err(err) => {
                    warn!(
                        "Skipping write of {}: {}",
                        path.display(),
                        err
                    );
                }
            }
        } else {
            debug!("Utility function already present in {}", path.display());
        }

        self.import_specifier(consumer_file, &path)
    }

    /// Specifier `consumer_file` uses to import `utility_path`
    ///
    /// Relative, extension stripped, `/`-separated and starting with `.`.
    pub fn import_specifier(&self, consumer_file: &Path, utility_path: &Path) -> Result<String> {
        let is_default = utility_path
            .file_name()
            .is_some_and(|name| name == self.config.utility_file_name.as_str());
        if is_default && self.config.pin_default_specifier {
            return Ok(self.config.default_specifier.clone());
        }

        let consumer = absolute(consumer_file)?;
        let consumer_dir = consumer.parent().unwrap_or(&consumer);
        let relative = relative_path(consumer_dir, &absolute(utility_path)?).with_extension("");

        let specifier = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(if specifier.starts_with('.') {
            specifier
        } else {
            format!("./{}", specifier)
        })
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(path.to_path_buf())
            .or_default()
            .value()
            .clone()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| InjectError::io(path, e))?
            .join(path)
    };
    Ok(joined.clean())
}

/// Path from directory `from` to `to`; both absolute and clean
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_walks_up_and_down() {
        assert_eq!(
            relative_path(Path::new("/a/b/c"), Path::new("/a/utils/x.js")),
            PathBuf::from("../../utils/x.js")
        );
        assert_eq!(
            relative_path(Path::new("/a"), Path::new("/a/utils/x.js")),
            PathBuf::from("utils/x.js")
        );
    }

    #[test]
    fn output_root_file_uses_its_directory() {
        let manager = UtilityModuleManager::default();
        let path = manager
            .resolve_path(Path::new("/out/app/main.js"), None)
            .unwrap();
        assert_eq!(path, PathBuf::from("/out/app/utils/gogocodeTransfer.js"));

        let path = manager
            .resolve_path(Path::new("/out/app"), Some("helpers.js"))
            .unwrap();
        assert_eq!(path, PathBuf::from("/out/app/utils/helpers.js"));
    }
}
