//! Structural injection into Options API component definitions
//!
//! This crate extends the sections of a component's default-exported options
//! object (lifecycle hooks, `data`, `components`, `methods`, `mixins`) and
//! its framework import, leaving every other byte of the script as it was.
//! It also maintains a shared utility module that transformed components
//! import generated helpers from.
//!
//! Scripts are parsed with OXC. Every mutation is spliced into the source
//! text by span and re-parsed before it is committed, so a [`ScriptTree`]
//! always holds valid code.
//!
//! # Examples
//!
//! ## Extending a hook
//!
//! ```rust
//! use fob_inject::{ParseOptions, ScriptTree, merge_hook};
//!
//! let mut tree = ScriptTree::parse(
//!     "export default {\n  mounted() {\n    a()\n  }\n}\n",
//!     ParseOptions::default(),
//! )?;
//! merge_hook(&mut tree, "mounted", "b()")?;
//! assert_eq!(
//!     tree.source(),
//!     "export default {\n  mounted() {\n    a()\n    b()\n  }\n}\n"
//! );
//! # Ok::<(), fob_inject::InjectError>(())
//! ```
//!
//! ## Registering a helper
//!
//! ```rust,no_run
//! use fob_inject::{InjectConfig, ParseOptions, ScriptTree, UtilityModuleManager, ensure_named_import};
//! use std::path::Path;
//!
//! let manager = UtilityModuleManager::new(InjectConfig::load(None)?);
//! let specifier = manager.ensure_utility_function(
//!     "export function $on(event, fn) {}",
//!     Path::new("dist"),
//!     Path::new("dist/components/Button.js"),
//!     None,
//! )?;
//!
//! let mut tree = ScriptTree::parse("export default {}\n", ParseOptions::default())?;
//! ensure_named_import(&mut tree, "$on", &specifier)?;
//! # Ok::<(), fob_inject::InjectError>(())
//! ```

mod config;
mod edit;
mod error;
mod format;
mod fragment;
mod imports;
mod layout;
mod merge;
mod options;
mod parser;
mod sfc;
mod tree;
mod utility;

pub use config::InjectConfig;
pub use error::{InjectError, Result};
pub use format::{
    CodegenFormatter, FormatOptions, IndentStyle, LanguageMode, QuoteStyle, SourceFormatter,
    TrailingCommas, normalize,
};
pub use imports::{LookupFailure, NamespaceImports, ensure_named_import};
pub use merge::{
    Entries, InjectionRequest, KeyedBlock, MergeOutcome, merge, merge_hook, merge_keyed_block,
    merge_method, merge_mixin, to_camel_case,
};
pub use parser::{ParseOptions, ParsedProgram, parse};
pub use sfc::{ScriptBlock, SfcDocument};
pub use tree::ScriptTree;
pub use utility::{UtilityFileRecord, UtilityModuleManager};

// Re-export commonly used OXC types for convenience
pub use oxc_allocator::Allocator;
pub use oxc_span::SourceType;
