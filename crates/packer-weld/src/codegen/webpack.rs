//! Bundler config module generator
//!
//! Renders a [`BuildConfig`] as the CommonJS `webpack.config.js` the bundler loads.

use crate::ir::BuildConfig;
use std::path::{Component, Path, PathBuf};

/// File name bundlers look for by default
pub const WEBPACK_CONFIG_FILE: &str = "webpack.config.js";

/// Generator for `webpack.config.js` modules
pub struct WebpackConfigGenerator<'a> {
    config: &'a BuildConfig,
    base_dir: Option<PathBuf>,
}

impl<'a> WebpackConfigGenerator<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self {
            config,
            base_dir: None,
        }
    }

    /// Directory the generated file will live in. Output paths under it are
    /// written relative to `__dirname` so the project can be moved.
    pub fn relative_to(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(base_dir.as_ref().to_path_buf());
        self
    }

    /// Generate the complete config module source
    pub fn generate(&self) -> String {
        let mut output = String::new();

        output.push_str("const path = require('path');\n\n");
        output.push_str("module.exports = {\n");

        output.push_str("  entry: {\n");
        for (name, source) in self.config.entries.iter() {
            output.push_str(&format!("    {}: {},\n", js_string(name), js_string(source)));
        }
        output.push_str("  },\n");

        output.push_str("  output: {\n");
        output.push_str(&format!(
            "    filename: {},\n",
            js_string(&self.config.output.file_name_pattern)
        ));
        output.push_str(&format!("    path: {},\n", self.output_path_expr()));
        output.push_str("  },\n");

        output.push_str("  externals: {\n");
        for (import, global) in self.config.externals.iter() {
            output.push_str(&format!("    {}: {},\n", js_key(import), js_string(global)));
        }
        output.push_str("  },\n");

        output.push_str("};\n");
        output
    }

    /// Pretty JSON form of the same configuration
    pub fn generate_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.config)
    }

    fn output_path_expr(&self) -> String {
        let dir = &self.config.output.directory;

        let relative = match self.base_dir.as_deref() {
            Some(base) if dir.is_absolute() => dir.strip_prefix(base).ok().map(Path::to_path_buf),
            Some(base) => relative_from(base, dir),
            None if dir.is_relative() => Some(dir.to_path_buf()),
            None => None,
        };

        match relative {
            Some(rel) => {
                let rel = to_posix(&rel);
                let rel = if rel.is_empty() {
                    ".".to_string()
                } else if rel.starts_with("./") || rel.starts_with("../") || rel == ".." {
                    rel
                } else {
                    format!("./{}", rel)
                };
                format!("path.resolve(__dirname, {})", js_string(&rel))
            }
            None => js_string(&to_posix(dir)),
        }
    }
}

/// Path of `dir` as seen from `base`, both relative to the same working directory.
/// `None` when `base` climbs out through `..` and the walk back cannot be known.
fn relative_from(base: &Path, dir: &Path) -> Option<PathBuf> {
    if base.is_absolute() {
        return None;
    }
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let dir: Vec<Component> = dir.components().filter(|c| *c != Component::CurDir).collect();

    let common = base
        .iter()
        .zip(dir.iter())
        .take_while(|(b, d)| b == d)
        .count();

    let mut out = PathBuf::new();
    for component in &base[common..] {
        match component {
            Component::Normal(_) => out.push(".."),
            _ => return None,
        }
    }
    for component in &dir[common..] {
        out.push(component.as_os_str());
    }
    Some(out)
}

fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Single-quoted JavaScript string literal
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Object key: bare when it is a plain identifier, quoted otherwise
fn js_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_ident {
        key.to_string()
    } else {
        js_string(key)
    }
}
