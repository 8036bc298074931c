//! Code editor title parsing.
//!
//! Editor titles look like `"main.rs - myproject - Visual Studio Code"`. The
//! leading segment is the open file; its extension selects the language shown
//! as the large icon.

use lazy_static::lazy_static;
use std::collections::HashMap;

const FILE_SEPARATOR: &str = " - ";

/// Display name and asset key for a source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub icon_key: &'static str,
}

impl Language {
    const fn new(name: &'static str, icon_key: &'static str) -> Self {
        Self { name, icon_key }
    }
}

/// Used for unknown or missing extensions
pub const FALLBACK_LANGUAGE: Language = Language::new("VS Code", "vscode_icon");

/// Extension → language table
const LANGUAGES: &[(&str, Language)] = &[
    // Web
    ("js", Language::new("JavaScript", "javascript_icon")),
    ("jsx", Language::new("React JSX", "react_icon")),
    ("ts", Language::new("TypeScript", "typescript_icon")),
    ("tsx", Language::new("React TSX", "react_icon")),
    ("html", Language::new("HTML", "html_icon")),
    ("htm", Language::new("HTML", "html_icon")),
    ("css", Language::new("CSS", "css_icon")),
    ("scss", Language::new("SCSS", "sass_icon")),
    ("sass", Language::new("Sass", "sass_icon")),
    ("less", Language::new("Less", "css_icon")),
    ("vue", Language::new("Vue.js", "vue_icon")),
    ("svelte", Language::new("Svelte", "svelte_icon")),
    // Backend
    ("py", Language::new("Python", "python_icon")),
    ("java", Language::new("Java", "java_icon")),
    ("cs", Language::new("C#", "csharp_icon")),
    ("cpp", Language::new("C++", "cpp_icon")),
    ("c", Language::new("C", "c_icon")),
    ("h", Language::new("C/C++ Header", "cpp_icon")),
    ("hpp", Language::new("C++ Header", "cpp_icon")),
    ("go", Language::new("Go", "go_icon")),
    ("rs", Language::new("Rust", "rust_icon")),
    ("php", Language::new("PHP", "php_icon")),
    ("rb", Language::new("Ruby", "ruby_icon")),
    ("swift", Language::new("Swift", "swift_icon")),
    ("kt", Language::new("Kotlin", "kotlin_icon")),
    ("scala", Language::new("Scala", "scala_icon")),
    // Shell
    ("sh", Language::new("Shell Script", "bash_icon")),
    ("bash", Language::new("Bash", "bash_icon")),
    ("zsh", Language::new("Zsh", "bash_icon")),
    ("ps1", Language::new("PowerShell", "powershell_icon")),
    ("bat", Language::new("Batch Script", "cmd_icon")),
    ("cmd", Language::new("Command Script", "cmd_icon")),
    // Data & config
    ("json", Language::new("JSON", "json_icon")),
    ("xml", Language::new("XML", "xml_icon")),
    ("yaml", Language::new("YAML", "yaml_icon")),
    ("yml", Language::new("YAML", "yaml_icon")),
    ("toml", Language::new("TOML", "toml_icon")),
    ("ini", Language::new("INI Config", "config_icon")),
    ("conf", Language::new("Config", "config_icon")),
    ("sql", Language::new("SQL", "sql_icon")),
    // Docs
    ("md", Language::new("Markdown", "markdown_icon")),
    ("mdx", Language::new("MDX", "markdown_icon")),
    ("txt", Language::new("Text", "text_icon")),
    ("rst", Language::new("reStructuredText", "text_icon")),
];

lazy_static! {
    static ref LANGUAGE_BY_EXTENSION: HashMap<&'static str, Language> =
        LANGUAGES.iter().copied().collect();
}

/// Open file name: the text before the first `" - "`, or the whole title
pub fn file_name(title: &str) -> &str {
    match title.find(FILE_SEPARATOR) {
        Some(index) if index > 0 => title[..index].trim(),
        _ => title,
    }
}

/// Lowercased extension after the last dot.
///
/// Dotfiles (`.gitignore`) and names ending in a dot have no extension.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(index) if index > 0 && index < file_name.len() - 1 => {
            file_name[index + 1..].to_lowercase()
        }
        _ => String::new(),
    }
}

pub fn language_for_extension(extension: &str) -> Language {
    LANGUAGE_BY_EXTENSION
        .get(extension)
        .copied()
        .unwrap_or(FALLBACK_LANGUAGE)
}

/// Number of known extensions
pub fn known_extension_count() -> usize {
    LANGUAGE_BY_EXTENSION.len()
}
