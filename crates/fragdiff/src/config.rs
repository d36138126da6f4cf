//! Configuration for the renderer.
//!
//! Loads `~/.config/fragdiff/config.toml`, then merges in `./.fragdiff.toml`
//! (per-project overrides global) field by field, scaled down to the one
//! section this tool actually has to configure.

use std::io::IsTerminal;
use std::path::Path;

use nu_ansi_term::Color::Cyan;
use serde::Deserialize;

/// Color mode for section banners and the startup header. Never applied to
/// the `---`/`+++`/`===`/`###`/context line prefixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Context lines kept at each end of an elided unmatched-var block
    /// Default: 2.
    pub gap: Option<usize>,
    pub colors: Option<ColorMode>,
}

impl RenderConfig {
    pub fn gap(&self) -> usize {
        self.gap.unwrap_or(2)
    }

    pub fn use_colors(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        match self.colors.unwrap_or_default() {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Wraps `text` in bold cyan when colors are enabled, otherwise returns
    /// it unchanged. Reserved for section banners and the startup header
    /// -- never the `---`/`+++`/`===`/`###`/context line prefixes.
    pub fn paint(&self, text: &str) -> String {
        if self.use_colors() {
            Cyan.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Config {
    render: RenderConfig,
}

impl RenderConfig {
    /// Loads the global config, then overrides with `./.fragdiff.toml`,
    /// field by field (`Option::or`, no `Merge` derive -- there is only one
    /// section to merge).
    pub fn load(project_root: &Path) -> Self {
        let global = Config::load_file(&Self::global_path()).unwrap_or_default().render;
        let project = Config::load_file(&project_root.join(".fragdiff.toml")).unwrap_or_default().render;

        RenderConfig {
            gap: project.gap.or(global.gap),
            colors: project.colors.or(global.colors),
        }
    }

    fn global_path() -> std::path::PathBuf {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(std::path::PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")));
        config_home
            .unwrap_or_default()
            .join("fragdiff")
            .join("config.toml")
    }
}

impl Config {
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gap_is_two() {
        assert_eq!(RenderConfig::default().gap(), 2);
    }

    #[test]
    fn explicit_gap_overrides_default() {
        let cfg = RenderConfig { gap: Some(5), colors: None };
        assert_eq!(cfg.gap(), 5);
    }

    #[test]
    fn never_disables_colors_even_on_a_tty() {
        let cfg = RenderConfig { gap: None, colors: Some(ColorMode::Never) };
        assert!(!cfg.use_colors());
    }
}
