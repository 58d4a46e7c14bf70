use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A bounded region: everything from a line containing `start` up to and
/// including the next line containing `end` is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutePair {
    pub start: String,
    pub end: String,
}

impl MutePair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Wrap lines containing `phrase` (case-insensitive) in the given colors.
///
/// Color names are the crossterm ones: `red`, `dark_red`, `blue`, `white`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    pub phrase: String,
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
}

impl HighlightRule {
    pub fn new(phrase: impl Into<String>, fg: Option<&str>, bg: Option<&str>) -> Self {
        Self {
            phrase: phrase.into(),
            fg: fg.map(str::to_string),
            bg: bg.map(str::to_string),
        }
    }
}

/// Rule tables for one triage engine. Deserialised from the `[triage]`
/// section of the config file; defaults reproduce the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageRules {
    #[serde(default = "default_mute_lines")]
    pub mute_lines: Vec<String>,

    #[serde(default = "default_mute_pairs")]
    pub mute_pairs: Vec<MutePair>,

    #[serde(default = "default_highlights")]
    pub highlights: Vec<HighlightRule>,

    /// Lines longer than this many bytes are truncated.
    #[serde(default = "default_truncate_over")]
    pub truncate_over: usize,

    /// Number of bytes kept from a truncated line.
    #[serde(default = "default_truncate_to")]
    pub truncate_to: usize,
}

fn default_mute_lines() -> Vec<String> {
    vec![
        " level=info ".to_string(),
        // curl progress meter and request echo
        "--:--:--".to_string(),
        "Average Speed   Time".to_string(),
        "Dload  Upload".to_string(),
        "GET / HTTP/1.1".to_string(),
    ]
}

fn default_mute_pairs() -> Vec<MutePair> {
    // verbose curl output dumping a whole page
    vec![MutePair::new("<!DOCTYPE html>", "</html>")]
}

fn default_highlights() -> Vec<HighlightRule> {
    vec![
        // standard 8-colour palette: white on red, white on blue
        HighlightRule::new("error", Some("grey"), Some("dark_red")),
        HighlightRule::new("error trace:", Some("grey"), Some("dark_blue")),
    ]
}

fn default_truncate_over() -> usize {
    400
}

fn default_truncate_to() -> usize {
    200
}

impl Default for TriageRules {
    fn default() -> Self {
        Self {
            mute_lines: default_mute_lines(),
            mute_pairs: default_mute_pairs(),
            highlights: default_highlights(),
            truncate_over: default_truncate_over(),
            truncate_to: default_truncate_to(),
        }
    }
}

impl TriageRules {
    /// Validate the tables and pre-render everything the engine needs per line.
    ///
    /// With `color == false` highlight rules are still validated but lines are
    /// never wrapped.
    pub fn compile(&self, color: bool) -> Result<CompiledRules, ConfigError> {
        if self.truncate_to > self.truncate_over {
            return Err(ConfigError::TruncateBounds {
                over: self.truncate_over,
                to: self.truncate_to,
            });
        }

        let mut mute_lines = Vec::with_capacity(self.mute_lines.len());
        for (index, phrase) in self.mute_lines.iter().enumerate() {
            if phrase.is_empty() {
                return Err(ConfigError::EmptyMutePhrase { index });
            }
            mute_lines.push(phrase.as_bytes().to_vec());
        }

        let mut mute_pairs = Vec::with_capacity(self.mute_pairs.len());
        for (index, pair) in self.mute_pairs.iter().enumerate() {
            if pair.start.is_empty() {
                return Err(ConfigError::EmptyMutePair {
                    index,
                    which: "start",
                });
            }
            if pair.end.is_empty() {
                return Err(ConfigError::EmptyMutePair {
                    index,
                    which: "end",
                });
            }
            mute_pairs.push(CompiledPair {
                start: pair.start.as_bytes().to_vec(),
                end: pair.end.as_bytes().to_vec(),
            });
        }

        let mut highlights = Vec::with_capacity(self.highlights.len());
        for (index, rule) in self.highlights.iter().enumerate() {
            if rule.phrase.is_empty() {
                return Err(ConfigError::EmptyHighlightPhrase { index });
            }
            highlights.push(CompiledHighlight {
                phrase: rule.phrase.to_ascii_lowercase().into_bytes(),
                start: color_marker(rule)?.into_bytes(),
            });
        }

        Ok(CompiledRules {
            mute_lines,
            mute_pairs,
            highlights,
            reset: ResetColor.to_string().into_bytes(),
            color,
            truncate_over: self.truncate_over,
            truncate_to: self.truncate_to,
        })
    }
}

fn parse_color(rule: &HighlightRule, name: &str) -> Result<Color, ConfigError> {
    Color::try_from(name.trim()).map_err(|_| ConfigError::UnknownColor {
        phrase: rule.phrase.clone(),
        color: name.to_string(),
    })
}

fn color_marker(rule: &HighlightRule) -> Result<String, ConfigError> {
    let mut marker = String::new();
    if let Some(bg) = rule.bg.as_deref() {
        marker.push_str(&SetBackgroundColor(parse_color(rule, bg)?).to_string());
    }
    if let Some(fg) = rule.fg.as_deref() {
        marker.push_str(&SetForegroundColor(parse_color(rule, fg)?).to_string());
    }
    Ok(marker)
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledPair {
    pub(crate) start: Vec<u8>,
    pub(crate) end: Vec<u8>,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledHighlight {
    /// Lower-cased.
    pub(crate) phrase: Vec<u8>,
    pub(crate) start: Vec<u8>,
}

/// Immutable, validated rule tables shared by every pass of an engine.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub(crate) mute_lines: Vec<Vec<u8>>,
    pub(crate) mute_pairs: Vec<CompiledPair>,
    pub(crate) highlights: Vec<CompiledHighlight>,
    pub(crate) reset: Vec<u8>,
    pub(crate) color: bool,
    pub(crate) truncate_over: usize,
    pub(crate) truncate_to: usize,
}

impl CompiledRules {
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// The escape sequence closing a highlighted line.
    pub fn reset_marker(&self) -> &[u8] {
        &self.reset
    }

    /// The opening escape sequence of the highlight rule at `index`.
    pub fn highlight_marker(&self, index: usize) -> Option<&[u8]> {
        self.highlights.get(index).map(|h| h.start.as_slice())
    }
}

impl Default for CompiledRules {
    fn default() -> Self {
        match TriageRules::default().compile(true) {
            Ok(rules) => rules,
            Err(e) => unreachable!("built-in triage rules are invalid: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_compile() {
        let rules = TriageRules::default().compile(true).unwrap();
        assert_eq!(rules.mute_lines.len(), 5);
        assert_eq!(rules.mute_pairs.len(), 1);
        assert_eq!(rules.highlights.len(), 2);
        assert_eq!(rules.reset_marker(), b"\x1b[0m");
        assert!(rules.highlight_marker(0).unwrap().starts_with(b"\x1b["));
    }

    #[test]
    fn default_highlights_use_the_standard_palette() {
        let rules = TriageRules::default().compile(true).unwrap();
        assert_eq!(
            rules.highlight_marker(0).unwrap(),
            b"\x1b[48;5;1m\x1b[38;5;7m"
        );
        assert_eq!(
            rules.highlight_marker(1).unwrap(),
            b"\x1b[48;5;4m\x1b[38;5;7m"
        );
    }

    #[test]
    fn rejects_unknown_color() {
        let mut rules = TriageRules::default();
        rules.highlights = vec![HighlightRule::new("panic", Some("chartreuse"), None)];
        let err = rules.compile(true).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownColor {
                phrase: "panic".into(),
                color: "chartreuse".into()
            }
        );
    }

    #[test]
    fn rejects_empty_tokens() {
        let mut rules = TriageRules::default();
        rules.mute_pairs = vec![MutePair::new("BEGIN", "")];
        assert!(matches!(
            rules.compile(false),
            Err(ConfigError::EmptyMutePair { which: "end", .. })
        ));

        let mut rules = TriageRules::default();
        rules.mute_lines.push(String::new());
        assert!(matches!(
            rules.compile(false),
            Err(ConfigError::EmptyMutePhrase { index: 5 })
        ));
    }

    #[test]
    fn deserializes_partial_table_with_defaults() {
        let rules: TriageRules = toml::from_str(
            r#"
            mute_lines = ["DEBUG"]

            [[highlights]]
            phrase = "panic:"
            bg = "dark_red"
            "#,
        )
        .unwrap();
        assert_eq!(rules.mute_lines, vec!["DEBUG".to_string()]);
        assert_eq!(rules.mute_pairs, default_mute_pairs());
        assert_eq!(rules.highlights[0].fg, None);
        assert_eq!(rules.truncate_over, 400);
        assert!(rules.compile(true).is_ok());
    }
}
