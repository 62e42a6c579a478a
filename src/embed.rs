//! Widget Embed
//!
//! Snippets that install a voice agent's call widget on a third-party site,
//! either as a script tag or as a plain iframe. Both reference the agent by
//! its public identifier and carry a `position` and a `theme`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Corner of the host page the widget is pinned to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl EmbedPosition {
    pub const ALL: [EmbedPosition; 4] = [
        EmbedPosition::BottomRight,
        EmbedPosition::BottomLeft,
        EmbedPosition::TopRight,
        EmbedPosition::TopLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedPosition::BottomRight => "bottom-right",
            EmbedPosition::BottomLeft => "bottom-left",
            EmbedPosition::TopRight => "top-right",
            EmbedPosition::TopLeft => "top-left",
        }
    }

    /// CSS offsets for a fixed-position iframe
    fn css_offsets(&self) -> &'static str {
        match self {
            EmbedPosition::BottomRight => "bottom:20px;right:20px",
            EmbedPosition::BottomLeft => "bottom:20px;left:20px",
            EmbedPosition::TopRight => "top:20px;right:20px",
            EmbedPosition::TopLeft => "top:20px;left:20px",
        }
    }
}

impl fmt::Display for EmbedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedPosition {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| EmbedError::InvalidPosition(s.to_string()))
    }
}

/// Widget color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedTheme {
    #[default]
    Light,
    Dark,
    /// Follow the visitor's `prefers-color-scheme`
    Auto,
}

impl EmbedTheme {
    pub const ALL: [EmbedTheme; 3] = [EmbedTheme::Light, EmbedTheme::Dark, EmbedTheme::Auto];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedTheme::Light => "light",
            EmbedTheme::Dark => "dark",
            EmbedTheme::Auto => "auto",
        }
    }
}

impl fmt::Display for EmbedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbedTheme {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| EmbedError::InvalidTheme(s.to_string()))
    }
}

/// Snippet flavor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    #[default]
    Script,
    Iframe,
}

impl FromStr for EmbedKind {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "script" => Ok(EmbedKind::Script),
            "iframe" => Ok(EmbedKind::Iframe),
            other => Err(EmbedError::InvalidKind(other.to_string())),
        }
    }
}

/// Errors building an embed snippet
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Agent id is required")]
    MissingAgentId,

    #[error("Invalid position '{0}' (expected bottom-right, bottom-left, top-right or top-left)")]
    InvalidPosition(String),

    #[error("Invalid theme '{0}' (expected light, dark or auto)")]
    InvalidTheme(String),

    #[error("Invalid embed kind '{0}' (expected script or iframe)")]
    InvalidKind(String),
}

/// Everything a snippet needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    pub agent_id: String,
    pub position: EmbedPosition,
    pub theme: EmbedTheme,
}

impl EmbedOptions {
    pub fn new(agent_id: impl Into<String>) -> Result<Self, EmbedError> {
        let agent_id = agent_id.into().trim().to_string();
        if agent_id.is_empty() {
            return Err(EmbedError::MissingAgentId);
        }
        Ok(Self {
            agent_id,
            position: EmbedPosition::default(),
            theme: EmbedTheme::default(),
        })
    }

    /// Build from raw query/attribute values; absent values take defaults,
    /// unknown values are rejected.
    pub fn parse(
        agent_id: &str,
        position: Option<&str>,
        theme: Option<&str>,
    ) -> Result<Self, EmbedError> {
        let mut options = Self::new(agent_id)?;
        if let Some(p) = position {
            options.position = p.parse()?;
        }
        if let Some(t) = theme {
            options.theme = t.parse()?;
        }
        Ok(options)
    }

    pub fn position(mut self, position: EmbedPosition) -> Self {
        self.position = position;
        self
    }

    pub fn theme(mut self, theme: EmbedTheme) -> Self {
        self.theme = theme;
        self
    }

    /// URL of the hosted widget page for this agent
    pub fn widget_url(&self, base_url: &str) -> String {
        format!(
            "{}/embed/{}?position={}&theme={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.agent_id),
            self.position,
            self.theme
        )
    }

    /// `<script>` snippet that injects the widget
    pub fn script_tag(&self, base_url: &str) -> String {
        format!(
            r#"<script src="{}/widget.js" data-agent-id="{}" data-position="{}" data-theme="{}" async></script>"#,
            escape_attr(base_url.trim_end_matches('/')),
            escape_attr(&self.agent_id),
            self.position,
            self.theme
        )
    }

    /// `<iframe>` snippet pinned to the configured corner
    pub fn iframe_tag(&self, base_url: &str) -> String {
        format!(
            r#"<iframe src="{}" title="Voice agent" allow="microphone" style="position:fixed;{};width:400px;height:600px;border:0;z-index:2147483647"></iframe>"#,
            escape_attr(&self.widget_url(base_url)),
            self.position.css_offsets()
        )
    }

    pub fn snippet(&self, kind: EmbedKind, base_url: &str) -> String {
        match kind {
            EmbedKind::Script => self.script_tag(base_url),
            EmbedKind::Iframe => self.iframe_tag(base_url),
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
