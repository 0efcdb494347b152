//! Mapping of abstract spacing and alignment settings to layout primitives.
//!
//! Element and section properties are an open mapping, so every resolver here
//! tolerates missing or unrecognised values and falls back to a default.

use crate::model::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Vertical margin applied when an element carries no margin settings.
pub const DEFAULT_VERTICAL_MARGIN: f64 = 16.0;

/// Minimum height of an `auto` section.
pub const AUTO_SECTION_MIN_HEIGHT: f64 = 128.0;

/// Pixel offsets on each side of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets::uniform(0.0);

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub const fn vertical(value: f64) -> Self {
        Self {
            top: value,
            right: 0.0,
            bottom: value,
            left: 0.0,
        }
    }
}

/// Per-side margin settings; unset sides are left out of the style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl Margins {
    /// Resolve to insets, treating unset sides as zero.
    pub fn to_insets(self) -> Insets {
        Insets {
            top: self.top.unwrap_or(0.0),
            right: self.right.unwrap_or(0.0),
            bottom: self.bottom.unwrap_or(0.0),
            left: self.left.unwrap_or(0.0),
        }
    }
}

/// Named margin sizes used by older documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    None,
    Small,
    #[default]
    Normal,
    Large,
}

impl MarginPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "none" => MarginPreset::None,
            "small" => MarginPreset::Small,
            "large" => MarginPreset::Large,
            _ => MarginPreset::Normal,
        }
    }

    pub fn insets(self) -> Insets {
        match self {
            MarginPreset::None => Insets::ZERO,
            MarginPreset::Small => Insets::vertical(8.0),
            MarginPreset::Normal => Insets::vertical(DEFAULT_VERTICAL_MARGIN),
            MarginPreset::Large => Insets::vertical(32.0),
        }
    }
}

/// Resolve an element's outer margins from its properties.
///
/// A `margins` object wins; a legacy string `margin` preset is used next;
/// otherwise the default vertical margin applies.
pub fn element_margins(properties: &Properties) -> Insets {
    if let Some(margins) = properties.get("margins") {
        if let Ok(margins) = serde_json::from_value::<Margins>(margins.clone()) {
            return margins.to_insets();
        }
    }
    match properties.get("margin").and_then(Value::as_str) {
        Some(preset) => MarginPreset::parse(preset).insets(),
        None => Insets::vertical(DEFAULT_VERTICAL_MARGIN),
    }
}

/// Main-axis or cross-axis placement of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Start,
    Center,
    End,
    Stretch,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn parse(value: &str) -> Self {
        match value {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            "justify" => TextAlign::Justify,
            _ => TextAlign::Left,
        }
    }

    pub fn justify(self) -> Justify {
        match self {
            TextAlign::Left => Justify::Start,
            TextAlign::Center => Justify::Center,
            TextAlign::Right => Justify::End,
            TextAlign::Justify => Justify::Stretch,
        }
    }
}

/// Horizontal placement of an image block within its column.
pub fn image_alignment(value: Option<&str>) -> Justify {
    match value {
        Some("left") => Justify::Start,
        Some("right") => Justify::End,
        _ => Justify::Center,
    }
}

/// How tall a section is allowed to be.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SectionHeight {
    #[default]
    Auto,
    Screen,
    Half,
    Custom(Option<f64>),
}

impl SectionHeight {
    pub fn from_properties(properties: &Properties) -> Self {
        match properties.get("height").and_then(Value::as_str) {
            Some("screen") => SectionHeight::Screen,
            Some("half") => SectionHeight::Half,
            Some("custom") => {
                SectionHeight::Custom(properties.get("customHeight").and_then(Value::as_f64))
            }
            _ => SectionHeight::Auto,
        }
    }

    /// Minimum height in pixels for a viewport of `viewport_height`.
    pub fn min_height(self, viewport_height: f64) -> f64 {
        match self {
            SectionHeight::Auto => AUTO_SECTION_MIN_HEIGHT,
            SectionHeight::Screen => viewport_height,
            SectionHeight::Half => viewport_height / 2.0,
            SectionHeight::Custom(Some(height)) => height.max(0.0),
            SectionHeight::Custom(None) => AUTO_SECTION_MIN_HEIGHT,
        }
    }
}

/// Inner padding presets for sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionPadding {
    None,
    Small,
    #[default]
    Normal,
    Large,
    ExtraLarge,
}

impl SectionPadding {
    pub fn parse(value: &str) -> Self {
        match value {
            "none" | "0" => SectionPadding::None,
            "small" => SectionPadding::Small,
            "large" => SectionPadding::Large,
            "xl" => SectionPadding::ExtraLarge,
            _ => SectionPadding::Normal,
        }
    }

    pub fn pixels(self) -> f64 {
        match self {
            SectionPadding::None => 0.0,
            SectionPadding::Small => 16.0,
            SectionPadding::Normal => 24.0,
            SectionPadding::Large => 48.0,
            SectionPadding::ExtraLarge => 64.0,
        }
    }
}

/// Vertical placement of a section's content.
pub fn content_alignment(value: Option<&str>) -> Justify {
    match value {
        Some("center") => Justify::Center,
        Some("bottom") => Justify::End,
        _ => Justify::Start,
    }
}

/// Section background.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(String),
    Image(String),
}

/// Resolved layout settings of a section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStyle {
    pub min_height: f64,
    pub padding: Insets,
    pub content_alignment: Justify,
    pub background: Background,
}

impl SectionStyle {
    pub fn from_properties(properties: &Properties, viewport_height: f64) -> Self {
        let text = |key: &str| properties.get(key).and_then(Value::as_str);

        let padding = text("padding")
            .map(SectionPadding::parse)
            .unwrap_or_default()
            .pixels();

        let background = match (text("backgroundType"), text("backgroundImage")) {
            (Some("image"), Some(url)) => Background::Image(url.to_string()),
            _ => Background::Color(text("backgroundColor").unwrap_or("#ffffff").to_string()),
        };

        Self {
            min_height: SectionHeight::from_properties(properties).min_height(viewport_height),
            padding: Insets::uniform(padding),
            content_alignment: content_alignment(text("contentAlignment")),
            background,
        }
    }
}
