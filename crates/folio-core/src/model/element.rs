//! Page elements: text, containers, dividers and sections.

use crate::model::grid_item::GridItem;
use crate::model::new_id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Open mapping of style/config keys. Unknown keys are preserved.
pub type Properties = Map<String, Value>;

/// Placeholder content for freshly created text.
pub const DEFAULT_TEXT_CONTENT: &str = "Click to edit text";

/// Tag of a [`PortfolioElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Video,
    Hr,
    Section,
}

impl ElementType {
    pub fn label(self) -> &'static str {
        match self {
            ElementType::Text => "Text",
            ElementType::Image => "Image Container",
            ElementType::Video => "Video",
            ElementType::Hr => "Divider",
            ElementType::Section => "Section",
        }
    }

    /// Containers host free-positioned grid items.
    pub fn is_container(self) -> bool {
        matches!(self, ElementType::Image | ElementType::Video)
    }
}

/// Per-kind payload of a [`PortfolioElement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Text {
        #[serde(default)]
        content: String,
    },
    Image {
        #[serde(default)]
        items: Vec<GridItem>,
    },
    Video {
        #[serde(default)]
        items: Vec<GridItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
        /// URL of a directly embedded video.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Hr,
    Section {
        #[serde(default)]
        children: Vec<PortfolioElement>,
    },
}

impl ElementKind {
    /// Empty payload for a freshly created element of `element_type`.
    pub fn empty(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => ElementKind::Text {
                content: DEFAULT_TEXT_CONTENT.to_string(),
            },
            ElementType::Image => ElementKind::Image { items: Vec::new() },
            ElementType::Video => ElementKind::Video {
                items: Vec::new(),
                media_id: None,
                content: None,
            },
            ElementType::Hr => ElementKind::Hr,
            ElementType::Section => ElementKind::Section {
                children: Vec::new(),
            },
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Video { .. } => ElementType::Video,
            ElementKind::Hr => ElementType::Hr,
            ElementKind::Section { .. } => ElementType::Section,
        }
    }
}

/// One placed unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioElement {
    pub id: String,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default)]
    pub properties: Properties,
    /// Id of the containing section. A lookup key only; containment is
    /// defined by the section's `children`.
    #[serde(default, rename = "sectionId", skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl PortfolioElement {
    /// Create an element with a fresh id.
    pub fn new(kind: ElementKind, properties: Properties) -> Self {
        Self {
            id: new_id("element"),
            kind,
            properties,
            section_id: None,
        }
    }

    /// Create an element of `element_type` with its default properties.
    pub fn with_defaults(element_type: ElementType, is_first_section: bool) -> Self {
        Self::new(
            ElementKind::empty(element_type),
            default_properties(element_type, is_first_section),
        )
    }

    /// The section seeded into an empty layout.
    pub fn default_section() -> Self {
        let mut properties = default_properties(ElementType::Section, true);
        properties.insert("title".into(), json!("Main Section"));
        Self {
            id: new_id("section"),
            kind: ElementKind::empty(ElementType::Section),
            properties,
            section_id: None,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, ElementKind::Section { .. })
    }

    pub fn children(&self) -> Option<&[PortfolioElement]> {
        match &self.kind {
            ElementKind::Section { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<PortfolioElement>> {
        match &mut self.kind {
            ElementKind::Section { children } => Some(children),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&[GridItem]> {
        match &self.kind {
            ElementKind::Image { items } | ElementKind::Video { items, .. } => Some(items),
            _ => None,
        }
    }

    /// String property lookup.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Human readable title used by overlays and menus.
    pub fn display_label(&self) -> String {
        match &self.kind {
            ElementKind::Section { .. } => self
                .property_str("title")
                .unwrap_or("Untitled Section")
                .to_string(),
            ElementKind::Text { content } => {
                let mut label: String = content.chars().take(40).collect();
                if content.chars().count() > 40 {
                    label.push('…');
                }
                label
            }
            _ => self.element_type().label().to_string(),
        }
    }

    /// Shallow-merge a partial update. Fields that do not exist on this
    /// element's kind are ignored.
    pub fn apply(&mut self, update: ElementUpdate) {
        let ElementUpdate {
            content,
            items,
            media_id,
            properties,
            children,
        } = update;

        if let Some(properties) = properties {
            self.properties = properties;
        }

        match &mut self.kind {
            ElementKind::Text { content: current } => {
                if let Some(content) = content {
                    *current = content;
                }
            }
            ElementKind::Image { items: current } => {
                if let Some(items) = items {
                    *current = sanitize_items(items);
                }
            }
            ElementKind::Video {
                items: current_items,
                media_id: current_media,
                content: current_content,
            } => {
                if let Some(items) = items {
                    *current_items = sanitize_items(items);
                }
                if let Some(media_id) = media_id {
                    *current_media = media_id;
                }
                if let Some(content) = content {
                    *current_content = Some(content);
                }
            }
            ElementKind::Hr => {}
            ElementKind::Section { children: current } => {
                if let Some(children) = children {
                    let section_id = self.id.clone();
                    *current = children
                        .into_iter()
                        .filter(|child| {
                            let keep = !child.is_section();
                            if !keep {
                                log::debug!("Dropping nested section {} from {}", child.id, section_id);
                            }
                            keep
                        })
                        .map(|mut child| {
                            child.section_id = Some(section_id.clone());
                            child
                        })
                        .collect();
                }
            }
        }
    }
}

fn sanitize_items(mut items: Vec<GridItem>) -> Vec<GridItem> {
    for item in &mut items {
        item.clamp_non_negative();
    }
    items
}

/// Partial update for a [`PortfolioElement`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUpdate {
    pub content: Option<String>,
    pub items: Option<Vec<GridItem>>,
    pub media_id: Option<Option<String>>,
    pub properties: Option<Properties>,
    pub children: Option<Vec<PortfolioElement>>,
}

impl ElementUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn items(items: Vec<GridItem>) -> Self {
        Self {
            items: Some(items),
            ..Default::default()
        }
    }
}

/// Property set given to new elements of each type.
pub fn default_properties(element_type: ElementType, is_first_section: bool) -> Properties {
    let margins = json!({ "top": 16, "bottom": 16, "left": 0, "right": 0 });
    let value = match element_type {
        ElementType::Text => json!({
            "fontSize": 16,
            "fontWeight": "normal",
            "fontFamily": "var(--font-inter)",
            "color": "#000000",
            "textAlign": "left",
            "margins": margins,
        }),
        ElementType::Image => json!({
            "columns": 3,
            "spacing": 8,
            "alignment": "center",
            "margins": margins,
        }),
        ElementType::Video => json!({
            "width": 400,
            "height": 225,
            "controls": true,
            "autoplay": false,
            "loop": false,
            "muted": false,
            "margins": margins,
        }),
        ElementType::Hr => json!({ "thickness": 1, "width": 100, "color": "#e5e7eb" }),
        ElementType::Section => json!({
            "title": "New Section",
            "backgroundColor": "#ffffff",
            "padding": "normal",
            "height": if is_first_section { "screen" } else { "auto" },
            "contentAlignment": "top",
        }),
    };
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn test_element_wire_shape() {
        let mut element = PortfolioElement::with_defaults(ElementType::Text, false);
        element.section_id = Some("section-1".into());
        let json = serde_json::to_value(&element).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], DEFAULT_TEXT_CONTENT);
        assert_eq!(json["sectionId"], "section-1");
        assert_eq!(json["properties"]["fontSize"], 16);

        let back: PortfolioElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_hr_has_no_payload() {
        let json = r##"{"id":"hr-1","type":"hr","properties":{"color":"#000"}}"##;
        let element: PortfolioElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind, ElementKind::Hr);
        assert_eq!(element.property_str("color"), Some("#000"));
    }

    #[test]
    fn test_section_defaults_depend_on_position() {
        let first = default_properties(ElementType::Section, true);
        let later = default_properties(ElementType::Section, false);
        assert_eq!(first["height"], "screen");
        assert_eq!(later["height"], "auto");
    }

    #[test]
    fn test_update_ignores_foreign_fields() {
        let mut hr = PortfolioElement::with_defaults(ElementType::Hr, false);
        hr.apply(ElementUpdate::content("ignored"));
        assert_eq!(hr.kind, ElementKind::Hr);

        let mut text = PortfolioElement::with_defaults(ElementType::Text, false);
        text.apply(ElementUpdate::content("Hello"));
        assert_eq!(text.kind, ElementKind::Text { content: "Hello".into() });
    }

    #[test]
    fn test_update_items_clamps_negatives() {
        let mut image = PortfolioElement::with_defaults(ElementType::Image, false);
        let mut item = GridItem::text("t", "x", Rect::new(0.0, 0.0, 100.0, 100.0));
        item.x = -40.0;
        image.apply(ElementUpdate::items(vec![item]));
        assert_eq!(image.items().map(|items| items[0].x), Some(0.0));
    }

    #[test]
    fn test_section_children_update_rejects_nested_sections() {
        let mut section = PortfolioElement::with_defaults(ElementType::Section, false);
        let nested = PortfolioElement::with_defaults(ElementType::Section, false);
        let text = PortfolioElement::with_defaults(ElementType::Text, false);
        section.apply(ElementUpdate {
            children: Some(vec![nested, text.clone()]),
            ..Default::default()
        });

        let children = section.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, text.id);
        assert_eq!(children[0].section_id.as_deref(), Some(section.id.as_str()));
    }
}
