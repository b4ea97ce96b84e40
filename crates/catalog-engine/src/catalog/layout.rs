//! Per-product presentation overrides.

use serde::{Deserialize, Serialize};

/// Image height on the product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(ImageSize::Small),
            "medium" => Some(ImageSize::Medium),
            "large" => Some(ImageSize::Large),
            _ => None,
        }
    }
}

/// Text alignment on the product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(TextAlignment::Left),
            "center" => Some(TextAlignment::Center),
            "right" => Some(TextAlignment::Right),
            _ => None,
        }
    }
}

/// Card border treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    None,
    Rounded,
    Shadowed,
    #[default]
    Outlined,
}

impl BorderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Rounded => "rounded",
            BorderStyle::Shadowed => "shadowed",
            BorderStyle::Outlined => "outlined",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(BorderStyle::None),
            "rounded" => Some(BorderStyle::Rounded),
            "shadowed" => Some(BorderStyle::Shadowed),
            "outlined" => Some(BorderStyle::Outlined),
            _ => None,
        }
    }
}

/// Display configuration layered over the default product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationOverride {
    #[serde(default)]
    pub image_size: ImageSize,
    #[serde(default)]
    pub text_alignment: TextAlignment,
    #[serde(default = "default_true")]
    pub show_description: bool,
    #[serde(default = "default_true")]
    pub show_price: bool,
    #[serde(default)]
    pub border_style: BorderStyle,
}

fn default_true() -> bool {
    true
}

impl Default for PresentationOverride {
    fn default() -> Self {
        Self {
            image_size: ImageSize::Medium,
            text_alignment: TextAlignment::Left,
            show_description: true,
            show_price: true,
            border_style: BorderStyle::Outlined,
        }
    }
}

impl PresentationOverride {
    /// Return a copy with `patch` merged in.
    pub fn merged(mut self, patch: &LayoutPatch) -> Self {
        patch.apply_to(&mut self);
        self
    }
}

/// A partial presentation override. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<TextAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_description: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_price: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
}

impl LayoutPatch {
    pub fn image_size(mut self, size: ImageSize) -> Self {
        self.image_size = Some(size);
        self
    }

    pub fn text_alignment(mut self, alignment: TextAlignment) -> Self {
        self.text_alignment = Some(alignment);
        self
    }

    pub fn show_description(mut self, show: bool) -> Self {
        self.show_description = Some(show);
        self
    }

    pub fn show_price(mut self, show: bool) -> Self {
        self.show_price = Some(show);
        self
    }

    pub fn border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = Some(style);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == LayoutPatch::default()
    }

    /// Merge the set fields into `layout`.
    pub fn apply_to(&self, layout: &mut PresentationOverride) {
        if let Some(size) = self.image_size {
            layout.image_size = size;
        }
        if let Some(alignment) = self.text_alignment {
            layout.text_alignment = alignment;
        }
        if let Some(show) = self.show_description {
            layout.show_description = show;
        }
        if let Some(show) = self.show_price {
            layout.show_price = show;
        }
        if let Some(style) = self.border_style {
            layout.border_style = style;
        }
    }
}
