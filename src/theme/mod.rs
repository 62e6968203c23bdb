//! Themes: formatting values, derived layout keys and spec overrides.
//!
//! A theme is loaded from TOML. User values are merged on top of the stock
//! defaults, so a theme file only needs the keys it changes:
//!
//! ```toml
//! name = "Evening"
//!
//! [body]
//! font = "Georgia"
//! orientation = "center"
//!
//! [dropcap]
//! enabled = true
//!
//! [overrides.heading.default-heading-1]
//! fontName = "Futura"
//! fontSize = "#heading1_size#"
//! ```
//!
//! Layout values that depend on other values, such as the column span of the
//! body text, are not stored: they are computed by the methods on [`Theme`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::spec::SpecCatalog;

/// Where the body column sits on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Left,
    Right,
    Center,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Left => "left",
            Orientation::Right => "right",
            Orientation::Center => "center",
        }
    }
}

/// How image galleries are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryType {
    #[default]
    Gallery,
    Mosaic,
}

impl GalleryType {
    pub fn role(self) -> &'static str {
        match self {
            GalleryType::Gallery => "gallery",
            GalleryType::Mosaic => "mosaic",
        }
    }
}

/// Components built from item metadata rather than body content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaComponent {
    Cover,
    Title,
    Byline,
    Intro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub width: u32,
    pub margin: u32,
    pub gutter: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            margin: 100,
            gutter: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BodyConfig {
    pub font: String,
    pub size: u32,
    pub color: String,
    pub link_color: String,
    pub line_height: u32,
    pub tracking: u32,
    pub background_color: String,
    pub orientation: Orientation,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            font: "AvenirNext-Regular".to_string(),
            size: 18,
            color: "#4f4f4f".to_string(),
            link_color: "#428bca".to_string(),
            line_height: 24,
            tracking: 0,
            background_color: "#fafafa".to_string(),
            orientation: Orientation::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropcapConfig {
    pub enabled: bool,
    pub font: String,
    pub color: String,
    pub number_of_lines: u32,
}

impl Default for DropcapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            font: "AvenirNext-Bold".to_string(),
            color: "#4f4f4f".to_string(),
            number_of_lines: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingConfig {
    pub font: String,
    pub color: String,
    /// Font sizes for `h1` through `h6`.
    pub sizes: [u32; 6],
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub tracking: u32,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            font: "AvenirNext-Bold".to_string(),
            color: "#333333".to_string(),
            sizes: [48, 32, 24, 21, 18, 16],
            line_height: 1.3,
            tracking: 0,
        }
    }
}

impl HeadingConfig {
    /// Size and line height for heading `level` (1-6).
    pub fn metrics(&self, level: usize) -> (u32, u32) {
        let size = self.sizes[level.clamp(1, 6) - 1];
        (size, (f64::from(size) * self.line_height).round() as u32)
    }
}

/// Font settings shared by the simple text components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub font: String,
    pub size: u32,
    pub color: String,
    pub line_height: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self::new("AvenirNext-Regular", 18, "#4f4f4f", 24)
    }
}

impl TextConfig {
    fn new(font: &str, size: u32, color: &str, line_height: u32) -> Self {
        Self {
            font: font.to_string(),
            size,
            color: color.to_string(),
            line_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PullquoteConfig {
    pub font: String,
    pub size: u32,
    pub color: String,
    pub line_height: u32,
    pub border_color: String,
    /// Text transform, e.g. `"uppercase"` or `"none"`.
    pub transform: String,
}

impl Default for PullquoteConfig {
    fn default() -> Self {
        Self {
            font: "AvenirNext-Bold".to_string(),
            size: 48,
            color: "#53585f".to_string(),
            line_height: 48,
            border_color: "#53585f".to_string(),
            transform: "uppercase".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockquoteConfig {
    pub font: String,
    pub size: u32,
    pub color: String,
    pub line_height: u32,
    pub background_color: String,
    pub border_color: String,
}

impl Default for BlockquoteConfig {
    fn default() -> Self {
        Self {
            font: "AvenirNext-Regular".to_string(),
            size: 18,
            color: "#4f4f4f".to_string(),
            line_height: 24,
            background_color: "#e1e1e1".to_string(),
            border_color: "#4f4f4f".to_string(),
        }
    }
}

/// A named set of formatting values and spec overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub name: String,
    pub layout: LayoutConfig,
    pub body: BodyConfig,
    pub dropcap: DropcapConfig,
    pub heading: HeadingConfig,
    pub title: TextConfig,
    pub byline: TextConfig,
    /// Byline text; `#author#` and `#date#` are replaced.
    pub byline_format: String,
    pub intro: TextConfig,
    pub caption: TextConfig,
    pub monospace: TextConfig,
    pub pullquote: PullquoteConfig,
    pub blockquote: BlockquoteConfig,
    pub gallery_type: GalleryType,
    /// Show the cover image caption under the header.
    pub cover_caption: bool,
    /// Meta components to emit, in order. Leaving one out disables it.
    pub meta_component_order: Vec<MetaComponent>,
    /// Spec overrides keyed by component, then spec name.
    pub overrides: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            layout: LayoutConfig::default(),
            body: BodyConfig::default(),
            dropcap: DropcapConfig::default(),
            heading: HeadingConfig::default(),
            title: TextConfig::new("AvenirNext-Bold", 48, "#333333", 52),
            byline: TextConfig::new("AvenirNext-Medium", 13, "#7c7c7c", 24),
            byline_format: "by #author# | #date#".to_string(),
            intro: TextConfig::new("AvenirNext-Medium", 18, "#333333", 24),
            caption: TextConfig::new("AvenirNext-Italic", 16, "#4f4f4f", 24),
            monospace: TextConfig::new("Menlo-Regular", 16, "#4f4f4f", 20),
            pullquote: PullquoteConfig::default(),
            blockquote: BlockquoteConfig::default(),
            gallery_type: GalleryType::Gallery,
            cover_caption: false,
            meta_component_order: vec![MetaComponent::Cover, MetaComponent::Title, MetaComponent::Byline],
            overrides: BTreeMap::new(),
        }
    }
}

/// Stock defaults as a TOML value, the base every theme file is merged onto.
pub fn stock_defaults_value() -> Result<toml::Value> {
    Ok(toml::Value::try_from(Theme::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

impl Theme {
    /// Stock theme under another name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Parse a theme from TOML, merged onto the stock defaults.
    ///
    /// Overrides are validated against `catalog`, so a theme file cannot
    /// smuggle in tokens the defaults do not use.
    pub fn from_toml_str(content: &str, catalog: &SpecCatalog) -> Result<Self> {
        let overlay: toml::Value = toml::from_str(content)?;
        let theme: Theme = merge_toml(stock_defaults_value()?, overlay).try_into()?;
        catalog.validate_theme(&theme)?;
        Ok(theme)
    }

    pub fn load(path: &Path, catalog: &SpecCatalog) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content, catalog)
    }

    /// Number of columns in the page grid.
    pub fn layout_columns(&self) -> u32 {
        match self.body.orientation {
            Orientation::Center => 9,
            _ => 7,
        }
    }

    /// Columns spanned by body text.
    pub fn body_column_span(&self) -> u32 {
        match self.body.orientation {
            Orientation::Center => 7,
            _ => 5,
        }
    }

    /// First column of body text.
    pub fn body_offset(&self) -> u32 {
        let free = self.layout_columns() - self.body_column_span();
        match self.body.orientation {
            Orientation::Left => 0,
            Orientation::Right => free,
            Orientation::Center => free / 2,
        }
    }

    /// Extra offset for components aligned with the body text.
    pub fn alignment_offset(&self) -> u32 {
        match self.body.orientation {
            Orientation::Center => 3,
            _ => 0,
        }
    }

    /// Columns spanned by a component floating beside the body text.
    pub fn anchored_column_span(&self) -> u32 {
        let free = self.layout_columns() - self.body_column_span();
        match self.body.orientation {
            Orientation::Center => free + 2,
            _ => free + 1,
        }
    }

    /// Resolve a value by key.
    ///
    /// Derived layout keys are computed; anything else is looked up as a
    /// dotted path into the stored values, e.g. `"body.font"`.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let derived = match key {
            "layout_columns" => Some(self.layout_columns()),
            "body_column_span" => Some(self.body_column_span()),
            "body_offset" => Some(self.body_offset()),
            "alignment_offset" => Some(self.alignment_offset()),
            "anchored_column_span" => Some(self.anchored_column_span()),
            _ => None,
        };
        if let Some(value) = derived {
            return Some(Value::from(value));
        }

        let stored = serde_json::to_value(self).ok()?;
        key.split('.')
            .try_fold(&stored, |value, part| value.get(part))
            .cloned()
    }

    pub fn override_for(&self, component: &str, name: &str) -> Option<&Value> {
        self.overrides.get(component)?.get(name)
    }

    /// Store an override without validation. Use
    /// [`SpecCatalog::save_override`] for untrusted input.
    pub fn set_override(&mut self, component: &str, name: &str, spec: Value) {
        self.overrides
            .entry(component.to_string())
            .or_default()
            .insert(name.to_string(), spec);
    }

    pub fn remove_override(&mut self, component: &str, name: &str) -> Option<Value> {
        let specs = self.overrides.get_mut(component)?;
        let removed = specs.remove(name);
        if specs.is_empty() {
            self.overrides.remove(component);
        }
        removed
    }

    /// Every stored override as `(component, name, spec)`.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.overrides.iter().flat_map(|(component, specs)| {
            specs
                .iter()
                .map(move |(name, spec)| (component.as_str(), name.as_str(), spec))
        })
    }
}

/// Access to stored themes.
pub trait ThemeStore {
    /// Name of the theme exports use by default.
    fn active_name(&self) -> &str;

    fn theme(&self, name: &str) -> Option<&Theme>;

    fn theme_mut(&mut self, name: &str) -> Option<&mut Theme>;

    fn active(&self) -> Result<&Theme> {
        let name = self.active_name();
        self.theme(name)
            .ok_or_else(|| Error::ThemeNotFound(name.to_string()))
    }
}

/// In-memory [`ThemeStore`].
#[derive(Debug, Clone, Default)]
pub struct ThemeLibrary {
    themes: BTreeMap<String, Theme>,
    active: String,
}

impl ThemeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding `theme`, which becomes the active theme.
    pub fn with_theme(theme: Theme) -> Self {
        let mut library = Self::new();
        library.active = theme.name.clone();
        library.insert(theme);
        library
    }

    /// Add or replace a theme, keyed by its name.
    pub fn insert(&mut self, theme: Theme) {
        self.themes.insert(theme.name.clone(), theme);
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if !self.themes.contains_key(name) {
            return Err(Error::ThemeNotFound(name.to_string()));
        }
        self.active = name.to_string();
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

impl ThemeStore for ThemeLibrary {
    fn active_name(&self) -> &str {
        &self.active
    }

    fn theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    fn theme_mut(&mut self, name: &str) -> Option<&mut Theme> {
        self.themes.get_mut(name)
    }
}
