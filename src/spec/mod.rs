//! Component specs: named JSON templates and their theme overrides.
//!
//! Every component kind declares its specs once (see
//! [`ComponentKind::register_specs`](crate::component::ComponentKind::register_specs)).
//! The defaults are collected into a [`SpecCatalog`]; themes may carry
//! overrides for any of them, which are validated against the default before
//! they are stored.

pub mod tokens;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::theme::{Theme, ThemeStore};

pub use tokens::{Substitution, TokenValues, find_tokens, substitute, validate};

/// A named template for one part of a component's output.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    /// Owning component kind, e.g. `"body"`.
    pub component: String,
    /// Spec name, unique within the component, e.g. `"json"`.
    pub name: String,
    /// Display name for override editors.
    pub label: String,
    /// Default template.
    pub spec: Value,
}

impl ComponentSpec {
    pub fn new(component: &str, name: &str, label: &str, spec: Value) -> Self {
        Self {
            component: component.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            spec,
        }
    }

    /// Check a candidate override against this spec's default.
    pub fn validate(&self, candidate: &Value) -> Result<()> {
        validate(candidate, &self.spec).map_err(|tokens| Error::InvalidSpec {
            component: self.component.clone(),
            name: self.name.clone(),
            tokens,
        })
    }

    /// The template in effect for `theme`: its override if it has one.
    pub fn resolve<'a>(&'a self, theme: &'a Theme) -> &'a Value {
        theme
            .override_for(&self.component, &self.name)
            .unwrap_or(&self.spec)
    }
}

/// Default specs of every registered component kind.
#[derive(Debug, Clone, Default)]
pub struct SpecCatalog {
    specs: BTreeMap<(String, String), ComponentSpec>,
}

impl SpecCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default spec. A spec already registered under the same
    /// component and name is kept.
    pub fn register(&mut self, spec: ComponentSpec) {
        self.specs
            .entry((spec.component.clone(), spec.name.clone()))
            .or_insert(spec);
    }

    pub fn get(&self, component: &str, name: &str) -> Option<&ComponentSpec> {
        self.specs.get(&(component.to_string(), name.to_string()))
    }

    fn require(&self, component: &str, name: &str) -> Result<&ComponentSpec> {
        self.get(component, name).ok_or_else(|| Error::UnknownSpec {
            component: component.to_string(),
            name: name.to_string(),
        })
    }

    /// All specs of one component, ordered by name.
    pub fn for_component<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a ComponentSpec> + 'a {
        self.specs.values().filter(move |s| s.component == component)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Template in effect for a spec, looked up in the theme named
    /// `theme_name` or the active theme when `None`.
    pub fn get_spec(
        &self,
        themes: &dyn ThemeStore,
        theme_name: Option<&str>,
        component: &str,
        name: &str,
    ) -> Result<Value> {
        let spec = self.require(component, name)?;
        let theme = match theme_name {
            Some(theme_name) => themes
                .theme(theme_name)
                .ok_or_else(|| Error::ThemeNotFound(theme_name.to_string()))?,
            None => themes.active()?,
        };
        Ok(spec.resolve(theme).clone())
    }

    /// Validate `candidate` and store it as an override on `theme`.
    ///
    /// On failure the theme is left as it was.
    pub fn save_override(&self, theme: &mut Theme, component: &str, name: &str, candidate: Value) -> Result<()> {
        self.require(component, name)?.validate(&candidate)?;
        theme.set_override(component, name, candidate);
        Ok(())
    }

    /// Drop an override so the default applies again. Returns whether one
    /// was stored.
    pub fn delete_override(&self, theme: &mut Theme, component: &str, name: &str) -> Result<bool> {
        self.require(component, name)?;
        Ok(theme.remove_override(component, name).is_some())
    }

    /// Check every override stored on `theme`.
    pub fn validate_theme(&self, theme: &Theme) -> Result<()> {
        for (component, name, candidate) in theme.overrides() {
            self.require(component, name)?.validate(candidate)?;
        }
        Ok(())
    }
}
