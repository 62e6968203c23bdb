//! # folio
//!
//! Compiles rich-text HTML written in a content editor into the
//! component-based article documents used by news publishing APIs.
//!
//! ## Pipeline
//!
//! - [`dom`] parses the HTML with html5ever into an arena DOM
//! - [`parser`] walks the body and hands each node to the
//!   [`ComponentRegistry`], which matches it to a component kind
//! - [`component`] kinds render their JSON, layouts and styles from
//!   [`spec`] templates filled with theme values
//! - [`builder`] adds meta components, anchors floats, places the pull
//!   quote, merges body text and assembles the [`Document`]
//!
//! ## Quick Start
//!
//! ```
//! use folio::{Content, Exporter, FilenameBundler, Settings, Theme, ThemeLibrary};
//!
//! let settings = Settings::default();
//! let themes = ThemeLibrary::with_theme(Theme::default());
//! let exporter = Exporter::new(&settings, &themes, &FilenameBundler);
//!
//! let content = Content::new("42", "<h1>Title</h1><p>Body text</p>");
//! let export = exporter.export(&content).unwrap();
//!
//! assert_eq!(export.document.components[0]["role"], "heading1");
//! assert_eq!(export.document.components[1]["text"], "Body text");
//! ```
//!
//! ## Themes
//!
//! A [`Theme`] loads from TOML on top of the stock values and may override
//! any component template. Overrides are checked against the default
//! spec: they may drop tokens but not introduce new ones.
//!
//! ```
//! use folio::{ComponentRegistry, Theme};
//!
//! let catalog = ComponentRegistry::new().catalog();
//! let theme = Theme::from_toml_str(
//!     r##"
//!     [body]
//!     color = "#222222"
//!
//!     [overrides.audio.json]
//!     role = "audio"
//!     URL = "#invalid#"
//!     "##,
//!     &catalog,
//! );
//! assert!(theme.is_err());
//! ```

pub mod builder;
pub mod bundle;
pub mod component;
pub mod content;
pub mod context;
pub mod document;
pub mod dom;
pub mod error;
pub mod markdown;
pub mod parser;
pub mod registry;
pub mod settings;
pub mod spec;
pub mod theme;

pub use builder::{Export, Exporter};
pub use bundle::{Bundles, FilenameBundler, MediaBundler};
pub use component::{Component, ComponentKind, ComponentRegistry};
pub use content::{Content, CoverImage, InMemoryMetadata, MetadataStore, PullquotePosition};
pub use context::{Diagnostic, DiagnosticKind, ExportContext};
pub use document::Document;
pub use error::{Error, Result};
pub use parser::ContentParser;
pub use settings::Settings;
pub use spec::{ComponentSpec, SpecCatalog};
pub use theme::{Theme, ThemeLibrary, ThemeStore};
