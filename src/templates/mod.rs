//! Template registry
//!
//! All templates are parsed once at startup: the base layout, every page in
//! the templates directory and every card template in its `cards/`
//! subdirectory. Templates are registered under their file stem, so
//! `cards/link.html` renders cards with `type = "link"`. The registry is
//! read-only afterwards and shared by all requests.

pub mod context;
pub mod helpers;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub use context::{ErrorContext, PageContext};

/// Shared layout; pages `{% extends "base" %}`
pub const BASE_TEMPLATE: &str = "base";
pub const HOME_TEMPLATE: &str = "home";
pub const LOGIN_TEMPLATE: &str = "login";
pub const ERROR_TEMPLATE: &str = "error";

const TEMPLATE_EXTENSION: &str = "html";
const CARDS_DIR: &str = "cards";

/// A template source discovered on disk or supplied directly
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub name: String,
    pub source: String,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Compiled templates
pub struct Templates {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl Templates {
    /// Load `base.html`, `*.html` and `cards/*.html` from a templates directory
    pub fn load(dir: &Path) -> Result<Self> {
        let base_path = dir.join(format!("{}.{}", BASE_TEMPLATE, TEMPLATE_EXTENSION));
        let base = fs::read_to_string(&base_path)
            .map_err(|_| Error::MissingBaseLayout(base_path.clone()))?;

        let mut sources = read_sources(dir)?;
        let cards_dir = dir.join(CARDS_DIR);
        if cards_dir.is_dir() {
            sources.extend(read_sources(&cards_dir)?);
        }

        Self::from_sources(base, sources)
    }

    /// Compile a base layout plus pages and card templates
    ///
    /// A source named like the base layout is ignored; two sources with the
    /// same name are an error.
    pub fn from_sources(base: String, sources: Vec<TemplateSource>) -> Result<Self> {
        let mut env = Environment::new();
        // Names have no extension, so escaping can't be inferred from them
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        // Card data is free-form, so missing keys must not abort a widget
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        helpers::register(&mut env);
        env.add_template_owned(BASE_TEMPLATE, base)?;

        let mut names = BTreeSet::new();
        for TemplateSource { name, source } in sources {
            if name == BASE_TEMPLATE {
                continue;
            }
            if !names.insert(name.clone()) {
                return Err(Error::DuplicateTemplate(name));
            }
            env.add_template_owned(name.clone(), source)?;
            tracing::debug!("Registered template '{}'", name);
        }

        Ok(Self { env, names })
    }

    /// Whether a page or card template with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Registered page and card template names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Fail unless every named template is registered
    pub fn require(&self, required: &[&str]) -> Result<()> {
        match required.iter().find(|name| !self.contains(name)) {
            Some(name) => Err(Error::TemplateNotFound(name.to_string())),
            None => Ok(()),
        }
    }

    /// Render a registered template
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        if !self.contains(name) {
            return Err(Error::TemplateNotFound(name.to_string()));
        }
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}

/// Read every `*.html` file directly inside `dir`, sorted by path
fn read_sources(dir: &Path) -> Result<Vec<TemplateSource>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION)
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = fs::read_to_string(&path)?;
            Ok(TemplateSource::new(name, source))
        })
        .collect()
}
