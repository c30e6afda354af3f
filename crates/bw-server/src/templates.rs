//! HTML templates for the "view" and "edit" pages.
//!
//! Templates are plain HTML files with `{title}` and `{body}` placeholders.
//! They are parsed once at startup; an unknown placeholder is a load-time
//! error rather than something a request can trip over. Substituted values
//! are HTML-escaped.
//!
//! ```
//! use bw_server::pages::Page;
//! use bw_server::templates::Template;
//!
//! let tpl = Template::parse("view", "<h1>{title}</h1><div>{body}</div>").unwrap();
//! let html = tpl.render(&Page::new("Hello", "1 < 2"));
//! assert_eq!(html, "<h1>Hello</h1><div>1 &lt; 2</div>");
//! ```

use std::collections::HashMap;
use std::path::Path;

use bw_core::{Error, Result};
use regex::Regex;

use crate::pages::Page;

/// Template shown by `/view/{title}` and the listing page.
pub const VIEW: &str = "view";
/// Template shown by `/edit/{title}`.
pub const EDIT: &str = "edit";

const PLACEHOLDER: &str = r"\{([a-z_]+)\}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Body,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Field::Title),
            "body" => Some(Field::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, resolving every placeholder.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let re = Regex::new(PLACEHOLDER).map_err(|e| Error::template(name, e.to_string()))?;

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in re.captures_iter(source) {
            let (Some(whole), Some(var)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let field = Field::from_name(var.as_str()).ok_or_else(|| {
                Error::template(name, format!("unknown placeholder {{{}}}", var.as_str()))
            })?;

            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_owned()));
            }
            segments.push(Segment::Field(field));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_owned()));
        }

        Ok(Self { segments })
    }

    /// Render `page` into HTML.
    pub fn render(&self, page: &Page) -> String {
        let body = page.body_text();
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(Field::Title) => out.push_str(&escape(&page.title)),
                Segment::Field(Field::Body) => out.push_str(&escape(&body)),
            }
        }
        out
    }
}

fn escape(value: &str) -> String {
    maud::html! { (value) }.into_string()
}

/// The named set of templates the handlers render with.
#[derive(Debug, Clone)]
pub struct Templates {
    by_name: HashMap<String, Template>,
}

impl Templates {
    /// Load `view.html` and `edit.html` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut by_name = HashMap::new();
        for name in [VIEW, EDIT] {
            let path = dir.join(format!("{name}.html"));
            let source = std::fs::read_to_string(&path).map_err(|e| {
                Error::template(name, format!("failed to read {}: {e}", path.display()))
            })?;
            by_name.insert(name.to_owned(), Template::parse(name, &source)?);
        }

        tracing::debug!("Loaded templates from {}", dir.display());
        Ok(Self { by_name })
    }

    /// Build from in-memory sources.
    pub fn from_sources(view: &str, edit: &str) -> Result<Self> {
        let mut by_name = HashMap::new();
        by_name.insert(VIEW.to_owned(), Template::parse(VIEW, view)?);
        by_name.insert(EDIT.to_owned(), Template::parse(EDIT, edit)?);
        Ok(Self { by_name })
    }

    /// Render `page` with the template called `name`.
    pub fn render(&self, name: &str, page: &Page) -> Result<String> {
        self.by_name
            .get(name)
            .map(|tpl| tpl.render(page))
            .ok_or_else(|| Error::template(name, "no such template"))
    }
}
