//! Page templates.
//!
//! Every page is a handlebars template compiled once at startup. The
//! built-in set is embedded in the binary; `server.template_dir` may point at
//! a directory of `*.hbs` files that replace templates of the same name.
//! `header` and `footer` are plain templates used as partials.

use std::path::Path;

use axum::response::Html;
use handlebars::{DirectorySourceOptions, Handlebars};
use serde::Serialize;

use crate::middleware::auth::CurrentUser;

const BUILTIN: &[(&str, &str)] = &[
    ("header", include_str!("../templates/header.hbs")),
    ("footer", include_str!("../templates/footer.hbs")),
    ("index", include_str!("../templates/index.hbs")),
    ("register", include_str!("../templates/register.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("dashboard_student", include_str!("../templates/dashboard_student.hbs")),
    ("dashboard_professor", include_str!("../templates/dashboard_professor.hbs")),
    ("defaulters", include_str!("../templates/defaulters.hbs")),
];

/// Data shared by every page, merged with the page's own fields.
#[derive(Debug, Serialize)]
struct Page<'a, T: Serialize> {
    title: &'a str,
    user: Option<&'a CurrentUser>,
    flashes: &'a [String],
    #[serde(flatten)]
    body: &'a T,
}

/// Page body for templates that only need the shared fields.
#[derive(Debug, Serialize)]
pub struct Blank {}

/// Compiled template registry.
#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Compile the built-in templates, then apply overrides from `dir`.
    pub fn load(dir: Option<&Path>) -> gv_core::Result<Self> {
        let mut registry = Handlebars::new();
        #[cfg(debug_assertions)]
        registry.set_dev_mode(true);

        for (name, source) in BUILTIN {
            registry
                .register_template_string(name, source)
                .map_err(|e| gv_core::Error::template(*name, e))?;
        }

        if let Some(dir) = dir {
            if dir.is_dir() {
                registry
                    .register_templates_directory(dir, DirectorySourceOptions::default())
                    .map_err(|e| gv_core::Error::template(dir.display().to_string(), e))?;
                tracing::info!("Loaded template overrides from {}", dir.display());
            } else {
                tracing::warn!(
                    "Template directory {} does not exist; using built-in templates",
                    dir.display()
                );
            }
        }

        Ok(Self { registry })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Render template `name` with the shared page fields plus `body`.
    pub fn render_page<T: Serialize>(
        &self,
        name: &str,
        title: &str,
        user: Option<&CurrentUser>,
        flashes: &[String],
        body: &T,
    ) -> gv_core::Result<Html<String>> {
        let page = Page {
            title,
            user,
            flashes,
            body,
        };
        tracing::trace!(template = name, "Rendering page");
        self.registry
            .render(name, &page)
            .map(Html)
            .map_err(|e| gv_core::Error::template(name, e))
    }
}

/// Serialize chart data for embedding inside a `<script>` element.
///
/// `</` is escaped so a value can never close the script tag early.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> gv_core::Result<String> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| gv_core::Error::Internal(format!("chart data serialization failed: {e}")))
}
