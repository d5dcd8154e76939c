//! Page templates.
//!
//! The three templates (`view`, `edit`, `list`) are compiled into the binary
//! and loaded once into a [`minijinja::Environment`] at startup. Templates
//! use the `.html` extension, so values are HTML-escaped automatically.

use minijinja::{Environment, context};
use wiki_storage::Page;

const VIEW: &str = "view.html";
const EDIT: &str = "edit.html";
const LIST: &str = "list.html";

/// Read-only template set shared by all handlers.
pub(crate) struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load the embedded templates.
    pub(crate) fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(VIEW, include_str!("../templates/view.html"))?;
        env.add_template(EDIT, include_str!("../templates/edit.html"))?;
        env.add_template(LIST, include_str!("../templates/list.html"))?;
        Ok(Self { env })
    }

    /// Render a page for reading.
    pub(crate) fn view(&self, page: &Page) -> Result<String, minijinja::Error> {
        self.render_page(VIEW, page)
    }

    /// Render the edit form for a page (blank body for new pages).
    pub(crate) fn edit(&self, page: &Page) -> Result<String, minijinja::Error> {
        self.render_page(EDIT, page)
    }

    /// Render the index of all page titles.
    pub(crate) fn list(&self, titles: &[String]) -> Result<String, minijinja::Error> {
        self.env.get_template(LIST)?.render(context! { titles })
    }

    fn render_page(&self, name: &str, page: &Page) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context! {
            title => &page.title,
            body => page.body_text(),
        })
    }
}
