//! One-off template rendering on top of Tera.

use tera::{Context, Tera};

use crate::error::Result;

/// Renders `template` with the given context. Every `{{ name }}`
/// placeholder must have a value in the context; extra values are ignored.
pub fn render(template: &str, context: &Context) -> Result<String> {
    let rendered = Tera::one_off(template, context, false)?;
    Ok(rendered)
}

/// Builds a context from name/value pairs.
pub fn context_from<'a>(
    values: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Context {
    let mut context = Context::new();

    for (name, value) in values {
        context.insert(name, value);
    }

    context
}
