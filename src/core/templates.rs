//! Built-in prompt templates.
//!
//! The catalog is compiled in and read-only. Applying a template only yields
//! its prompt text; the caller decides where that text goes.

/// A reusable prompt offered for quick insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: u32,
    pub name: &'static str,
    pub prompt: &'static str,
}

const CATALOG: &[Template] = &[
    Template {
        id: 1,
        name: "Code Review",
        prompt: "Please review the following code for bugs, readability, and performance issues:\n\n",
    },
    Template {
        id: 2,
        name: "Explain Concept",
        prompt: "Explain the following concept in simple terms, with an example:\n\n",
    },
    Template {
        id: 3,
        name: "Write Tests",
        prompt: "Write unit tests covering the edge cases of the following function:\n\n",
    },
    Template {
        id: 4,
        name: "Summarize",
        prompt: "Summarize the following text in three bullet points:\n\n",
    },
    Template {
        id: 5,
        name: "Debug Error",
        prompt: "I'm getting the following error. What is causing it and how do I fix it?\n\n",
    },
    Template {
        id: 6,
        name: "Refactor",
        prompt: "Refactor the following code to be more idiomatic without changing its behavior:\n\n",
    },
];

/// All templates, in display order.
pub fn list() -> &'static [Template] {
    CATALOG
}

pub fn find(id: u32) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Text to place in the prompt field.
pub fn apply_template(template: &Template) -> String {
    template.prompt.to_string()
}
