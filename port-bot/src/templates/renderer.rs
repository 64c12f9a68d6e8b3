//! Template renderer.

use super::{TemplateError, CONFLICT_COMMENT_TEMPLATE, PR_BODY_TEMPLATE};
use crate::port::PortKind;
use crate::types::Repository;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a Handlebars registry for markdown output.
///
/// The registry is configured with:
/// - No HTML escaping (bodies are markdown and shell snippets)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Data for the conflict-resolution comment.
#[derive(Debug, Clone)]
pub struct ConflictNotice<'a> {
    /// Repository holding both pull requests.
    pub repository: &'a Repository,
    /// Login of the original pull request's author.
    pub author: &'a str,
    /// Direction of the port.
    pub kind: PortKind,
    /// Number of the newly opened port pull request.
    pub pr_number: u64,
    /// Branch the change was ported to.
    pub target_branch: &'a str,
    /// Merge commit that was cherry-picked.
    pub sha: &'a str,
}

/// Renders pull request bodies and comments.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a renderer with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the body of a port pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_pr_body(
        &self,
        kind: PortKind,
        original_number: u64,
    ) -> Result<String, TemplateError> {
        let data = json!({
            "port_kind": kind.as_str(),
            "original_number": original_number,
        });
        self.render(PR_BODY_TEMPLATE, &data)
    }

    /// Renders the comment explaining how to resolve a conflicted port.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_conflict_comment(
        &self,
        notice: &ConflictNotice<'_>,
    ) -> Result<String, TemplateError> {
        let data = json!({
            "author": notice.author,
            "port_kind": notice.kind.as_str(),
            "owner": notice.repository.owner,
            "repo": notice.repository.name,
            "pr_number": notice.pr_number,
            "target_branch": notice.target_branch,
            "sha": notice.sha,
        });
        self.render(CONFLICT_COMMENT_TEMPLATE, &data)
    }

    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
