//! Text of the pull requests and comments the bot writes.
//!
//! Bodies are Handlebars templates rendered by [`TemplateRenderer`]; titles
//! and commit messages are fixed formats.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, ConflictNotice, TemplateRenderer};

/// Body of a port pull request.
pub const PR_BODY_TEMPLATE: &str =
    "## Description\nThis is a {{port_kind}} of #{{original_number}}";

/// Comment posted on a conflicted port, addressed to the original author.
pub const CONFLICT_COMMENT_TEMPLATE: &str = r#"Hello @{{author}}, there are conflicts in this {{port_kind}}.

Please address them in order to merge this Pull Request. You can execute the snippet below to reset your branch and resolve the conflict manually.

Make sure you replace `origin` by the name of the {{owner}}/{{repo}} remote
```
git fetch --all
gh pr checkout {{pr_number}} -R {{owner}}/{{repo}}
git reset --hard origin/{{target_branch}}
git cherry-pick -m 1 {{sha}}
```
"#;

/// Review checklist posted when no checklist file is configured.
pub const DEFAULT_REVIEW_CHECKLIST: &str = r#"## Review Checklist

Hello reviewers! :wave: Please follow this checklist when reviewing this Pull Request.

#### General
- [ ] Ensure that the Pull Request has a descriptive title.
- [ ] Ensure there is a link to an issue (except for internal cleanup and flaky test fixes), new features should have an RFC that documents use cases and test cases.

#### Tests
- [ ] Bug fixes should have at least one unit or end-to-end test, enhancement and new features should have a sufficient number of tests.

#### Documentation
- [ ] Apply the `release notes (needs details)` label if users need to know about this change.
- [ ] New features should be documented.
- [ ] There should be some code comments as to why things are implemented the way they are.
- [ ] There should be a comment at the top of each new or modified test to explain what the test does.

#### New flags
- [ ] Is this flag really necessary?
- [ ] Flag names must be clear and intuitive, use dashes (-), and have a clear help text.

#### If a workflow is added or modified:
- [ ] Each item in `Jobs` should be named in order to mark it as `required`.
- [ ] If the workflow needs to be marked as `required`, the maintainer team must be notified.

#### Backward compatibility
- [ ] Protobuf changes should be wire-compatible.
- [ ] Changes to `_vt` tables and RPCs need to be backward compatible.
- [ ] RPC changes should be compatible with vitess-operator
- [ ] If a flag is removed, then it should also be removed from [vitess-operator](https://github.com/planetscale/vitess-operator) and [arewefastyet](https://github.com/vitessio/arewefastyet), if used there.
- [ ] `vtctl` command output order should be stable and `awk`-able.
"#;

/// Generates the title of a port pull request.
///
/// Format: "[{target_branch}] {original_title} (#{original_number})"
#[must_use]
pub fn generate_pr_title(
    target_branch: &str,
    original_title: &str,
    original_number: u64,
) -> String {
    format!("[{target_branch}] {original_title} (#{original_number})")
}

/// Generates the commit message recorded for a conflicted cherry-pick.
#[must_use]
pub fn generate_conflict_commit_message(sha: &str) -> String {
    format!("Cherry-pick {sha} with conflicts")
}
