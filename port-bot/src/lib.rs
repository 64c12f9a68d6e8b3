#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod chores;
pub mod config;
pub mod event;
pub mod fakes;
pub mod forge;
pub mod git;
pub mod orchestrator;
pub mod planner;
pub mod port;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod types;

pub use chores::{run_review_chores, ChoreReport};
pub use config::{load_config, BotConfig, BotIdentity, ConfigError};
pub use event::{EventAction, EventError, PullRequestEvent};
pub use forge::{ForgeClient, ForgeError, GitHubForge};
pub use git::{GitCli, GitError, VersionControlClient};
pub use orchestrator::{BranchPortOutcome, PortOrchestrator};
pub use planner::{plan, PortPlan};
pub use port::{
    PortError, PortErrorKind, PortExecutor, PortKind, PortRequest, PortResult, WorkingBranch,
    Workspace,
};
pub use rate_limit::{
    check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo, DEFAULT_MAX_WAIT,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{EventOutcome, RunSummary};
pub use templates::{generate_pr_title, TemplateError, TemplateRenderer};
pub use types::{PullRequestRef, Repository};
