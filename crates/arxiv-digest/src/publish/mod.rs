//! Publishing per-topic outputs to the publish branch.
//!
//! [`Publisher`] runs the steps in a fixed order, carrying branch state in a
//! [`PublishContext`]. All git access goes through a [`CommandRunner`], so
//! tests drive the whole flow with a scripted runner.

mod command;
mod git;
mod orchestrator;
mod registry;

pub use command::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use git::{CommitOutcome, Git};
pub use orchestrator::{
    PublishContext, PublishReport, PublishStage, Publisher, TopicOutcome, commit_message,
};
pub use registry::{load_registry, parse_registry};
