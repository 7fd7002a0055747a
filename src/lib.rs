//! pr-autogen - open a pull request for every new branch and queue it for auto-merge
//!
//! A GitHub webhook receiver. On each branch-creation event it looks for an
//! open pull request from that branch, creates one into the default branch if
//! there is none, and enables squash auto-merge on it.

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod reconcile;
pub mod report;
pub mod server;
pub mod types;
pub mod webhook;
