//! Client side of the VGen studio.
//!
//! This crate provides:
//! - [`ViewState`]: the video list, the set of ids under polling, and the
//!   loading/error flags, mutated only through [`SharedViewState`]
//! - [`Reconciler`]: one poll chain per non-terminal video, merging each
//!   fetched status back into the view until the video settles
//! - [`Dashboard`]: the controller tying the proxy client, the view and the
//!   reconciler together
//! - A plain-text renderer used by the `vgen` CLI

pub mod config;
pub mod controller;
pub mod error;
pub mod reconcile;
pub mod render;
pub mod source;
pub mod state;

pub use config::DashboardConfig;
pub use controller::Dashboard;
pub use error::{DashboardError, DashboardResult};
pub use reconcile::{PollErrorPolicy, Reconciler};
pub use source::{ProxyClient, VideoSource};
pub use state::{SharedViewState, ViewState};
