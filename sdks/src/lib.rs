// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

/// RAGE Rust SDK
///
/// Typed client for the research-assistant RPC surface, plus helpers that
/// drive client-side signals from each call.

pub mod bind;
pub mod client;
pub mod retry;

pub use bind::{settle, settle_view_model};
pub use client::RageClient;
pub use retry::{RetryPolicy, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY};
