// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! RAGE Core
//!
//! Backend-for-frontend of the RAGE research assistant: research contexts,
//! source data, conversations with an LLM agent, and case studies.
//!
//! # Architecture
//!
//! - **domain**: entities, view models, signals, gateway ports, configuration
//! - **application**: use cases and the presenter
//! - **infrastructure**: Kernel, LLM and case-study gateways; composition root
//! - **presentation**: controllers and the axum RPC router

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
