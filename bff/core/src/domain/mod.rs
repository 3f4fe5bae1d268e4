// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Entities, view models, the signal primitive and the gateway ports.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Plain data shapes and interfaces; no I/O

pub mod case_study;
pub mod config;
pub mod conversation;
pub mod error;
pub mod file;
pub mod gateway;
pub mod message;
pub mod research_context;
pub mod signal;
pub mod vector_store;
pub mod view_model;
