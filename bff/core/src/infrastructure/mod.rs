// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

pub mod auth;
pub mod case_study;
pub mod composition;
pub mod in_memory;
pub mod kernel;
pub mod llm;

pub use composition::Services;
pub use in_memory::InMemoryKernel;
