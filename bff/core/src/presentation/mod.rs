// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

pub mod api;
pub mod controllers;

pub use api::app;
