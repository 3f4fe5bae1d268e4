// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! # View Models
//!
//! UI-observable state of one operation instance:
//!
//! ```text
//! request ──► progress* ──► success | error   (terminal)
//! ```
//!
//! Serialized with a `status` tag and the payload fields flattened next to
//! it, e.g. `{"status": "success", "sourceData": [...]}`.

use crate::domain::error::ErrorInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewModel<T> {
    Request,
    Progress { message: String },
    Success(T),
    Error(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid view model transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

impl<T> Default for ViewModel<T> {
    fn default() -> Self {
        ViewModel::Request
    }
}

impl<T> ViewModel<T> {
    pub fn status(&self) -> &'static str {
        match self {
            ViewModel::Request => "request",
            ViewModel::Progress { .. } => "progress",
            ViewModel::Success(_) => "success",
            ViewModel::Error(_) => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewModel::Success(_) | ViewModel::Error(_))
    }

    /// Check that `next` may follow `self` within one operation instance.
    pub fn check_transition(&self, next: &ViewModel<T>) -> Result<(), InvalidTransition> {
        let allowed = match (self, next) {
            (_, ViewModel::Request) => false,
            (ViewModel::Success(_) | ViewModel::Error(_), _) => false,
            _ => true,
        };

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.status(),
                to: next.status(),
            })
        }
    }

    /// Move to `next`, rejecting transitions out of a terminal state.
    pub fn transition(&mut self, next: ViewModel<T>) -> Result<(), InvalidTransition> {
        self.check_transition(&next)?;
        *self = next;
        Ok(())
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ViewModel::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        research_context_name: String,
    }

    #[test]
    fn success_flattens_payload_next_to_status() {
        let vm = ViewModel::Success(Payload {
            research_context_name: "Arctic".into(),
        });
        assert_eq!(
            serde_json::to_value(&vm).unwrap(),
            json!({"status": "success", "researchContextName": "Arctic"})
        );
    }

    #[test]
    fn request_serializes_as_bare_status() {
        let vm: ViewModel<Payload> = ViewModel::default();
        assert_eq!(serde_json::to_value(&vm).unwrap(), json!({"status": "request"}));
    }

    #[test]
    fn progress_may_repeat_before_terminal_state() {
        let mut vm: ViewModel<Payload> = ViewModel::Request;
        vm.transition(ViewModel::Progress { message: "1/2".into() }).unwrap();
        vm.transition(ViewModel::Progress { message: "2/2".into() }).unwrap();
        vm.transition(ViewModel::Error(ErrorInfo::new("op", "failed"))).unwrap();
        assert!(vm.is_terminal());
    }

    #[test]
    fn terminal_states_are_final() {
        let mut vm = ViewModel::Success(Payload {
            research_context_name: "x".into(),
        });
        let err = vm.transition(ViewModel::Request).unwrap_err();
        assert_eq!(err.from, "success");
        assert_eq!(err.to, "request");
        assert!(vm
            .transition(ViewModel::Progress { message: "late".into() })
            .is_err());
    }

    #[test]
    fn request_cannot_be_re_entered() {
        let mut vm: ViewModel<Payload> = ViewModel::Progress { message: "p".into() };
        assert!(vm.transition(ViewModel::Request).is_err());
    }
}
