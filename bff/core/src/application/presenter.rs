// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! Presenter
//!
//! Maps a use-case response 1:1 onto the matching view-model state and
//! publishes it through the bound [`Signal`]. Holds no state besides the
//! signal, so one presenter may serve any number of invocations.

use crate::application::response::UseCaseResponse;
use crate::domain::signal::Signal;
use crate::domain::view_model::ViewModel;
use tracing::{debug, warn};

impl<T: Clone> From<&UseCaseResponse<T>> for ViewModel<T> {
    fn from(response: &UseCaseResponse<T>) -> Self {
        match response {
            UseCaseResponse::Success(payload) => ViewModel::Success(payload.clone()),
            UseCaseResponse::Progress { message } => ViewModel::Progress {
                message: message.clone(),
            },
            UseCaseResponse::Error(info) => ViewModel::Error(info.clone()),
        }
    }
}

pub struct Presenter<T> {
    module: &'static str,
    signal: Signal<ViewModel<T>>,
}

impl<T> Clone for Presenter<T> {
    fn clone(&self) -> Self {
        Self {
            module: self.module,
            signal: self.signal.clone(),
        }
    }
}

impl<T: Clone> Presenter<T> {
    pub fn new(module: &'static str, signal: Signal<ViewModel<T>>) -> Self {
        Self { module, signal }
    }

    /// A presenter whose signal is unbound; view models are discarded.
    pub fn detached(module: &'static str) -> Self {
        Self::new(module, Signal::new())
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn present(&self, response: &UseCaseResponse<T>) {
        let view_model = ViewModel::from(response);

        match &view_model {
            ViewModel::Error(info) => warn!(
                module = self.module,
                operation = %info.operation,
                "Presenting error view model: {}",
                info.message
            ),
            other => debug!(module = self.module, "Presenting {} view model", other.status()),
        }

        self.signal.set(view_model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorInfo;

    #[test]
    fn status_and_payload_survive_presentation() {
        let (signal, captured) = Signal::capture();
        let presenter = Presenter::new("test", signal);

        let responses = vec![
            UseCaseResponse::Success(vec![1, 2, 3]),
            UseCaseResponse::Progress {
                message: "halfway".to_string(),
            },
            UseCaseResponse::Error(ErrorInfo::new("usecase#test", "nope").with_context("id", 1)),
        ];

        for response in responses {
            presenter.present(&response);
            let view_model = captured.take().unwrap();
            assert_eq!(view_model.status(), response.status());
            match (&response, &view_model) {
                (UseCaseResponse::Success(a), ViewModel::Success(b)) => assert_eq!(a, b),
                (UseCaseResponse::Progress { message: a }, ViewModel::Progress { message: b }) => {
                    assert_eq!(a, b)
                }
                (UseCaseResponse::Error(a), ViewModel::Error(b)) => assert_eq!(a, b),
                _ => panic!("presenter changed the response kind"),
            }
        }
    }

    #[test]
    fn detached_presenter_discards_view_models() {
        let presenter: Presenter<u8> = Presenter::detached("test");
        presenter.present(&UseCaseResponse::Success(1));
        assert_eq!(presenter.module(), "test");
    }
}
