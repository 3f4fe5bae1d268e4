// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

//! Drive a client-side [`Signal`] from one RPC call.
//!
//! The signal sees `request` as soon as the call starts and exactly one
//! further view model once the call settles.

use rage_core::domain::error::Dto;
use rage_core::domain::signal::Signal;
use rage_core::domain::view_model::ViewModel;
use std::future::Future;
use tracing::warn;

/// Publish `request`, await `call`, then publish `success` or `error`.
/// Returns the view model that was published last.
pub async fn settle<T, F>(signal: &Signal<ViewModel<T>>, call: F) -> ViewModel<T>
where
    T: Clone,
    F: Future<Output = Dto<T>>,
{
    settle_view_model(signal, async move { call.await.map(ViewModel::Success) }).await
}

/// Like [`settle`] for procedures whose reply is already a view model,
/// such as a case study that may still be in `progress`.
pub async fn settle_view_model<T, F>(signal: &Signal<ViewModel<T>>, call: F) -> ViewModel<T>
where
    T: Clone,
    F: Future<Output = Dto<ViewModel<T>>>,
{
    let mut state = ViewModel::Request;
    signal.set(state.clone());

    let next = match call.await {
        Ok(view_model) => view_model,
        Err(error) => ViewModel::Error(error),
    };

    if let Err(e) = state.transition(next) {
        warn!("Dropping reply: {}", e);
        return state;
    }

    signal.set(state.clone());
    state
}
