// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use rage_core::application::list_source_data::OPERATION as LIST_SOURCE_DATA;
use rage_core::application::{
    ListConversationsRequest, ListConversationsUseCase, ListResearchContextsRequest,
    ListResearchContextsUseCase, ListSourceDataRequest, ListSourceDataUseCase, Presenter,
    StandardListConversationsUseCase, StandardListResearchContextsUseCase, StandardListSourceDataUseCase,
    UseCaseResponse,
};
use rage_core::domain::error::{Dto, ErrorInfo};
use rage_core::domain::file::{LocalSourceData, RemoteSourceData, SourceDataFile};
use rage_core::domain::gateway::{ConversationGateway, ResearchContextGateway, SourceDataGateway};
use rage_core::domain::research_context::{NewResearchContext, ResearchContextId};
use rage_core::domain::signal::Signal;
use rage_core::domain::view_model::ViewModel;
use rage_core::infrastructure::in_memory::InMemoryKernel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn local(id: &str) -> SourceDataFile {
    SourceDataFile::Local(LocalSourceData {
        id: id.into(),
        name: "notes.txt".into(),
        relative_path: "notes.txt".into(),
        created_at: "2024-05-01".into(),
    })
}

fn remote(id: &str, name: &str) -> SourceDataFile {
    SourceDataFile::Remote(RemoteSourceData {
        id: id.into(),
        name: name.into(),
        relative_path: name.into(),
        provider: "s3".into(),
        created_at: "2024-05-01".into(),
    })
}

/// Source-data store that always answers `success: false`.
struct RejectingSourceData {
    calls: AtomicUsize,
}

#[async_trait]
impl SourceDataGateway for RejectingSourceData {
    async fn list(&self) -> Dto<Vec<SourceDataFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ErrorInfo::new("kernel-source-data-gateway#list", "Kernel is unavailable"))
    }

    async fn list_for_research_context(&self, _id: ResearchContextId) -> Dto<Vec<SourceDataFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ErrorInfo::new(
            "kernel-source-data-gateway#list-for-research-context",
            "Kernel is unavailable",
        ))
    }
}

#[tokio::test]
async fn list_source_data_keeps_only_remote_entries() {
    let kernel = InMemoryKernel::with_source_data(vec![local("l1"), remote("r1", "a.csv")]);
    let (signal, captured) = Signal::capture();
    let usecase = StandardListSourceDataUseCase::new(Arc::new(kernel), Presenter::new("test", signal));

    let response = usecase
        .execute(ListSourceDataRequest {
            research_context_id: None,
        })
        .await;

    let payload = response.success().unwrap();
    assert_eq!(payload.source_data, vec![remote("r1", "a.csv")]);

    match captured.latest() {
        Some(ViewModel::Success(published)) => assert_eq!(&published, payload),
        other => panic!("expected success view model, got {other:?}"),
    }
}

#[tokio::test]
async fn gateway_failure_is_retagged_with_the_use_case_operation() {
    let gateway = Arc::new(RejectingSourceData {
        calls: AtomicUsize::new(0),
    });
    let (signal, captured) = Signal::capture();
    let usecase = StandardListSourceDataUseCase::new(gateway.clone(), Presenter::new("test", signal));

    let response = usecase.execute(ListSourceDataRequest::default()).await;

    let info = response.error_info().unwrap();
    assert_eq!(info.operation, LIST_SOURCE_DATA);
    assert_eq!(info.message, "Kernel is unavailable");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    assert_eq!(captured.latest().unwrap().status(), response.status());
}

#[tokio::test]
async fn identical_list_calls_on_an_unchanged_store_are_equal() {
    let kernel = InMemoryKernel::seeded();
    let sources = rage_core::domain::file::remote_only(SourceDataGateway::list(&kernel).await.unwrap());
    let research_context = ResearchContextGateway::create(
        &kernel,
        &NewResearchContext {
            title: "NO2".into(),
            description: String::new(),
            sources,
        },
    )
    .await
    .unwrap();
    kernel
        .create_conversation(research_context.id, "Untitled")
        .await
        .unwrap();

    let conversations = StandardListConversationsUseCase::new(Arc::new(kernel.clone()), Presenter::detached("test"));
    let request = ListConversationsRequest {
        research_context_id: Some(research_context.id),
    };
    let first = conversations.execute(request.clone()).await;
    let second = conversations.execute(request).await;
    assert_eq!(first, second);
    assert!(matches!(first, UseCaseResponse::Success(_)));

    let contexts = StandardListResearchContextsUseCase::new(Arc::new(kernel), Presenter::detached("test"));
    assert_eq!(
        contexts.execute(ListResearchContextsRequest {}).await,
        contexts.execute(ListResearchContextsRequest {}).await
    );
}

#[tokio::test]
async fn last_published_view_model_wins_on_a_shared_signal() {
    let kernel = InMemoryKernel::with_source_data(vec![remote("r1", "a.csv")]);
    let (signal, captured) = Signal::capture();
    let presenter = Presenter::new("test", signal);

    let ok = StandardListSourceDataUseCase::new(Arc::new(kernel), presenter.clone());
    let failing = StandardListSourceDataUseCase::new(
        Arc::new(RejectingSourceData {
            calls: AtomicUsize::new(0),
        }),
        presenter,
    );

    ok.execute(ListSourceDataRequest::default()).await;
    failing.execute(ListSourceDataRequest::default()).await;

    assert_eq!(captured.latest().unwrap().status(), "error");
}
