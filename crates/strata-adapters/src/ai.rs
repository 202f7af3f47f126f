//! AI provider backends.

use tracing::debug;

use strata_core::{
    application::{
        ApplicationError,
        ports::{AiProvider, AiRequest, AssistTask},
    },
    domain::AiProviderKind,
    error::StrataResult,
};

/// Select the backend for `kind`.
pub fn provider_for(kind: AiProviderKind) -> Box<dyn AiProvider> {
    match kind {
        AiProviderKind::Mock => Box::new(MockProvider),
        other => Box::new(UnimplementedProvider::new(other)),
    }
}

/// Deterministic offline provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

impl AiProvider for MockProvider {
    fn kind(&self) -> AiProviderKind {
        AiProviderKind::Mock
    }

    fn generate(&self, request: &AiRequest) -> StrataResult<String> {
        debug!(task = ?request.task, model = %request.params.model, "Mock generation");
        let first_line = request.prompt.lines().next().unwrap_or_default().trim();

        Ok(match request.task {
            AssistTask::DraftModel => format!(
                "```sql\n-- Drafted from: {first_line}\nselect\n    1 as id\n```\n"
            ),
            AssistTask::Explain => {
                let lines = request.prompt.lines().count().saturating_sub(2);
                format!(
                    "[mock] {first_line} has {lines} line(s). \
                     Configure a real provider in strata.json for a full explanation."
                )
            }
            AssistTask::Optimize => format!(
                "[mock] No optimizations suggested for {}. \
                 Configure a real provider in strata.json for suggestions.",
                first_line.trim_start_matches("File: ")
            ),
        })
    }
}

/// A provider that is selectable but not built yet; every call fails.
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedProvider {
    kind: AiProviderKind,
}

impl UnimplementedProvider {
    pub fn new(kind: AiProviderKind) -> Self {
        Self { kind }
    }
}

impl AiProvider for UnimplementedProvider {
    fn kind(&self) -> AiProviderKind {
        self.kind
    }

    fn generate(&self, _request: &AiRequest) -> StrataResult<String> {
        Err(ApplicationError::NotImplemented {
            feature: format!("The {} provider", self.kind),
        }
        .into())
    }
}
