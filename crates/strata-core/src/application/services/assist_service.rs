//! AI assistance: draft SQL, explain or optimize existing files.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError, GeneratorSettings,
        ports::{AiProvider, AiRequest, AssistTask, Filesystem},
    },
    domain::DomainError,
    error::StrataResult,
};

pub struct AssistService {
    settings: GeneratorSettings,
    provider: Box<dyn AiProvider>,
    filesystem: Box<dyn Filesystem>,
}

impl AssistService {
    pub fn new(
        settings: GeneratorSettings,
        provider: Box<dyn AiProvider>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            settings,
            provider,
            filesystem,
        }
    }

    /// SQL for a model described in prose, with code fences removed.
    #[instrument(skip_all, fields(provider = %self.provider.kind()))]
    pub fn draft_model_sql(&self, description: &str) -> StrataResult<String> {
        if description.trim().is_empty() {
            return Err(DomainError::InvalidArgument {
                field: "prompt",
                reason: "describe the model to draft".into(),
            }
            .into());
        }
        let response = self.ask(AssistTask::DraftModel, description.to_string())?;
        Ok(strip_code_fences(&response))
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn explain_file(&self, path: &Path) -> StrataResult<String> {
        let prompt = self.file_prompt(path)?;
        self.ask(AssistTask::Explain, prompt)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn optimize_file(&self, path: &Path) -> StrataResult<String> {
        let prompt = self.file_prompt(path)?;
        self.ask(AssistTask::Optimize, prompt)
    }

    fn file_prompt(&self, path: &Path) -> StrataResult<String> {
        let content = self
            .filesystem
            .read_to_string(path)?
            .ok_or_else(|| ApplicationError::NotFound {
                path: path.to_path_buf(),
            })?;
        Ok(format!("File: {}\n\n{}", path.display(), content))
    }

    fn ask(&self, task: AssistTask, prompt: String) -> StrataResult<String> {
        let request = AiRequest {
            task,
            prompt,
            params: self.settings.ai.clone(),
        };
        debug!(?task, model = %request.params.model, "Sending request");
        self.provider.generate(&request)
    }
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return format!("{trimmed}\n");
    };
    // Drop the language tag line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = body.trim_end().strip_suffix("```").unwrap_or(body);
    format!("{}\n", body.trim_end())
}
