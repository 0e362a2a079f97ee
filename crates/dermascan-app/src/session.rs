//! One user's screening workflow.
//!
//! The session owns the analysis client and the key-value store. Each
//! `analyze` call runs the whole pipeline and replaces the previous result:
//! prompt, model call, parse, risk flag, view model, then history.

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use dermascan_bedrock::{AnalysisClient, BedrockAnalysisClient, build_prompt};
use dermascan_core::models::history::{HistoryRecord, ImageRef};
use dermascan_core::models::lesion::LesionProfile;
use dermascan_core::models::request::AnalysisRequest;
use dermascan_core::models::response::AnalysisResponse;
use dermascan_core::models::settings::Settings;
use dermascan_core::models::token_count::TokenUsage;
use dermascan_export::docx::generate_docx;
use dermascan_export::pdf::generate_pdf;
use dermascan_export::render::{ExportDocument, render_markdown};
use dermascan_export::share::{response_from_url, share_url};
use dermascan_export::styles::DocumentStyles;
use dermascan_screening::present::{ReportView, present};
use dermascan_screening::{ParsedResponse, RiskAssessment, assess, parse_response};
use dermascan_storage::{FileStore, HistoryStore, KeyValueStore, LesionStore, SettingsStore};

use crate::aws::build_aws_config;
use crate::config::ScreeningConfig;
use crate::error::{ANALYSIS_FAILED_MESSAGE, AppError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Analyzing,
    Complete,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Used when the settings hold no model selection.
    pub default_model: String,
    pub share_base_url: String,
    pub styles: DocumentStyles,
}

impl SessionOptions {
    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self {
            default_model: config.model_id.clone(),
            share_base_url: config.share_base_url.clone(),
            styles: DocumentStyles::default(),
        }
    }
}

/// A fully processed analysis, fresh or reopened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    /// History record, when the result was persisted.
    pub record_id: Option<Uuid>,
    pub timestamp: jiff::Timestamp,
    pub model_id: Option<String>,
    pub notes: Option<String>,
    pub response: AnalysisResponse,
    pub parsed: ParsedResponse,
    pub assessment: RiskAssessment,
    pub view: ReportView,
    pub usage: Option<TokenUsage>,
}

impl ScreeningResult {
    fn from_response(response: AnalysisResponse, timestamp: jiff::Timestamp) -> Self {
        let parsed = parse_response(&response.text);
        let assessment = assess(&parsed.findings, &parsed.metrics, &parsed.report_body);
        let view = present(&parsed, &assessment, &response.citations);
        Self {
            record_id: None,
            timestamp,
            model_id: None,
            notes: None,
            response,
            parsed,
            assessment,
            view,
            usage: None,
        }
    }

    fn from_record(record: HistoryRecord) -> Self {
        Self {
            record_id: Some(record.id),
            model_id: record.model_id,
            notes: record.notes,
            usage: record.usage,
            ..Self::from_response(record.response, record.timestamp)
        }
    }

    pub fn export_document(&self) -> ExportDocument {
        let doc = ExportDocument::new(
            &self.parsed,
            &self.assessment,
            &self.response.citations,
            self.timestamp,
        )
        .with_notes(self.notes.clone());
        match &self.model_id {
            Some(model_id) => doc.with_model(model_id.clone()),
            None => doc,
        }
    }
}

pub struct ScreeningSession<C, S> {
    client: C,
    store: S,
    options: SessionOptions,
    state: SessionState,
    current: Option<ScreeningResult>,
}

impl<C: AnalysisClient, S: KeyValueStore> ScreeningSession<C, S> {
    pub fn new(client: C, store: S, options: SessionOptions) -> Self {
        Self {
            client,
            store,
            options,
            state: SessionState::Idle,
            current: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The result on screen, if any.
    pub fn current(&self) -> Option<&ScreeningResult> {
        self.current.as_ref()
    }

    pub fn settings(&self) -> Result<Settings, AppError> {
        Ok(SettingsStore::new(&self.store).load()?)
    }

    /// Selected model, else the configured default.
    pub fn model_id(&self) -> Result<String, AppError> {
        Ok(self
            .settings()?
            .selected_model
            .unwrap_or_else(|| self.options.default_model.clone()))
    }

    pub fn select_model(&mut self, model_id: Option<String>) -> Result<(), AppError> {
        let mut settings = SettingsStore::new(&mut self.store);
        let mut current = settings.load()?;
        current.selected_model = model_id;
        settings.save(&current)?;
        Ok(())
    }

    pub fn set_history_cap(&mut self, cap: usize) -> Result<Settings, AppError> {
        Ok(SettingsStore::new(&mut self.store).set_history_cap(cap)?)
    }

    /// Run one analysis end to end.
    ///
    /// A failed model call leaves the session in `Failed` with a generic
    /// message; the cause is only logged. Failing to persist the result is
    /// logged and does not fail the analysis.
    pub async fn analyze(
        &mut self,
        request: AnalysisRequest,
        lesion_id: Option<Uuid>,
    ) -> Result<ScreeningResult, AppError> {
        self.state = SessionState::Analyzing;
        self.current = None;

        let prompt = build_prompt(&request);
        info!(
            model_id = %request.model_id,
            has_notes = request.trimmed_notes().is_some(),
            lesion_id = ?lesion_id,
            "analysis started"
        );

        let transaction = match self.client.analyze(&prompt, &request.model_id).await {
            Ok(transaction) => transaction,
            Err(e) => {
                error!(error = %e, model_id = %request.model_id, "analysis failed");
                self.state = SessionState::Failed {
                    message: ANALYSIS_FAILED_MESSAGE.to_string(),
                };
                return Err(AppError::AnalysisFailed);
            }
        };

        let notes = request.trimmed_notes().map(str::to_string);
        let mut result = ScreeningResult::from_response(transaction.output, jiff::Timestamp::now());
        result.model_id = Some(transaction.model_id);
        result.notes = notes;
        result.usage = Some(transaction.usage);

        let mut record = HistoryRecord::new(
            ImageRef::from_bytes(request.media_type, &request.image),
            result.response.clone(),
        );
        record.id = transaction.id;
        record.timestamp = result.timestamp;
        record.notes = result.notes.clone();
        record.lesion_id = lesion_id;
        record.metrics = Some(result.parsed.metrics.clone());
        record.model_id = result.model_id.clone();
        record.usage = result.usage;
        result.record_id = self.persist(record);

        info!(
            record_id = ?result.record_id,
            findings = result.parsed.findings.len(),
            block_found = result.parsed.block_found,
            needs_attention = result.assessment.needs_attention,
            "analysis complete"
        );

        self.state = SessionState::Complete;
        self.current = Some(result.clone());
        Ok(result)
    }

    fn persist(&mut self, record: HistoryRecord) -> Option<Uuid> {
        let id = record.id;
        let cap = match SettingsStore::new(&self.store).load() {
            Ok(settings) => settings.effective_history_cap(),
            Err(e) => {
                warn!(error = %e, "could not read settings, using default history cap");
                Settings::default().effective_history_cap()
            }
        };
        match HistoryStore::new(&mut self.store).append(record, cap) {
            Ok(_) => Some(id),
            Err(e) => {
                warn!(record_id = %id, error = %e, "analysis not saved to history");
                None
            }
        }
    }

    /// Show a result carried in a share link. Shared results are not saved.
    pub fn open_shared(&mut self, url: &str) -> Result<ScreeningResult, AppError> {
        let response = response_from_url(url)?;
        let result = ScreeningResult::from_response(response, jiff::Timestamp::now());
        info!(findings = result.parsed.findings.len(), "opened shared result");
        self.state = SessionState::Complete;
        self.current = Some(result.clone());
        Ok(result)
    }

    /// Reopen a history record as the current result. Records saved before
    /// metrics were cached get them filled in.
    pub fn open_record(&mut self, id: Uuid) -> Result<ScreeningResult, AppError> {
        let record = HistoryStore::new(&self.store)
            .get(id)?
            .ok_or(AppError::RecordNotFound(id))?;
        let needs_cache = record.metrics.is_none();
        let result = ScreeningResult::from_record(record);
        if needs_cache {
            let cached = HistoryStore::new(&mut self.store)
                .cache_metrics(id, result.parsed.metrics.clone());
            if let Err(e) = cached {
                warn!(record_id = %id, error = %e, "could not cache parsed metrics");
            }
        }
        self.state = SessionState::Complete;
        self.current = Some(result.clone());
        Ok(result)
    }

    pub fn share_link(&self) -> Result<String, AppError> {
        let current = self.current.as_ref().ok_or(AppError::NoResult)?;
        Ok(share_url(&self.options.share_base_url, &current.response)?)
    }

    pub fn export_markdown(&self) -> Result<String, AppError> {
        let current = self.current.as_ref().ok_or(AppError::NoResult)?;
        Ok(render_markdown(&current.export_document())?)
    }

    pub fn export_pdf(&self) -> Result<Vec<u8>, AppError> {
        let current = self.current.as_ref().ok_or(AppError::NoResult)?;
        let doc = current.export_document();
        let markdown = render_markdown(&doc)?;
        Ok(generate_pdf(&markdown, &doc.title, &self.options.styles)?)
    }

    pub fn export_docx(&self) -> Result<Vec<u8>, AppError> {
        let markdown = self.export_markdown()?;
        Ok(generate_docx(&markdown, &self.options.styles)?)
    }

    // ── History & lesions ────────────────────────────────────────────────────

    pub fn history(&self) -> Result<Vec<HistoryRecord>, AppError> {
        Ok(HistoryStore::new(&self.store).list()?)
    }

    pub fn history_for_lesion(&self, lesion_id: Uuid) -> Result<Vec<HistoryRecord>, AppError> {
        Ok(HistoryStore::new(&self.store).for_lesion(lesion_id)?)
    }

    pub fn delete_record(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(HistoryStore::new(&mut self.store).delete(id)?)
    }

    pub fn clear_history(&mut self) -> Result<(), AppError> {
        Ok(HistoryStore::new(&mut self.store).clear()?)
    }

    pub fn assign_lesion(&mut self, record_id: Uuid, lesion_id: Option<Uuid>) -> Result<(), AppError> {
        Ok(HistoryStore::new(&mut self.store).assign_lesion(record_id, lesion_id)?)
    }

    pub fn create_lesion(
        &mut self,
        name: impl Into<String>,
        body_location: impl Into<String>,
    ) -> Result<LesionProfile, AppError> {
        Ok(LesionStore::new(&mut self.store).create(name, body_location)?)
    }

    pub fn lesions(&self) -> Result<Vec<LesionProfile>, AppError> {
        Ok(LesionStore::new(&self.store).list()?)
    }

    pub fn rename_lesion(&mut self, id: Uuid, name: impl Into<String>) -> Result<LesionProfile, AppError> {
        Ok(LesionStore::new(&mut self.store).rename(id, name)?)
    }

    pub fn delete_lesion(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(LesionStore::new(&mut self.store).delete(id)?)
    }

    /// Release the store. The session cannot be used afterwards.
    pub fn close(mut self) -> Result<(), AppError> {
        self.store.close()?;
        info!("screening session closed");
        Ok(())
    }
}

/// Open a Bedrock-backed session with on-disk storage from a config.
pub async fn open_session(
    config: &ScreeningConfig,
) -> eyre::Result<ScreeningSession<BedrockAnalysisClient, FileStore>> {
    let sdk_config = build_aws_config(&config.region, &config.credentials).await;
    let data_dir = config.resolved_data_dir()?;
    let store = FileStore::open(&data_dir, config.storage_quota_bytes)
        .map_err(|e| eyre::eyre!("failed to open data directory {}: {e}", data_dir.display()))?;

    info!(region = %config.region, data_dir = %data_dir.display(), "screening session ready");
    Ok(ScreeningSession::new(
        BedrockAnalysisClient::new(&sdk_config),
        store,
        SessionOptions::from_config(config),
    ))
}
