//! Stage orchestration.
//!
//! Each stage runs `validate → select backend → (fetch) → build prompt →
//! generate → normalize` and either returns a fully normalized value or a
//! [`StageError`]. No stage keeps state between calls.

use std::future::Future;
use std::time::Instant;

use salescopy_core::{AdaptedCopy, AppConfig, Copy, ProductInfo, SalesAngle, SalesChannel};
use salescopy_llm::{Prompt, ProviderRegistry, SelectedProvider};

use crate::advice::MarketingAdviceContext;
use crate::error::StageError;
use crate::fetch::ReaderClient;
use crate::normalize;
use crate::prompts;
use crate::request::{
    AdaptRequest, AdviceRequest, AnalyzeRequest, AnglesRequest, BackendChoice, CopyRequest,
};
use crate::stage::Stage;

/// Shared, read-only entry point for every stage.
#[derive(Clone)]
pub struct Pipeline {
    registry: ProviderRegistry,
    reader: ReaderClient,
}

impl Pipeline {
    #[must_use]
    pub fn new(registry: ProviderRegistry, reader: ReaderClient) -> Self {
        Self { registry, reader }
    }

    /// Builds the HTTP backends and the reader client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if an HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, StageError> {
        Ok(Self::new(
            ProviderRegistry::from_config(config)?,
            ReaderClient::from_config(config)?,
        ))
    }

    /// URL → page text → [`ProductInfo`].
    ///
    /// # Errors
    ///
    /// Validation, backend selection, fetch, provider or normalization failure.
    pub async fn analyze(&self, req: &AnalyzeRequest) -> Result<ProductInfo, StageError> {
        let url = req
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StageError::validation("url is required"))?;
        let provider = self.select(&req.backend)?;

        run_stage(Stage::Analyze, &provider, async {
            let page_text = self.reader.fetch_text(url).await?;
            let raw = generate(&provider, &prompts::analyze_prompt(&page_text)).await?;
            Ok::<_, StageError>(normalize::product_info(&raw)?)
        })
        .await
    }

    /// [`ProductInfo`] → exactly five [`SalesAngle`]s.
    ///
    /// # Errors
    ///
    /// Validation, backend selection, provider or normalization failure.
    pub async fn angles(&self, req: &AnglesRequest) -> Result<Vec<SalesAngle>, StageError> {
        let product = req
            .product_info
            .as_ref()
            .ok_or_else(|| StageError::validation("productInfo is required"))?;
        let provider = self.select(&req.backend)?;

        let prompt = prompts::angles_prompt(product);
        run_stage(Stage::Angles, &provider, async {
            Ok::<_, StageError>(normalize::sales_angles(&generate(&provider, &prompt).await?)?)
        })
        .await
    }

    /// Product plus chosen angle → [`Copy`].
    ///
    /// # Errors
    ///
    /// Validation, backend selection, provider or normalization failure.
    pub async fn copy(&self, req: &CopyRequest) -> Result<Copy, StageError> {
        let (Some(product), Some(angle)) = (req.product_info.as_ref(), req.chosen_angle.as_ref())
        else {
            return Err(StageError::validation(
                "productInfo and chosenAngle are required",
            ));
        };
        let provider = self.select(&req.backend)?;

        let prompt = prompts::copy_prompt(product, angle);
        run_stage(Stage::Copy, &provider, async {
            Ok::<_, StageError>(normalize::copy(&generate(&provider, &prompt).await?)?)
        })
        .await
    }

    /// Copy plus channel → [`AdaptedCopy`].
    ///
    /// # Errors
    ///
    /// Validation (including an unknown channel), backend selection,
    /// provider or normalization failure.
    pub async fn adapt(&self, req: &AdaptRequest) -> Result<AdaptedCopy, StageError> {
        let channel = req
            .sales_channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let (Some(copy), Some(channel)) = (req.copy.as_ref(), channel) else {
            return Err(StageError::validation("copy and salesChannel are required"));
        };
        let channel: SalesChannel = channel
            .parse()
            .map_err(|e: salescopy_core::CoreError| StageError::validation(e.to_string()))?;
        let provider = self.select(&req.backend)?;

        let prompt = prompts::adapt_prompt(
            copy,
            channel,
            req.product_info.as_ref(),
            req.chosen_angle.as_ref(),
        );
        run_stage(Stage::Adapt, &provider, async {
            Ok::<_, StageError>(normalize::adapted_copy(&generate(&provider, &prompt).await?)?)
        })
        .await
    }

    /// Spend and profit records → media-buying advice as prose.
    ///
    /// # Errors
    ///
    /// Validation (including totals that overflow), backend selection or
    /// provider failure, or an empty answer.
    pub async fn advice(&self, req: &AdviceRequest) -> Result<String, StageError> {
        if req.records.is_empty() {
            return Err(StageError::validation("records must not be empty"));
        }
        let context = MarketingAdviceContext::from_records(&req.records, &req.profit_data)?;
        let provider = self.select(&req.backend)?;

        let prompt = prompts::advice_prompt(&context);
        run_stage(Stage::Advice, &provider, async {
            let raw = generate(&provider, &prompt).await?;
            Ok::<_, StageError>(raw.trim().to_string())
        })
        .await
    }

    fn select(&self, backend: &BackendChoice) -> Result<SelectedProvider, StageError> {
        Ok(self
            .registry
            .select(backend.model.as_deref(), &backend.keys.to_provider_keys())?)
    }
}

async fn generate(provider: &SelectedProvider, prompt: &Prompt) -> Result<String, StageError> {
    let raw = provider.generate(prompt).await?;
    tracing::debug!(provider = %provider.kind(), raw = %raw, "provider answered");
    Ok(raw)
}

/// Runs the outbound part of one stage and logs its outcome.
async fn run_stage<T>(
    stage: Stage,
    provider: &SelectedProvider,
    work: impl Future<Output = Result<T, StageError>>,
) -> Result<T, StageError> {
    let started = Instant::now();
    let result = work.await;
    let elapsed_ms = started.elapsed().as_millis();
    match &result {
        Ok(_) => tracing::info!(
            stage = %stage,
            provider = %provider.kind(),
            elapsed_ms,
            "stage completed"
        ),
        Err(e) => tracing::warn!(
            stage = %stage,
            provider = %provider.kind(),
            elapsed_ms,
            error = %e,
            "stage failed"
        ),
    }
    result
}
