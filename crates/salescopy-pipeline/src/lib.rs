//! The four-stage copy pipeline plus the advice stage.
//!
//! URL → page text → [`ProductInfo`] → five [`SalesAngle`]s → [`Copy`] for
//! one angle → [`AdaptedCopy`] for one channel. Each stage builds a prompt,
//! calls one model backend and normalizes the raw answer into a fixed shape.
//!
//! [`ProductInfo`]: salescopy_core::ProductInfo
//! [`SalesAngle`]: salescopy_core::SalesAngle
//! [`Copy`]: salescopy_core::Copy
//! [`AdaptedCopy`]: salescopy_core::AdaptedCopy

pub mod advice;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod request;
pub mod stage;

pub use advice::{MarketingAdviceContext, PerformanceSummary, ProfitSummary};
pub use error::{FetchError, NormalizeError, StageError};
pub use fetch::ReaderClient;
pub use pipeline::Pipeline;
pub use request::{
    AdaptRequest, AdviceRequest, AnalyzeRequest, AnglesRequest, BackendChoice, CopyRequest,
    RequestKeys,
};
pub use stage::Stage;
