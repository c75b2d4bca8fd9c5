//! Typed API client for the RivalQuest habit-tracking backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! backend operation (host-does-IO pattern). `ApiClient` adds a `Transport`
//! to run the round trip; the default transport is a blocking `ureq` agent.
//!
//! # Design
//! - `RivalQuestClient` is stateless: base URL plus an optional bearer token.
//! - Each operation has a `build_*` / `parse_*` pair, both driven by the
//!   `Operation` descriptor table.
//! - Quota rejections (403), validation failures (422) and repeated daily
//!   completions are separate `ApiError` variants.
//! - Tier ceilings live in `TierLimits`; plan prices in `Plan::pricing`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod operation;
pub mod tier;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::RivalQuestClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::{Operation, OperationDescriptor};
pub use tier::{PlanPricing, TierLimits};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CompleteQuestRequest, CompleteQuestResponse, CreateQuestRequest, CreateQuestResponse,
    GenerateRivalResponse, GetRivalResponse, HealthResponse, InitializePaymentRequest,
    InitializePaymentResponse, ListQuestsResponse, ListRivalsResponse, PersonalityType, Plan,
    Quest, QuestCompletion, QuotaStatus, Rival, SubscriptionStatus, ValidationIssue,
    VerifyPaymentResponse,
};
