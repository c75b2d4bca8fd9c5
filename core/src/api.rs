//! One call per operation: build, execute, parse.
//!
//! `ApiClient` holds no mutable state, so independent reads (quests and
//! rivals, say) can run on separate threads against the same client when the
//! transport is `Sync`.

use crate::client::RivalQuestClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CompleteQuestRequest, CompleteQuestResponse, CreateQuestRequest, CreateQuestResponse,
    GenerateRivalResponse, GetRivalResponse, HealthResponse, InitializePaymentRequest,
    InitializePaymentResponse, ListQuestsResponse, ListRivalsResponse, PersonalityType, Plan,
    QuotaStatus, SubscriptionStatus, VerifyPaymentResponse,
};

/// RivalQuest client that performs requests through a `Transport`.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    client: RivalQuestClient,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client over `ureq` configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            RivalQuestClient::from_config(config),
            UreqTransport::from_config(config),
        )
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: RivalQuestClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RivalQuestClient {
        &self.client
    }

    pub fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.transport.execute(self.client.build_check_health())?;
        self.client.parse_check_health(response)
    }

    pub fn initialize_payment(
        &self,
        email: &str,
        plan: Plan,
        callback_url: Option<&str>,
    ) -> Result<InitializePaymentResponse, ApiError> {
        let input = InitializePaymentRequest {
            email: email.to_string(),
            plan,
            callback_url: callback_url.map(str::to_string),
        };
        let response = self
            .transport
            .execute(self.client.build_initialize_payment(&input)?)?;
        self.client.parse_initialize_payment(response)
    }

    pub fn verify_payment(&self, reference: &str) -> Result<VerifyPaymentResponse, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_verify_payment(reference)?)?;
        self.client.parse_verify_payment(response)
    }

    pub fn get_subscription_status(&self) -> Result<SubscriptionStatus, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_get_subscription_status())?;
        self.client.parse_get_subscription_status(response)
    }

    pub fn get_quota_status(&self) -> Result<QuotaStatus, ApiError> {
        let response = self.transport.execute(self.client.build_get_quota_status())?;
        self.client.parse_get_quota_status(response)
    }

    pub fn paystack_webhook(
        &self,
        payload: &str,
        signature: Option<&str>,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_paystack_webhook(payload, signature))?;
        self.client.parse_paystack_webhook(response)
    }

    pub fn create_quest(&self, title: &str) -> Result<CreateQuestResponse, ApiError> {
        let input = CreateQuestRequest {
            title: title.to_string(),
        };
        let response = self.transport.execute(self.client.build_create_quest(&input)?)?;
        self.client.parse_create_quest(response)
    }

    pub fn list_quests(&self) -> Result<ListQuestsResponse, ApiError> {
        let response = self.transport.execute(self.client.build_list_quests())?;
        self.client.parse_list_quests(response)
    }

    pub fn complete_today(&self, quest_id: i64) -> Result<CompleteQuestResponse, ApiError> {
        let input = CompleteQuestRequest { quest_id };
        let response = self
            .transport
            .execute(self.client.build_complete_today(&input)?)?;
        self.client.parse_complete_today(response)
    }

    pub fn delete_quest(&self, quest_id: i64) -> Result<serde_json::Value, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_delete_quest(quest_id)?)?;
        self.client.parse_delete_quest(response)
    }

    pub fn get_rival(&self) -> Result<GetRivalResponse, ApiError> {
        let response = self.transport.execute(self.client.build_get_rival())?;
        self.client.parse_get_rival(response)
    }

    pub fn list_rivals(&self) -> Result<ListRivalsResponse, ApiError> {
        let response = self.transport.execute(self.client.build_list_rivals())?;
        self.client.parse_list_rivals(response)
    }

    pub fn generate_rival(
        &self,
        personality: Option<PersonalityType>,
    ) -> Result<GenerateRivalResponse, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_generate_rival(personality))?;
        self.client.parse_generate_rival(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Replays canned responses and records what was sent.
    struct Scripted {
        responses: Mutex<Vec<HttpResponse>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<(u16, &str)>) -> Self {
            let mut responses: Vec<HttpResponse> = responses
                .into_iter()
                .map(|(status, body)| HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                })
                .collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for &Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
        }
    }

    fn api(transport: &Scripted) -> ApiClient<&Scripted> {
        ApiClient::new(
            RivalQuestClient::new("http://backend.test").with_auth_token("u1"),
            transport,
        )
    }

    #[test]
    fn create_quest_sends_title_and_parses_quest() {
        let transport = Scripted::new(vec![(
            200,
            r#"{"quest":{"id":1,"user_id":"u1","title":"Read","created_at":"2026-01-05T08:00:00Z"},"message":"ok"}"#,
        )]);
        let created = api(&transport).create_quest("Read").unwrap();
        assert_eq!(created.quest.title, "Read");
        assert!(!created.quest.completed_today);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"title":"Read"}"#));
    }

    #[test]
    fn transport_failure_is_opaque() {
        let transport = Scripted::new(Vec::new());
        let err = api(&transport).list_rivals().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn malformed_reference_never_reaches_transport() {
        let transport = Scripted::new(Vec::new());
        let err = api(&transport).verify_payment("../etc").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn generate_rival_quota_rejection_surfaces_as_upgrade_prompt() {
        let transport = Scripted::new(vec![(403, r#"{"detail":"Rival limit reached (1)."}"#)]);
        let err = api(&transport).generate_rival(None).unwrap_err();
        assert!(err.is_upgrade_prompt());
        let sent = transport.sent.lock().unwrap();
        assert!(sent[0].path.ends_with("personality_type=competitive"));
    }
}
