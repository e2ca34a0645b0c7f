//! Request Lifecycle Service
//!
//! Intake, claiming and completion of buyer requests, plus the conversation
//! attached to each request. Status moves only forward:
//! NEW/OPEN -> CLAIMED -> BOUGHT/COMPLETED.

use crate::db::repository::{MessageRepository, RequestRepository};
use crate::services::{ChangeFeed, Subscription, Topic};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_ID_LEN, MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{id, time};
use shared::{AppError, AppResult, Message, Request, RequestStatus, ResourceKind, SenderType};

#[derive(Clone)]
pub struct RequestLifecycleService {
    requests: RequestRepository,
    messages: MessageRepository,
    feed: ChangeFeed,
    claim_window: i64,
}

impl RequestLifecycleService {
    pub fn new(
        requests: RequestRepository,
        messages: MessageRepository,
        feed: ChangeFeed,
        claim_window: i64,
    ) -> Self {
        Self {
            requests,
            messages,
            feed,
            claim_window,
        }
    }

    // ========== Intake ==========

    /// Create a NEW request (plain intake, no conversation).
    ///
    /// The request id is caller-supplied; creating an id twice is a
    /// REQUEST_EXISTS conflict, never an overwrite.
    pub async fn create_request(&self, request_id: &str, text: &str) -> AppResult<Request> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(text, "text", MAX_TEXT_LEN)?;

        let now = time::now_millis();
        let request = Request {
            request_id: request_id.to_string(),
            buyer_id: None,
            text: text.to_string(),
            category: shared::normalize_category(text),
            status: RequestStatus::New,
            created_at: now,
            updated_at: now,
            latest_buyer_text: None,
            bought_at: None,
            bought_row_index: None,
            bought_order_id: None,
            completed_at: None,
            selected_offer_id: None,
            buyer_name: None,
            address: None,
        };
        self.requests.create(&request).await?;
        tracing::info!(request_id, "request created");
        self.feed.publish(Topic::Requests);
        Ok(request)
    }

    /// Create an OPEN request with its first buyer message (conversation
    /// mode). Returns the request together with that message.
    pub async fn create_conversation(
        &self,
        request_id: &str,
        buyer_id: &str,
        text: &str,
    ) -> AppResult<(Request, Message)> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(buyer_id, "buyerId", MAX_ID_LEN)?;
        validate_required_text(text, "text", MAX_TEXT_LEN)?;

        let now = time::now_millis();
        let request = Request {
            request_id: request_id.to_string(),
            buyer_id: Some(buyer_id.to_string()),
            text: text.to_string(),
            category: shared::normalize_category(text),
            status: RequestStatus::Open,
            created_at: now,
            updated_at: now,
            latest_buyer_text: Some(text.to_string()),
            bought_at: None,
            bought_row_index: None,
            bought_order_id: None,
            completed_at: None,
            selected_offer_id: None,
            buyer_name: None,
            address: None,
        };
        self.requests.create(&request).await?;

        let message = Message {
            request_id: request_id.to_string(),
            message_id: id::message_id(),
            sender_type: SenderType::Buyer,
            sender_id: buyer_id.to_string(),
            text: text.to_string(),
            created_at: now,
        };
        let message = self.messages.create(&message).await?;
        tracing::info!(request_id, buyer_id, "conversation opened");
        self.feed.publish(Topic::Requests);
        self.feed.publish(Topic::Messages {
            request_id: request_id.to_string(),
        });
        Ok((request, message))
    }

    // ========== Claiming ==========

    /// Claim one request from the oldest NEW requests.
    ///
    /// Looks at the oldest `claim_window` NEW requests and takes the newest
    /// of them, so stale work keeps its place in line while the claimer
    /// still receives something fresh. At most one claimer wins a given
    /// request; the whole operation is transactional.
    pub async fn claim_oldest_open(&self) -> AppResult<Option<Request>> {
        let claimed = self
            .requests
            .claim_oldest(self.claim_window, time::now_millis())
            .await?;
        if let Some(req) = &claimed {
            tracing::info!(request_id = %req.request_id, "request claimed");
            self.feed.publish(Topic::Requests);
        }
        Ok(claimed)
    }

    // ========== Completion ==========

    /// Finish a request: status COMPLETED with the winning offer and the
    /// buyer's delivery details. Repeating the call rewrites the same
    /// terminal fields; it never resurrects the request.
    pub async fn mark_completed(
        &self,
        request_id: &str,
        selected_offer_id: Option<String>,
        buyer_name: Option<String>,
        address: Option<String>,
    ) -> AppResult<Request> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_optional_text(&buyer_name, "buyerName", MAX_NAME_LEN)?;
        validate_optional_text(&address, "address", MAX_ADDRESS_LEN)?;

        let now = time::now_millis();
        let mut patch = serde_json::json!({
            "status": "COMPLETED",
            "updatedAt": now,
            "completedAt": now,
        });
        let obj = patch
            .as_object_mut()
            .ok_or_else(|| AppError::internal("patch must be an object"))?;
        if let Some(offer_id) = selected_offer_id {
            obj.insert("selectedOfferId".into(), offer_id.into());
        }
        if let Some(name) = buyer_name {
            obj.insert("buyerName".into(), name.into());
        }
        if let Some(addr) = address {
            obj.insert("address".into(), addr.into());
        }

        let updated = self.requests.merge(request_id, patch).await?;
        tracing::info!(request_id, "request completed");
        self.feed.publish(Topic::Requests);
        Ok(updated)
    }

    // ========== Conversation ==========

    /// Append a buyer message and move the "current question" forward:
    /// `latestBuyerText` on the request follows the newest buyer message.
    pub async fn send_buyer_message(
        &self,
        request_id: &str,
        buyer_id: &str,
        text: &str,
    ) -> AppResult<Message> {
        validate_required_text(buyer_id, "buyerId", MAX_ID_LEN)?;
        let message = self
            .append_message(request_id, SenderType::Buyer, buyer_id, text)
            .await?;
        self.requests
            .merge(
                request_id,
                serde_json::json!({
                    "latestBuyerText": text,
                    "updatedAt": time::now_millis(),
                }),
            )
            .await?;
        self.feed.publish(Topic::Requests);
        Ok(message)
    }

    /// Append a seller message. Leaves the current question untouched but
    /// still counts as conversation activity on the request.
    pub async fn send_seller_message(
        &self,
        request_id: &str,
        seller_id: &str,
        text: &str,
    ) -> AppResult<Message> {
        validate_required_text(seller_id, "sellerId", MAX_ID_LEN)?;
        let message = self
            .append_message(request_id, SenderType::Seller, seller_id, text)
            .await?;
        self.requests
            .merge(
                request_id,
                serde_json::json!({ "updatedAt": time::now_millis() }),
            )
            .await?;
        self.feed.publish(Topic::Requests);
        Ok(message)
    }

    async fn append_message(
        &self,
        request_id: &str,
        sender_type: SenderType,
        sender_id: &str,
        text: &str,
    ) -> AppResult<Message> {
        validate_required_text(request_id, "requestId", MAX_ID_LEN)?;
        validate_required_text(text, "text", MAX_TEXT_LEN)?;
        if self.requests.find_by_id(request_id).await?.is_none() {
            return Err(AppError::NotFound(ResourceKind::Request));
        }
        let message = Message {
            request_id: request_id.to_string(),
            message_id: id::message_id(),
            sender_type,
            sender_id: sender_id.to_string(),
            text: text.to_string(),
            created_at: time::now_millis(),
        };
        let message = self.messages.create(&message).await?;
        self.feed.publish(Topic::Messages {
            request_id: request_id.to_string(),
        });
        Ok(message)
    }

    // ========== Reads ==========

    pub async fn get_request(&self, request_id: &str) -> AppResult<Request> {
        self.requests
            .find_by_id(request_id)
            .await?
            .ok_or(AppError::NotFound(ResourceKind::Request))
    }

    pub async fn latest_request(&self) -> AppResult<Option<Request>> {
        Ok(self.requests.find_latest().await?)
    }

    pub async fn open_requests(&self) -> AppResult<Vec<Request>> {
        Ok(self.requests.find_open().await?)
    }

    /// One buyer's requests, most recently active first (the "my requests"
    /// view)
    pub async fn list_buyer_requests(&self, buyer_id: &str) -> AppResult<Vec<Request>> {
        validate_required_text(buyer_id, "buyerId", MAX_ID_LEN)?;
        Ok(self.requests.find_by_buyer(buyer_id).await?)
    }

    pub async fn conversation(&self, request_id: &str) -> AppResult<Vec<Message>> {
        Ok(self.messages.find_by_request(request_id).await?)
    }

    /// The buyer message offers currently answer, if the conversation has one
    pub async fn latest_buyer_message(&self, request_id: &str) -> AppResult<Option<Message>> {
        Ok(self.messages.find_latest_buyer_message(request_id).await?)
    }

    // ========== Watches ==========

    /// Live snapshots of the non-terminal request list
    pub fn watch_open_requests(&self) -> Subscription<Request> {
        let repo = self.requests.clone();
        self.feed.watch(
            |t| matches!(t, Topic::Requests),
            move || {
                let repo = repo.clone();
                async move { Ok(repo.find_open().await?) }
            },
        )
    }

    /// Live snapshots of one buyer's request list
    pub fn watch_buyer_requests(&self, buyer_id: &str) -> Subscription<Request> {
        let repo = self.requests.clone();
        let bid = buyer_id.to_string();
        self.feed.watch(
            |t| matches!(t, Topic::Requests),
            move || {
                let repo = repo.clone();
                let bid = bid.clone();
                async move { Ok(repo.find_by_buyer(&bid).await?) }
            },
        )
    }

    /// Live snapshots of one conversation
    pub fn watch_conversation(&self, request_id: &str) -> Subscription<Message> {
        let repo = self.messages.clone();
        let rid = request_id.to_string();
        let topic_rid = request_id.to_string();
        self.feed.watch(
            move |t| matches!(t, Topic::Messages { request_id } if *request_id == topic_rid),
            move || {
                let repo = repo.clone();
                let rid = rid.clone();
                async move { Ok(repo.find_by_request(&rid).await?) }
            },
        )
    }
}
