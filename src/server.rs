//! Webhook endpoint receiving Telegram updates.

use crate::bot::Router;
use crate::error::{BotError, Result};
use crate::telegram::{Messenger, Update};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub messenger: Arc<dyn Messenger>,
    pub cancel: CancellationToken,
}

pub fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/bot", post(webhook))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

/// Serve the webhook until `state.cancel` fires.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "Webhook server listening");

    let shutdown = state.cancel.clone().cancelled_owned();
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode webhook request");
            return StatusCode::BAD_REQUEST;
        }
    };

    let update_id = update.update_id;
    let Some(message) = update.message else {
        tracing::debug!(update_id, "Ignoring update without message");
        return StatusCode::OK;
    };
    let (Some(sender), Some(text)) = (message.from, message.text) else {
        tracing::debug!(update_id, "Ignoring message without sender or text");
        return StatusCode::OK;
    };

    tracing::info!(
        update_id,
        user_id = sender.id,
        username = sender.username.as_deref().unwrap_or(""),
        "Received message"
    );

    let chat_id = message.chat.id;
    tokio::spawn(async move {
        if let Err(e) = process_message(&state, sender.id, chat_id, text).await {
            tracing::error!(update_id, error = %e, "Failed to answer message");
        }
    });

    StatusCode::OK
}

/// Build the reply on the blocking pool and send it back to the chat.
pub async fn process_message(
    state: &AppState,
    sender_id: i64,
    chat_id: i64,
    text: String,
) -> Result<()> {
    let router = state.router.clone();
    let cancel = state.cancel.child_token();

    let reply = tokio::task::spawn_blocking(move || router.handle_text(&cancel, sender_id, &text))
        .await
        .map_err(|e| BotError::Handler(e.to_string()))?;

    state.messenger.send_message(chat_id, &reply).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{Assistant, SHOPPING_LIST_FILE};
    use crate::storage::Vault;
    use crate::storage::memory::MemoryVault;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::FixedOffset;
    use std::io::BufRead;
    use std::path::Path;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    struct ChannelMessenger(mpsc::UnboundedSender<(i64, String)>);

    #[async_trait]
    impl Messenger for ChannelMessenger {
        async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
            let _ = self.0.send((chat_id, text.to_string()));
            Ok(())
        }
    }

    struct BrokenVault;

    impl Vault for BrokenVault {
        fn open(&self, _: &Path) -> Result<Box<dyn BufRead + Send>> {
            panic!("disk on fire")
        }
        fn create(&self, _: &Path, _: &str) -> Result<()> {
            panic!("disk on fire")
        }
        fn exists(&self, _: &Path) -> Result<bool> {
            panic!("disk on fire")
        }
        fn read(&self, _: &Path) -> Result<String> {
            panic!("disk on fire")
        }
        fn append(&self, _: &Path, _: &str) -> Result<()> {
            panic!("disk on fire")
        }
        fn write(&self, _: &Path, _: &str) -> Result<()> {
            panic!("disk on fire")
        }
        fn walk(&self, _: &Path, _: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
            panic!("disk on fire")
        }
    }

    fn setup() -> (AppState, mpsc::UnboundedReceiver<(i64, String)>) {
        setup_with(Arc::new(
            MemoryVault::new().with_file(SHOPPING_LIST_FILE, "- milk"),
        ))
    }

    fn setup_with(vault: Arc<dyn Vault>) -> (AppState, mpsc::UnboundedReceiver<(i64, String)>) {
        crate::logging::init_test_logging();
        let assistant = Assistant::new(
            vault,
            "Templates/Inbox.md",
            FixedOffset::east_opt(3 * 3600).unwrap(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let state = AppState {
            router: Arc::new(Router::new(Arc::new(assistant), 42)),
            messenger: Arc::new(ChannelMessenger(tx)),
            cancel: CancellationToken::new(),
        };
        (state, rx)
    }

    fn post_update(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/bot")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _rx) = setup();
        let response = app(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_invalid_json() {
        let (state, _rx) = setup();
        let response = app(state).oneshot(post_update("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_get_on_webhook() {
        let (state, _rx) = setup();
        let response = app(state)
            .oneshot(Request::builder().uri("/bot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_answers_text_message() {
        let (state, mut rx) = setup();
        let body = r#"{"update_id": 1, "message": {"message_id": 1,
            "from": {"id": 42}, "chat": {"id": 4242}, "text": "/shopping_list"}}"#;

        let response = app(state).oneshot(post_update(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (chat_id, reply) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(chat_id, 4242);
        assert_eq!(reply, "1. milk\n");
    }

    #[tokio::test]
    async fn test_panicking_handler_is_reported_and_not_answered() {
        let (state, mut rx) = setup_with(Arc::new(BrokenVault));

        let err = process_message(&state, 42, 42, "/shopping_list".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Handler(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_ignores_updates_without_text() {
        let (state, mut rx) = setup();
        let body = r#"{"update_id": 2, "message": {"message_id": 1,
            "from": {"id": 42}, "chat": {"id": 42}}}"#;

        let response = app(state).oneshot(post_update(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let received = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(!matches!(received, Ok(Some(_))));
    }
}
