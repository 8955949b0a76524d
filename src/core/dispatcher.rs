use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::error;

use crate::core::classifier::ClassifierAdapter;
use crate::core::config::AppConfig;
use crate::core::executor::ActionExecutor;
use crate::core::intent::{ClassificationResult, Intent};
use crate::core::llm::providers::GoogleProvider;
use crate::core::messages;

/// Per-message pipeline: classify, then execute or relay.
///
/// Holds no mutable state; one instance is shared by every chat.
pub struct Dispatcher {
    classifier: Arc<ClassifierAdapter>,
    executor: Arc<ActionExecutor>,
}

impl Dispatcher {
    pub fn new(classifier: Arc<ClassifierAdapter>, executor: Arc<ActionExecutor>) -> Self {
        Self {
            classifier,
            executor,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = GoogleProvider::from_config(config)?;
        let classifier = ClassifierAdapter::new(Arc::new(provider));
        let executor = ActionExecutor::from_config(config)?;
        Ok(Self::new(Arc::new(classifier), Arc::new(executor)))
    }

    pub fn welcome(&self, first_name: &str) -> String {
        messages::welcome(first_name)
    }

    pub fn help(&self) -> &'static str {
        messages::HELP
    }

    /// Direct status check that never consults the classifier.
    pub async fn status(&self) -> String {
        let executor = Arc::clone(&self.executor);
        guarded(
            "status command",
            messages::STATUS_UNAVAILABLE,
            async move { executor.execute(Intent::QueryStatus).await },
        )
        .await
    }

    pub async fn handle_text(&self, text: &str) -> String {
        let classifier = Arc::clone(&self.classifier);
        let executor = Arc::clone(&self.executor);
        let utterance = text.to_string();
        guarded("message pipeline", messages::GENERIC_APOLOGY, async move {
            match classifier.classify(&utterance).await {
                ClassificationResult::Intent(intent) => executor.execute(intent).await,
                ClassificationResult::Conversational(reply) => reply,
            }
        })
        .await
    }

    pub async fn converse(&self, text: &str) -> String {
        let classifier = Arc::clone(&self.classifier);
        let utterance = text.to_string();
        guarded("conversation", messages::GENERIC_APOLOGY, async move {
            classifier.converse(&utterance).await
        })
        .await
    }
}

// Runs the flow on its own task so a panic inside the adapter or executor
// surfaces here as a JoinError instead of tearing down the chat loop.
async fn guarded<F>(label: &str, fallback: &str, flow: F) -> String
where
    F: Future<Output = String> + Send + 'static,
{
    match tokio::spawn(flow).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Unexpected fault in {}: {}", label, e);
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::device::DeviceClient;
    use crate::core::llm::{ChatMessage, LlmProvider};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::time::Duration;

    enum Script {
        Reply(&'static str),
        Fail,
        Panic,
    }

    struct FakeProvider(Script);

    #[async_trait]
    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate(&self, _messages: &[ChatMessage]) -> anyhow::Result<String> {
            match self.0 {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Fail => Err(anyhow!("backend down")),
                Script::Panic => panic!("provider contract violated"),
            }
        }
    }

    // Nothing listens on port 9, so any device call is a network fault.
    fn dispatcher(script: Script) -> Dispatcher {
        let classifier = ClassifierAdapter::new(Arc::new(FakeProvider(script)));
        let device = DeviceClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        Dispatcher::new(
            Arc::new(classifier),
            Arc::new(ActionExecutor::new(device)),
        )
    }

    #[tokio::test]
    async fn conversational_reply_is_relayed_unchanged() {
        let d = dispatcher(Script::Reply("It's sunny today"));
        assert_eq!(d.handle_text("how's the weather").await, "It's sunny today");
    }

    #[tokio::test]
    async fn intent_with_unreachable_device_yields_connectivity_reply() {
        let d = dispatcher(Script::Reply("FUNCTION_CALL: turn_off_pc"));
        assert_eq!(d.handle_text("tắt máy").await, messages::CONNECTION_FAILED);
    }

    #[tokio::test]
    async fn status_bypasses_classifier() {
        // A panicking classifier proves /status never reaches it.
        let d = dispatcher(Script::Panic);
        assert_eq!(d.status().await, messages::CONNECTION_FAILED);
    }

    #[tokio::test]
    async fn panic_in_pipeline_becomes_generic_apology() {
        let d = dispatcher(Script::Panic);
        assert_eq!(d.handle_text("bật máy").await, messages::GENERIC_APOLOGY);
        assert_eq!(d.converse("xin chào").await, messages::GENERIC_APOLOGY);
    }

    #[tokio::test]
    async fn classifier_fault_is_apology_not_error() {
        let d = dispatcher(Script::Fail);
        assert_eq!(d.handle_text("bật máy").await, messages::CLASSIFIER_FAULT);
    }

    #[test]
    fn welcome_greets_user_by_name() {
        let d = dispatcher(Script::Fail);
        let text = d.welcome("Lan");
        assert!(text.contains("Lan"));
        assert!(text.contains("turn on pc"));
        assert!(d.help().contains("/status"));
    }

    #[test]
    fn welcome_and_help_are_html_with_escaped_name() {
        let d = dispatcher(Script::Fail);
        let text = d.welcome("<Lan & Minh>");
        assert!(text.contains("<b>Chào mừng &lt;Lan &amp; Minh&gt;!</b>"));
        assert!(!text.contains("<Lan"));
        assert!(d.help().contains("<b>Lưu ý:</b>"));
    }
}
