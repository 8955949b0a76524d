use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::intent::{
    ClassificationResult, FUNCTION_CALL_MARKER, MarkerParse, parse_classifier_reply,
};
use crate::core::llm::{ChatMessage, LlmProvider};
use crate::core::messages;

pub struct ClassifierAdapter {
    provider: Arc<dyn LlmProvider>,
}

impl ClassifierAdapter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        info!("Classifier adapter initialized with {}", provider.name());
        Self { provider }
    }

    /// Never fails: oracle faults and malformed markers become apology text.
    pub async fn classify(&self, utterance: &str) -> ClassificationResult {
        let prompt = [
            ChatMessage::system(intent_menu_prompt()),
            ChatMessage::user(format!("Tin nhắn: \"{}\"", utterance)),
        ];

        let raw = match self.provider.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error analyzing message with {}: {}", self.provider.name(), e);
                return ClassificationResult::Conversational(messages::CLASSIFIER_FAULT.to_string());
            }
        };
        info!("Classifier response: {}", raw.trim());

        match parse_classifier_reply(&raw) {
            MarkerParse::Intent(intent) => ClassificationResult::Intent(intent),
            MarkerParse::Unparseable(token) => {
                warn!("Invalid function name: {}", token);
                ClassificationResult::Conversational(
                    messages::CLASSIFIER_UNKNOWN_INTENT.to_string(),
                )
            }
            MarkerParse::Unmarked(text) if text.is_empty() => {
                error!("Classifier returned a blank reply");
                ClassificationResult::Conversational(messages::CLASSIFIER_FAULT.to_string())
            }
            MarkerParse::Unmarked(text) => ClassificationResult::Conversational(text),
        }
    }

    /// Plain small talk, no intent menu.
    pub async fn converse(&self, utterance: &str) -> String {
        let prompt = [
            ChatMessage::system(conversation_prompt()),
            ChatMessage::user(format!("Tin nhắn: \"{}\"", utterance)),
        ];
        match self.provider.generate(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                error!("Classifier returned a blank conversational reply");
                messages::CONVERSE_FAULT.to_string()
            }
            Err(e) => {
                error!("Error generating natural response: {}", e);
                messages::CONVERSE_FAULT.to_string()
            }
        }
    }
}

pub fn intent_menu_prompt() -> String {
    format!(
        "\
Bạn là một AI assistant điều khiển máy tính cá nhân. Phân tích tin nhắn của người dùng và xác định xem người dùng muốn thực hiện hành động nào.

Các hành động có thể thực hiện:
1. turn_on_pc: Bật máy tính (các từ khóa: bật, mở, khởi động, turn on, start, power on)
2. turn_off_pc: Tắt máy tính (các từ khóa: tắt, đóng, shutdown, turn off, power off)
3. check_pc_status: Kiểm tra trạng thái máy tính (các từ khóa: kiểm tra, trạng thái, status, check)

Nếu tin nhắn có ý định thực hiện một trong 3 hành động trên, hãy trả lời CHÍNH XÁC với format:
{} [tên_function]

Nếu không phải 3 hành động trên, hãy trả lời tự nhiên như một AI assistant thông thường.",
        FUNCTION_CALL_MARKER
    )
}

pub fn conversation_prompt() -> &'static str {
    "\
Bạn là một AI assistant thân thiện hỗ trợ điều khiển máy tính cá nhân.
Hãy trả lời tin nhắn của người dùng một cách tự nhiên và hữu ích.
Trả lời bằng tiếng Việt một cách thân thiện và hữu ích."
}
