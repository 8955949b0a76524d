//! User-facing reply texts (Vietnamese, with English command hints).
//!
//! `welcome` and `HELP` are Telegram HTML; everything else is plain text.

pub const CLASSIFIER_UNKNOWN_INTENT: &str = "Xin lỗi, tôi không hiểu yêu cầu của bạn. Hãy thử lại.";
pub const CLASSIFIER_FAULT: &str = "Xin lỗi, đã xảy ra lỗi khi xử lý tin nhắn của bạn.";
pub const CONVERSE_FAULT: &str = "Xin lỗi, tôi không thể trả lời tin nhắn của bạn lúc này.";

pub const GENERIC_APOLOGY: &str = "❌ Xin lỗi, đã xảy ra lỗi khi xử lý tin nhắn của bạn.";
pub const STATUS_UNAVAILABLE: &str = "❌ Không thể kiểm tra trạng thái máy tính lúc này.";

pub const POWER_ON_OK: &str = "✅ Máy tính đã được bật thành công!";
pub const POWER_OFF_OK: &str = "✅ Máy tính đã được tắt thành công!";
pub const STATUS_ONLINE: &str = "🟢 Máy tính đang hoạt động (Online)";
pub const STATUS_OFFLINE: &str = "🔴 Máy tính đang tắt (Offline)";
pub const CONNECTION_FAILED: &str =
    "❌ Không thể kết nối đến máy tính. Vui lòng kiểm tra kết nối mạng.";

pub fn power_on_failed(code: u16) -> String {
    format!("❌ Không thể bật máy tính. Mã lỗi: {}", code)
}

pub fn power_off_failed(code: u16) -> String {
    format!("❌ Không thể tắt máy tính. Mã lỗi: {}", code)
}

pub fn status_failed(code: u16) -> String {
    format!("❌ Không thể kiểm tra trạng thái máy tính. Mã lỗi: {}", code)
}

pub fn welcome(first_name: &str) -> String {
    format!(
        "\
🖥️ <b>Chào mừng {}!</b>

Tôi là bot điều khiển máy tính cá nhân của bạn. Tôi có thể:

🔵 <b>Bật máy tính</b> - Gửi: \"bật máy tính\", \"mở máy\", \"turn on pc\"
🔴 <b>Tắt máy tính</b> - Gửi: \"tắt máy tính\", \"shutdown\", \"turn off pc\"
📊 <b>Kiểm tra trạng thái</b> - Gửi: \"kiểm tra máy tính\", \"trạng thái\", \"status\"

Bạn cũng có thể chat bình thường với tôi! 😊

Hãy gửi tin nhắn để bắt đầu điều khiển máy tính của bạn.",
        teloxide::utils::html::escape(first_name)
    )
}

pub const HELP: &str = "\
🆘 <b>Hướng dẫn sử dụng:</b>

<b>Các lệnh điều khiển máy tính:</b>
• Bật máy: \"bật máy tính\", \"mở máy\", \"khởi động máy\"
• Tắt máy: \"tắt máy tính\", \"shutdown\", \"tắt nguồn\"
• Kiểm tra: \"kiểm tra máy tính\", \"trạng thái máy\", \"pc status\"

<b>Các lệnh bot:</b>
/start - Bắt đầu sử dụng bot
/help - Hiển thị hướng dẫn này
/status - Kiểm tra trạng thái máy tính

<b>Lưu ý:</b>
• Bạn có thể chat bình thường với bot
• Bot sẽ tự động nhận diện ý định điều khiển máy tính
• Hỗ trợ cả tiếng Việt và tiếng Anh";
