//! System-prompt assembly.

use chrono::{DateTime, Datelike, Local};
use serde::Serialize;
use tracing::instrument;

use crate::{
	store::{DocStore, Praises},
	types::StoreError,
};

/// Chinese weekday names, indexed by days since Monday.
const WEEKDAYS: [&str; 7] =
	["星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日"];

/// How the assembled instructions are delivered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionStyle {
	/// A single `system`-role message.
	System,
	/// A single `developer`-role message, as newer model families expect.
	Developer,
	/// A `user` message carrying the instructions followed by a canned `assistant`
	/// acknowledgement, for models that ignore system prompts.
	SystemAsUser,
}

/// One prompt message handed to the model API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
	pub role: String,
	pub content: String,
}

impl PromptMessage {
	fn new(role: &str, content: String) -> Self {
		Self { role: role.to_string(), content }
	}
}

/// Assembles the system prompt for a chat session.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
	/// The bot's persona prompt, always first.
	pub persona_prompt: String,
	/// Deployment-specific additions appended after the persona.
	pub additional_prompt: String,
	/// Whether to append the praise list.
	pub enable_praises: bool,
	/// Whether to append the current date and time.
	pub enable_time_prompt: bool,
	pub style: InstructionStyle,
	/// Canned acknowledgement used by [`InstructionStyle::SystemAsUser`].
	pub sysasuser_reply: String,
}

impl PromptBuilder {
	/// Assemble the instruction message list for one session.
	#[instrument(skip(self, store))]
	pub async fn build(&self, store: &DocStore) -> Result<Vec<PromptMessage>, StoreError> {
		let mut prompts = self.additional_prompt.clone();
		if self.enable_praises {
			prompts.push_str(&build_praises(&store.praises().await?));
		}
		if self.enable_time_prompt {
			prompts.push_str(&time_prompt(Local::now()));
		}

		let content = format!("{}{}", self.persona_prompt, prompts);

		Ok(match self.style {
			InstructionStyle::System => vec![PromptMessage::new("system", content)],
			InstructionStyle::Developer => vec![PromptMessage::new("developer", content)],
			InstructionStyle::SystemAsUser => vec![
				PromptMessage::new("user", content),
				PromptMessage::new("assistant", self.sysasuser_reply.clone()),
			],
		})
	}
}

/// Render the praise list as a prompt fragment.
pub fn build_praises(praises: &Praises) -> String {
	let mut lines = vec!["你喜欢以下几个人物，他们有各自的优点：".to_string()];
	for item in &praises.like {
		lines.push(format!("名字：{}，优点：{}", item.name, item.advantages));
	}
	lines.join("\n")
}

/// Render the current date, time and weekday as a prompt fragment.
fn time_prompt(now: DateTime<Local>) -> String {
	format!(
		"现在的时间是{}{}。",
		now.format("%Y年%m月%d日 %H:%M:%S"),
		WEEKDAYS[now.weekday().num_days_from_monday() as usize]
	)
}

/// Map a raw model-API error string to an operator-facing suggestion.
///
/// Returns an empty string when no known error key matches.
pub fn suggest_solution(errinfo: &str) -> String {
	let suggestions = [
		("content_filter", "消息已被内容过滤器过滤。请调整聊天内容后重试。"),
		("RateLimitReached", "模型达到调用速率限制。请稍等一段时间或联系Bot管理员。"),
		("tokens_limit_reached", "请求token达到上限。请重置上下文。"),
		("content_length_limit", "请求体过大。请重置上下文。"),
		("unauthorized", "访问token无效。请联系Bot管理员。"),
		(
			"invalid type: parameter messages.content is of type array but should be of type string.",
			"聊天请求体包含此模型不支持的数据类型。请重置上下文。",
		),
		(
			"At most 1 image(s) may be provided in one request.",
			"此模型只能在上下文中包含1张图片。如果此前的聊天已经发送过图片，请重置上下文。",
		),
	];

	for (key, suggestion) in suggestions {
		if errinfo.contains(key) {
			return format!("\n{}", suggestion)
		}
	}

	String::new()
}
