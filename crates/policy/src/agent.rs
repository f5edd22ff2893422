/// Substrings that mark a user agent as automated. Matched case-insensitively.
const AGENT_MARKERS: &[&str] = &["gpt", "claude", "assistant", "bot", "ai", "agent", "copilot", "automation", "curl", "python-requests"];

/// Classifies a `User-Agent` header as an AI agent or automation client.
///
/// Deliberately broad: `ai` alone matches many browser strings. Callers use
/// this to tailor responses, never to grant access.
pub fn is_ai_agent(user_agent: &str) -> bool {
	let ua = user_agent.to_lowercase();
	AGENT_MARKERS.iter().any(|marker| ua.contains(marker))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("ChatGPT-User/1.0", true)]
	#[case("Claude-Web/2", true)]
	#[case("curl/8.5.0", true)]
	#[case("python-requests/2.31", true)]
	#[case("GitHub-Copilot", true)]
	#[case("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0", false)]
	#[case("", false)]
	fn classifies_user_agents(#[case] ua: &str, #[case] expected: bool) {
		assert_eq!(is_ai_agent(ua), expected);
	}
}
