//! Transcript-level statistics computed without any external call.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationHistory;

/// Coarse shape of how the conversation developed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionPattern {
    None,
    SingleThread,
    Developing,
    DeepExploration,
}

impl EvolutionPattern {
    pub fn from_count(user_messages: usize) -> Self {
        match user_messages {
            0 => Self::None,
            1..=2 => Self::SingleThread,
            3..=5 => Self::Developing,
            _ => Self::DeepExploration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    None,
    Low,
    Moderate,
    High,
}

impl EngagementLevel {
    pub fn from_count(user_messages: usize) -> Self {
        match user_messages {
            0 => Self::None,
            1..=2 => Self::Low,
            3..=7 => Self::Moderate,
            _ => Self::High,
        }
    }
}

/// Aggregate statistics over the user's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationArc {
    pub user_message_count: usize,
    /// Characters (not bytes) across all user messages.
    pub total_characters: usize,
    pub evolution_pattern: EvolutionPattern,
    pub engagement_level: EngagementLevel,
}

impl ConversationArc {
    pub fn empty() -> Self {
        Self::from_counts(0, 0)
    }

    fn from_counts(user_message_count: usize, total_characters: usize) -> Self {
        Self {
            user_message_count,
            total_characters,
            evolution_pattern: EvolutionPattern::from_count(user_message_count),
            engagement_level: EngagementLevel::from_count(user_message_count),
        }
    }

    pub fn from_transcript(history: &ConversationHistory) -> Self {
        let (count, chars) = history
            .iter()
            .filter(|m| m.is_user())
            .fold((0, 0), |(count, chars), m| {
                (count + 1, chars + m.content().chars().count())
            });
        Self::from_counts(count, chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;

    #[test]
    fn counts_only_user_messages() {
        let history = vec![
            Message::user("héllo"),
            Message::assistant("ignored entirely"),
            Message::user("abc"),
        ];
        let arc = ConversationArc::from_transcript(&history);
        assert_eq!(arc.user_message_count, 2);
        assert_eq!(arc.total_characters, 8);
        assert_eq!(arc.evolution_pattern, EvolutionPattern::SingleThread);
        assert_eq!(arc.engagement_level, EngagementLevel::Low);
    }

    #[test]
    fn thresholds() {
        let cases = [
            (0, EvolutionPattern::None, EngagementLevel::None),
            (2, EvolutionPattern::SingleThread, EngagementLevel::Low),
            (3, EvolutionPattern::Developing, EngagementLevel::Moderate),
            (5, EvolutionPattern::Developing, EngagementLevel::Moderate),
            (6, EvolutionPattern::DeepExploration, EngagementLevel::Moderate),
            (7, EvolutionPattern::DeepExploration, EngagementLevel::Moderate),
            (8, EvolutionPattern::DeepExploration, EngagementLevel::High),
        ];
        for (count, evolution, engagement) in cases {
            assert_eq!(EvolutionPattern::from_count(count), evolution, "count {count}");
            assert_eq!(EngagementLevel::from_count(count), engagement, "count {count}");
        }
    }

    #[test]
    fn serializes_camel_case_snake_values() {
        let json = serde_json::to_value(ConversationArc::empty()).unwrap();
        assert_eq!(json["userMessageCount"], 0);
        assert_eq!(json["evolutionPattern"], "none");
        assert_eq!(json["engagementLevel"], "none");
    }
}
