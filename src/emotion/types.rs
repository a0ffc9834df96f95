//! Emotion types and state
//!
//! The emotion vocabulary is a closed set of nine tags. Events carry
//! one tag plus its origin (the local user or the remote agent), and
//! the state keeps the last tag seen per origin with a bounded history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Closed set of emotion tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionType {
    Happy,
    Sad,
    Angry,
    Anxious,
    Surprised,
    Grateful,
    Excited,
    Confused,
    Neutral,
}

impl EmotionType {
    /// Wire name of the tag
    pub fn name(&self) -> &'static str {
        match self {
            EmotionType::Happy => "happy",
            EmotionType::Sad => "sad",
            EmotionType::Angry => "angry",
            EmotionType::Anxious => "anxious",
            EmotionType::Surprised => "surprised",
            EmotionType::Grateful => "grateful",
            EmotionType::Excited => "excited",
            EmotionType::Confused => "confused",
            EmotionType::Neutral => "neutral",
        }
    }

    /// Parse a wire name; anything outside the closed set is None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "happy" => Some(EmotionType::Happy),
            "sad" => Some(EmotionType::Sad),
            "angry" => Some(EmotionType::Angry),
            "anxious" => Some(EmotionType::Anxious),
            "surprised" => Some(EmotionType::Surprised),
            "grateful" => Some(EmotionType::Grateful),
            "excited" => Some(EmotionType::Excited),
            "confused" => Some(EmotionType::Confused),
            "neutral" => Some(EmotionType::Neutral),
            _ => None,
        }
    }

    /// All emotion tags
    pub fn all() -> &'static [EmotionType] {
        &[
            EmotionType::Happy,
            EmotionType::Sad,
            EmotionType::Angry,
            EmotionType::Anxious,
            EmotionType::Surprised,
            EmotionType::Grateful,
            EmotionType::Excited,
            EmotionType::Confused,
            EmotionType::Neutral,
        ]
    }
}

impl std::fmt::Display for EmotionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Who an emotion event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionSource {
    User,
    Agent,
}

impl EmotionSource {
    /// Wire name of the source
    pub fn name(&self) -> &'static str {
        match self {
            EmotionSource::User => "user",
            EmotionSource::Agent => "agent",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(EmotionSource::User),
            "agent" => Some(EmotionSource::Agent),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmotionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One accepted emotion event, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionData {
    pub emotion: EmotionType,
    pub source: EmotionSource,
    /// Always epoch milliseconds (normalized at ingestion)
    pub timestamp_ms: i64,
    /// Advisory classifier confidence in [0, 1]
    pub confidence: Option<f32>,
}

/// Last known emotion per source plus a bounded event history
///
/// Each source is independently last-write-wins; nothing decays back to
/// neutral. History preserves arrival order and drops from the head
/// once `max_history` is exceeded.
#[derive(Debug, Clone)]
pub struct EmotionState {
    pub user_emotion: EmotionType,
    pub agent_emotion: EmotionType,
    pub last_update_ms: Option<i64>,
    history: VecDeque<EmotionData>,
    max_history: usize,
}

impl EmotionState {
    /// Fresh session state: both sources neutral, empty history
    pub fn new(max_history: usize) -> Self {
        Self {
            user_emotion: EmotionType::Neutral,
            agent_emotion: EmotionType::Neutral,
            last_update_ms: None,
            history: VecDeque::with_capacity(max_history.min(64)),
            max_history,
        }
    }

    /// Last known emotion for a source
    pub fn emotion_for(&self, source: EmotionSource) -> EmotionType {
        match source {
            EmotionSource::User => self.user_emotion,
            EmotionSource::Agent => self.agent_emotion,
        }
    }

    /// Event history, oldest first
    pub fn history(&self) -> &VecDeque<EmotionData> {
        &self.history
    }

    /// History capacity
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Commit an accepted event: replace one source, append, trim
    pub(crate) fn apply(&mut self, data: &EmotionData) {
        match data.source {
            EmotionSource::User => self.user_emotion = data.emotion,
            EmotionSource::Agent => self.agent_emotion = data.emotion,
        }
        self.last_update_ms = Some(data.timestamp_ms);
        self.history.push_back(data.clone());
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }
}
