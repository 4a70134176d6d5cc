use serde::{Deserialize, Serialize};

use super::quiz::QuizEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl UnitDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitDifficulty::Beginner => "Beginner",
            UnitDifficulty::Intermediate => "Intermediate",
            UnitDifficulty::Advanced => "Advanced",
        }
    }
}

/// A course unit. Topics scope the prompt of unit quizzes.
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub difficulty: UnitDifficulty,
    pub topics: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub content: &'static str,
    pub author: &'static str,
    pub published_at: &'static str,
    pub read_time: &'static str,
    pub tags: &'static [&'static str],
    pub category: &'static str,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnitListQuery {
    pub difficulty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitQuizResponse {
    pub unit_id: &'static str,
    pub unit_title: &'static str,
    pub time_limit_seconds: u32,
    #[serde(flatten)]
    pub envelope: QuizEnvelope,
}
