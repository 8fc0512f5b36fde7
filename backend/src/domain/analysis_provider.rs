//! Development analysis providers.
//!
//! [`AnalysisProvider`] is the seam to whatever performs the analysis. The
//! only implementation shipped is [`SimulatedAnalysisProvider`], which stands
//! in for a remote service: it waits a random latency, fails now and then, and
//! otherwise returns plausible but random assessments.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::{
    AnalysisResult, CognitiveAssessment, DataQuality, DevelopmentStage, EmotionState, MediaItem,
    MediaType, MotorAssessment, SkillLevel,
};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::models::analysis::AnalysisError;

pub const ANALYSIS_VERSION: &str = "1.0.0";

const PHOTO_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "heic"];
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mov", "m4v"];

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, media: &MediaItem) -> Result<AnalysisResult, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct SimulatedAnalysisProvider {
    min_latency: Duration,
    max_latency: Duration,
    failure_rate: f64,
}

impl Default for SimulatedAnalysisProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(5), 0.1)
    }
}

impl SimulatedAnalysisProvider {
    pub fn new(min_latency: Duration, max_latency: Duration, failure_rate: f64) -> Self {
        Self {
            min_latency: min_latency.min(max_latency),
            max_latency,
            failure_rate: if failure_rate.is_nan() { 0.0 } else { failure_rate.clamp(0.0, 1.0) },
        }
    }

    fn latency(&self) -> Duration {
        if self.max_latency <= self.min_latency {
            return self.min_latency;
        }
        rand::thread_rng().gen_range(self.min_latency..=self.max_latency)
    }
}

#[async_trait]
impl AnalysisProvider for SimulatedAnalysisProvider {
    async fn analyze(&self, media: &MediaItem) -> Result<AnalysisResult, AnalysisError> {
        check_format(media)?;

        let latency = self.latency();
        debug!("Simulating analysis of {} with {:?} latency", media.filename, latency);
        tokio::time::sleep(latency).await;

        if rand::thread_rng().gen_bool(self.failure_rate) {
            warn!("Simulated network failure analysing {}", media.filename);
            return Err(AnalysisError::NetworkError);
        }

        Ok(simulated_result(media))
    }
}

/// Reject media the analysis cannot handle
pub fn check_format(media: &MediaItem) -> Result<(), AnalysisError> {
    let filename = media.filename.trim();
    let Some((stem, extension)) = filename.rsplit_once('.') else {
        return Err(AnalysisError::InvalidMedia);
    };
    if stem.is_empty() {
        return Err(AnalysisError::InvalidMedia);
    }

    let extension = extension.to_lowercase();
    let supported = match media.media_type {
        MediaType::Photo => PHOTO_EXTENSIONS.contains(&extension.as_str()),
        MediaType::Video => VIDEO_EXTENSIONS.contains(&extension.as_str()),
    };
    if supported {
        Ok(())
    } else {
        Err(AnalysisError::UnsupportedFormat)
    }
}

fn simulated_result(media: &MediaItem) -> AnalysisResult {
    let mut rng = rand::thread_rng();
    let mut skill = || *SkillLevel::ALL.choose(&mut rng).unwrap_or(&SkillLevel::Developing);

    let motor = MotorAssessment {
        gross_motor: skill(),
        fine_motor: skill(),
        coordination: skill(),
        balance: skill(),
    };
    let cognitive = CognitiveAssessment {
        attention: skill(),
        social_interaction: skill(),
        language_readiness: skill(),
        problem_solving: skill(),
    };

    let mut rng = rand::thread_rng();
    let emotion_count = rng.gen_range(1..=3);
    let primary_emotions: Vec<EmotionState> = EmotionState::ALL
        .choose_multiple(&mut rng, emotion_count)
        .copied()
        .collect();

    let data_quality = match media.media_type {
        MediaType::Video => DataQuality::Excellent,
        MediaType::Photo => *[DataQuality::Good, DataQuality::Fair]
            .choose(&mut rng)
            .unwrap_or(&DataQuality::Good),
    };

    AnalysisResult {
        id: Uuid::new_v4(),
        media_id: media.id,
        timestamp: Utc::now(),
        analysis_version: ANALYSIS_VERSION.to_string(),
        development_stage: DevelopmentStage::from_age_months(media.baby_age_months),
        primary_emotions,
        emotion_confidence: rng.gen_range(0.7..=0.95),
        motor,
        cognitive,
        overall_health_score: rng.gen_range(70.0..=95.0),
        analysis_confidence: rng.gen_range(0.75..=0.95),
        data_quality,
    }
}
