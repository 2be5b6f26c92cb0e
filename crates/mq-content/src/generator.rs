//! Generate-or-fall-back
//!
//! Daily tasks and fitness sets never fail: any generation, JSON or schema
//! error is logged and replaced with pooled content. Journal insights have no
//! fallback and return the error.

use crate::client::GenerationClient;
use crate::error::{ContentError, GenerationError};
use crate::fallback::{fallback_daily_content, fallback_fitness};
use crate::parse::{parse_daily_content, parse_fitness};
use crate::prompt::{daily_tasks_prompt, fitness_prompt, journal_insight_prompt};
use chrono::NaiveDate;
use mq_progress::{DailyContent, DailyFitness, Path};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, warn};

/// Where a piece of content came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Parsed from the generation endpoint
    Generated,
    /// Drawn from the fallback pools
    Fallback {
        /// Failure that caused the fallback
        reason: String,
    },
}

/// Content plus its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    /// The content
    pub content: T,
    /// Its source
    pub source: ContentSource,
}

impl<T> Generated<T> {
    /// Whether fallback pools were used
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ContentSource::Fallback { .. })
    }
}

/// Produces daily content through a [`GenerationClient`]
pub struct ContentGenerator {
    client: Arc<dyn GenerationClient>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGenerator").finish_non_exhaustive()
    }
}

impl ContentGenerator {
    /// Generator with an OS-seeded fallback RNG
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Generator with reproducible fallback picks
    #[must_use]
    pub fn with_seed(client: Arc<dyn GenerationClient>, seed: u64) -> Self {
        Self {
            client,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Today's small tasks and Big Quest for `path`
    pub async fn daily_content(&self, path: Path, history: &[String], today: NaiveDate) -> Generated<DailyContent> {
        let prompt = daily_tasks_prompt(path, history, today);
        let attempt = match self.client.generate(&prompt).await {
            Ok(text) => parse_daily_content(&text, today),
            Err(e) => Err(ContentError::from(e)),
        };
        match attempt {
            Ok(content) => {
                info!(%today, path = path.id(), "daily content generated");
                Generated {
                    content,
                    source: ContentSource::Generated,
                }
            }
            Err(e) => {
                warn!(%today, path = path.id(), error = %e, "daily content generation failed, using fallback pools");
                let content = fallback_daily_content(path, today, &mut *self.rng.lock());
                Generated {
                    content,
                    source: ContentSource::Fallback { reason: e.to_string() },
                }
            }
        }
    }

    /// Today's five fitness tasks
    pub async fn daily_fitness(&self, today: NaiveDate) -> Generated<DailyFitness> {
        let attempt = match self.client.generate(&fitness_prompt()).await {
            Ok(text) => parse_fitness(&text, today),
            Err(e) => Err(ContentError::from(e)),
        };
        match attempt {
            Ok(content) => {
                info!(%today, "fitness tasks generated");
                Generated {
                    content,
                    source: ContentSource::Generated,
                }
            }
            Err(e) => {
                warn!(%today, error = %e, "fitness generation failed, using fallback pool");
                let content = fallback_fitness(today, &mut *self.rng.lock());
                Generated {
                    content,
                    source: ContentSource::Fallback { reason: e.to_string() },
                }
            }
        }
    }

    /// A reflection on one journal entry
    pub async fn journal_insight(&self, entry: &str) -> Result<String, GenerationError> {
        let text = self.client.generate(&journal_insight_prompt(entry)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::MissingText);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockGenerationClient;
    use mq_progress::Category;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn generator(mock: MockGenerationClient) -> ContentGenerator {
        ContentGenerator::with_seed(Arc::new(mock), 42)
    }

    #[tokio::test]
    async fn valid_reply_is_used() {
        let mut mock = MockGenerationClient::new();
        mock.expect_generate().times(1).returning(|prompt| {
            assert!(prompt.contains("**User's Main Path:** focus"));
            Ok(r#"```json
{"daily_tasks":[
 {"category":"Resilience","task":"a","isJournaling":false},
 {"category":"Focus","task":"b","isJournaling":true},
 {"category":"Positivity","task":"c","isJournaling":false}],
 "big_quest":{"path":"focus","task":"q"}}
```"#
                .to_string())
        });
        let out = generator(mock).daily_content(Path::Focus, &[], today()).await;
        assert!(!out.is_fallback());
        assert_eq!(out.content.tasks[1].text, "b");
        assert_eq!(out.content.big_quest.text, "q");
    }

    #[tokio::test]
    async fn server_error_falls_back() {
        let mut mock = MockGenerationClient::new();
        mock.expect_generate().returning(|_| {
            Err(GenerationError::Status {
                status: 500,
                body: "boom".into(),
            })
        });
        let out = generator(mock).daily_content(Path::Resilience, &[], today()).await;
        assert!(out.is_fallback());
        assert_eq!(out.content.date, today());
        assert_eq!(out.content.tasks.iter().filter(|t| t.is_journaling).count(), 1);
        assert_eq!(
            out.content.tasks.iter().map(|t| t.category).collect::<Vec<_>>(),
            Category::ALL.to_vec()
        );
    }

    #[tokio::test]
    async fn prose_reply_falls_back_for_fitness() {
        let mut mock = MockGenerationClient::new();
        mock.expect_generate()
            .returning(|_| Ok("Let's get moving today!".to_string()));
        let out = generator(mock).daily_fitness(today()).await;
        assert!(matches!(out.source, ContentSource::Fallback { ref reason } if reason.contains("not JSON")));
        assert_eq!(out.content.tasks.len(), 5);
    }

    #[tokio::test]
    async fn insight_is_trimmed_and_errors_propagate() {
        let mut mock = MockGenerationClient::new();
        mock.expect_generate()
            .withf(|p| p.contains("---\nrough week\n---"))
            .times(1)
            .returning(|_| Ok("  It sounds like a lot.  ".to_string()));
        mock.expect_generate()
            .withf(|p| p.contains("---\nother\n---"))
            .returning(|_| Err(GenerationError::Transport("offline".into())));
        let gen = generator(mock);
        assert_eq!(gen.journal_insight("rough week").await.unwrap(), "It sounds like a lot.");
        assert!(gen.journal_insight("other").await.is_err());
    }
}
