#![deny(missing_docs)]
//! Intent Classifier (C7), Fallback Ladder (C8), Orchestrator (C9), and
//! Knowledge Summary Service (C10): the pieces that turn the lower-level
//! collaborators into the system's single public `answer` entry point.

mod config;
mod fallback;
mod intent;
mod knowledge_service;
mod orchestrator;

pub use config::{Config, DEFAULT_REFUSAL_PHRASES};
pub use fallback::{choose_initial_tier, finalize_tier, is_refusal, Tier};
pub use intent::{classify, Intent};
pub use knowledge_service::{ChunkSampler, KnowledgeSummaryService, RebuildError};
pub use orchestrator::{Mode, Orchestrator};
