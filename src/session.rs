use tracing::info;

use crate::assistant::Assistant;
use crate::dataset::JobTable;
use crate::filter::{JobFilter, KnowledgeBase};
use crate::intent::detect_filter;
use crate::job::{ChatTurn, JobRecord};

/// State of one dashboard session: the loaded jobs and the chat so far.
///
/// Created when the dashboard starts and dropped when it exits. The table is
/// only ever replaced wholesale, and the transcript only grows.
#[derive(Debug, Default)]
pub struct Session {
    kb: KnowledgeBase,
    transcript: Vec<ChatTurn>,
}

impl Session {
    pub fn new(table: JobTable) -> Self {
        Self {
            kb: KnowledgeBase::new(table.into_rows()),
            transcript: Vec::new(),
        }
    }

    pub fn jobs(&self) -> &[JobRecord] {
        self.kb.jobs()
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Oldest first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Swaps in a freshly scraped table. The transcript is kept.
    pub fn replace_table(&mut self, table: JobTable) {
        self.kb = KnowledgeBase::new(table.into_rows());
    }

    /// Filter the assistant would use for `message`.
    pub fn filter_for(&self, message: &str) -> JobFilter {
        detect_filter(message, &self.kb)
    }

    /// Answers `message` over the jobs its keywords select and appends the
    /// exchange. Blank messages are ignored.
    pub fn submit(&mut self, message: &str, assistant: &Assistant) -> Option<&ChatTurn> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        let filter = self.filter_for(message);
        let subset = self.kb.filter(&filter);
        info!(
            category = filter.category.as_deref().unwrap_or("-"),
            location = filter.location.as_deref().unwrap_or("-"),
            matched = subset.len(),
            "chat message"
        );
        let bot = assistant.answer(message, &subset);

        self.transcript.push(ChatTurn {
            user: message.to_string(),
            bot,
        });
        self.transcript.last()
    }
}
