use crate::dex::detail::DetailPage;
use crate::oracle::client::GeneratedImage;
use crate::oracle::task::AiTask;

/// The open detail view of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub record_id: u32,
    pub page: DetailPage,
    /// Question being typed on the Oracle page.
    pub question: String,
    pub answer: AiTask<String>,
}

impl DetailView {
    /// A fresh view: About page, no question, no answer.
    pub fn new(record_id: u32) -> Self {
        DetailView {
            record_id,
            page: DetailPage::About,
            question: String::new(),
            answer: AiTask::Idle,
        }
    }
}

/// The team-analysis panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisPanel {
    pub open: bool,
    pub analysis: AiTask<String>,
}

/// The free-text image creator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCreator {
    pub prompt: String,
    pub image: AiTask<GeneratedImage>,
}
