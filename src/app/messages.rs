use crate::dex::detail::DetailPage;
use crate::oracle::client::{GenerativeBackend, GeneratedImage, OracleError};
use crate::oracle::prompts::TextPrompt;
use crate::oracle::task::Ticket;

/// Everything that can change controller state.
#[derive(Debug)]
pub enum Message {
    // === Filters ===
    SetSearchText(String),
    SelectRegion(Option<u8>),
    SelectType(Option<String>),
    SelectMinBst(Option<u32>),
    SelectEggGroup(Option<String>),
    ResetFilters,

    // === Detail view ===
    /// Open a record's detail view by id.
    OpenDetail(u32),
    /// Open a record by (case-insensitive) name, e.g. from an evolution link.
    OpenDetailByName(String),
    CloseDetail,
    ShowPage(DetailPage),
    SetQuestion(String),
    AskOracle,

    // === Team ===
    AddToTeam(u32),
    RemoveFromTeam(u32),
    AnalyzeTeam,
    CloseAnalysis,

    // === Image creator ===
    SetImagePrompt(String),
    GenerateImage,

    // === AI completions ===
    ImageGenerated {
        ticket: Ticket,
        result: Result<GeneratedImage, OracleError>,
    },
    AnalysisReady {
        ticket: Ticket,
        result: Result<String, OracleError>,
    },
    OracleAnswered {
        ticket: Ticket,
        result: Result<String, OracleError>,
    },
}

/// An AI call the controller wants performed. Running it yields the
/// completion message to feed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    GenerateImage { ticket: Ticket, prompt: String },
    AnalyzeTeam { ticket: Ticket, prompt: TextPrompt },
    AskOracle { ticket: Ticket, prompt: TextPrompt },
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::GenerateImage { ticket, .. }
            | Request::AnalyzeTeam { ticket, .. }
            | Request::AskOracle { ticket, .. } => *ticket,
        }
    }

    /// The completion to apply when the call never produced one.
    pub fn failed(&self, error: OracleError) -> Message {
        let ticket = self.ticket();
        match self {
            Request::GenerateImage { .. } => Message::ImageGenerated {
                ticket,
                result: Err(error),
            },
            Request::AnalyzeTeam { .. } => Message::AnalysisReady {
                ticket,
                result: Err(error),
            },
            Request::AskOracle { .. } => Message::OracleAnswered {
                ticket,
                result: Err(error),
            },
        }
    }

    /// Perform the call once. Failures are carried in the message.
    pub async fn run(self, backend: &dyn GenerativeBackend) -> Message {
        match self {
            Request::GenerateImage { ticket, prompt } => Message::ImageGenerated {
                ticket,
                result: backend.generate_image(&prompt).await,
            },
            Request::AnalyzeTeam { ticket, prompt } => Message::AnalysisReady {
                ticket,
                result: backend.generate_text(&prompt).await,
            },
            Request::AskOracle { ticket, prompt } => Message::OracleAnswered {
                ticket,
                result: backend.generate_text(&prompt).await,
            },
        }
    }
}
