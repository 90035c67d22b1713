use crate::data::loader::Pokedex;
use crate::data::record::Record;
use crate::data::team::Team;
use crate::dex::coverage::{coverage, Coverage};
use crate::dex::detail::DetailPage;
use crate::dex::filter::{filter, FilterCriteria};
use crate::oracle::prompts::{
    image_prompt, oracle_prompt, team_analysis_prompt, team_members, ANALYSIS_FAILURE_MESSAGE,
    IMAGE_FAILURE_MESSAGE, ORACLE_FAILURE_MESSAGE,
};
use crate::oracle::task::{AiTask, TicketCounter};

use super::messages::{Message, Request};
use super::state::{AnalysisPanel, DetailView, ImageCreator};

/// Result of applying one message.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; nothing else to do.
    Applied,
    /// The message had no effect (guard failed or completion superseded).
    Ignored(String),
    /// State changed and an AI call must be performed.
    Dispatch(Request),
}

/// Owns all session state: the catalog, filter selections, team, open
/// views and AI task states. Views read snapshots through the accessors;
/// every change goes through [`Controller::update`].
#[derive(Debug)]
pub struct Controller {
    pokedex: Pokedex,
    criteria: FilterCriteria,
    team: Team,
    detail: Option<DetailView>,
    analysis: AnalysisPanel,
    creator: ImageCreator,
    tickets: TicketCounter,
}

impl Controller {
    pub fn new(pokedex: Pokedex) -> Self {
        Controller {
            pokedex,
            criteria: FilterCriteria::default(),
            team: Team::new(),
            detail: None,
            analysis: AnalysisPanel::default(),
            creator: ImageCreator::default(),
            tickets: TicketCounter::default(),
        }
    }

    // === Snapshots ===

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Records matching the current filters, ascending by id.
    pub fn visible(&self) -> Vec<&Record> {
        filter(self.pokedex.records(), &self.criteria)
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn team_records(&self) -> Vec<&Record> {
        self.team.resolve(&self.pokedex)
    }

    /// Coverage of the current team, recomputed from scratch.
    pub fn coverage(&self) -> Coverage {
        coverage(&self.team_records())
    }

    pub fn is_in_team(&self, id: u32) -> bool {
        self.team.contains(id)
    }

    pub fn is_team_full(&self) -> bool {
        self.team.is_full()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn detail_record(&self) -> Option<&Record> {
        self.detail
            .as_ref()
            .and_then(|view| self.pokedex.get(view.record_id))
    }

    /// Pages offered by the open detail view.
    pub fn detail_pages(&self) -> Vec<DetailPage> {
        self.detail_record()
            .map(DetailPage::available_for)
            .unwrap_or_default()
    }

    pub fn analysis(&self) -> &AnalysisPanel {
        &self.analysis
    }

    pub fn creator(&self) -> &ImageCreator {
        &self.creator
    }

    // === Updates ===

    pub fn update(&mut self, message: Message) -> Outcome {
        match message {
            Message::SetSearchText(text) => {
                self.criteria.text = text;
                Outcome::Applied
            }
            Message::SelectRegion(region) => {
                self.criteria.region = region;
                Outcome::Applied
            }
            Message::SelectType(tag) => {
                self.criteria.type_tag = tag;
                Outcome::Applied
            }
            Message::SelectMinBst(min) => {
                self.criteria.min_bst = min;
                Outcome::Applied
            }
            Message::SelectEggGroup(group) => {
                self.criteria.egg_group = group;
                Outcome::Applied
            }
            Message::ResetFilters => {
                self.criteria.reset();
                Outcome::Applied
            }

            Message::OpenDetail(id) => self.open_detail(id),
            Message::OpenDetailByName(name) => match self.pokedex.find_by_name(&name) {
                Some(record) => {
                    let id = record.id;
                    self.open_detail(id)
                }
                None => ignored(format!("no record named {:?}", name)),
            },
            Message::CloseDetail => {
                self.detail = None;
                Outcome::Applied
            }
            Message::ShowPage(page) => self.show_page(page),
            Message::SetQuestion(question) => match self.detail.as_mut() {
                Some(view) if !view.answer.is_loading() => {
                    view.question = question;
                    Outcome::Applied
                }
                Some(_) => ignored("question locked while the oracle is answering"),
                None => ignored("no detail view open"),
            },
            Message::AskOracle => self.ask_oracle(),

            Message::AddToTeam(id) => self.add_to_team(id),
            Message::RemoveFromTeam(id) => {
                if self.team.remove(id) {
                    Outcome::Applied
                } else {
                    ignored(format!("#{} is not on the team", id))
                }
            }
            Message::AnalyzeTeam => self.analyze_team(),
            Message::CloseAnalysis => {
                // Drop any pending analysis so a late completion is discarded.
                self.analysis = AnalysisPanel::default();
                Outcome::Applied
            }

            Message::SetImagePrompt(prompt) => {
                if self.creator.image.is_loading() {
                    return ignored("prompt locked while generating");
                }
                self.creator.prompt = prompt;
                Outcome::Applied
            }
            Message::GenerateImage => self.generate_image(),

            Message::ImageGenerated { ticket, result } => {
                if self
                    .creator
                    .image
                    .complete(ticket, result, IMAGE_FAILURE_MESSAGE)
                {
                    Outcome::Applied
                } else {
                    superseded(ticket.0)
                }
            }
            Message::AnalysisReady { ticket, result } => {
                if self
                    .analysis
                    .analysis
                    .complete(ticket, result, ANALYSIS_FAILURE_MESSAGE)
                {
                    Outcome::Applied
                } else {
                    superseded(ticket.0)
                }
            }
            Message::OracleAnswered { ticket, result } => {
                let applied = self
                    .detail
                    .as_mut()
                    .is_some_and(|view| view.answer.complete(ticket, result, ORACLE_FAILURE_MESSAGE));
                if applied {
                    Outcome::Applied
                } else {
                    superseded(ticket.0)
                }
            }
        }
    }

    fn open_detail(&mut self, id: u32) -> Outcome {
        if self.pokedex.get(id).is_none() {
            return ignored(format!("no record #{}", id));
        }
        self.detail = Some(DetailView::new(id));
        Outcome::Applied
    }

    fn show_page(&mut self, page: DetailPage) -> Outcome {
        if !self.detail_pages().contains(&page) {
            return ignored(format!("page {:?} not available", page));
        }
        if let Some(view) = self.detail.as_mut() {
            view.page = page;
        }
        Outcome::Applied
    }

    fn ask_oracle(&mut self) -> Outcome {
        let Some(name) = self.detail_record().map(|r| r.name.clone()) else {
            return ignored("no detail view open");
        };
        let Some(view) = self.detail.as_mut() else {
            return ignored("no detail view open");
        };
        if view.question.trim().is_empty() {
            return ignored("empty question");
        }
        if view.answer.is_loading() {
            return ignored("oracle already answering");
        }

        let ticket = self.tickets.issue();
        view.answer = AiTask::Loading(ticket);
        Outcome::Dispatch(Request::AskOracle {
            ticket,
            prompt: oracle_prompt(&name, &view.question),
        })
    }

    fn add_to_team(&mut self, id: u32) -> Outcome {
        let Some(record) = self.pokedex.get(id) else {
            return ignored(format!("no record #{}", id));
        };
        match self.team.add(record) {
            Ok(()) => Outcome::Applied,
            Err(e) => ignored(e.to_string()),
        }
    }

    fn analyze_team(&mut self) -> Outcome {
        if !self.team.can_analyze() {
            return ignored("need at least two team members");
        }
        let members = team_members(&self.team.resolve(&self.pokedex));

        let ticket = self.tickets.issue();
        self.analysis = AnalysisPanel {
            open: true,
            analysis: AiTask::Loading(ticket),
        };
        Outcome::Dispatch(Request::AnalyzeTeam {
            ticket,
            prompt: team_analysis_prompt(&members),
        })
    }

    fn generate_image(&mut self) -> Outcome {
        if self.creator.prompt.trim().is_empty() {
            return ignored("empty prompt");
        }
        if self.creator.image.is_loading() {
            return ignored("already generating");
        }

        let ticket = self.tickets.issue();
        self.creator.image = AiTask::Loading(ticket);
        Outcome::Dispatch(Request::GenerateImage {
            ticket,
            prompt: image_prompt(&self.creator.prompt),
        })
    }
}

fn ignored(reason: impl Into<String>) -> Outcome {
    let reason = reason.into();
    tracing::debug!(%reason, "message ignored");
    Outcome::Ignored(reason)
}

fn superseded(ticket: u64) -> Outcome {
    ignored(format!("completion for ticket {} superseded", ticket))
}
