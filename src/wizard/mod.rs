pub mod selection;

use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::db::VoteStore;
use crate::error::{Result, SurveyError};
use crate::models::{LocationData, NewVote, VoteRecord};
use crate::postcodes::{LookupOutcome, PostcodeTable};
use selection::RankedSelection;

pub const POSTCODE_NOT_FOUND: &str = "ไม่พบข้อมูลรหัสไปรษณีย์นี้ ลองตรวจสอบอีกครั้ง";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Entry,
    Selection,
    Confirmation,
    Dashboard,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::Entry => 1,
            Stage::Selection => 2,
            Stage::Confirmation => 3,
            Stage::Dashboard => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Entry => "ระบุพื้นที่",
            Stage::Selection => "เลือกนโยบาย",
            Stage::Confirmation => "ยืนยัน",
            Stage::Dashboard => "ผลโหวต",
        }
    }

    fn can_move_to(self, to: Stage) -> bool {
        matches!(
            (self, to),
            (Stage::Entry, Stage::Selection)
                | (Stage::Selection, Stage::Confirmation)
                | (Stage::Confirmation, Stage::Dashboard)
                | (Stage::Confirmation, Stage::Selection)
        )
    }
}

/// One respondent's progress through the survey.
#[derive(Debug, Clone)]
pub struct Wizard {
    id: Uuid,
    stage: Stage,
    postcode: String,
    candidates: Vec<LocationData>,
    location: Option<LocationData>,
    notice: Option<String>,
    selection: RankedSelection,
    comment: Option<String>,
    submitted: Option<Uuid>,
}

/// What the client needs to draw the current step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub id: Uuid,
    pub stage: Stage,
    pub step: String,
    pub title: &'static str,
    pub postcode: String,
    pub candidates: Vec<LocationData>,
    pub location: Option<LocationData>,
    pub notice: Option<String>,
    pub selected: Vec<String>,
    pub hint: &'static str,
    pub can_continue: bool,
    pub comment: Option<String>,
    pub vote_id: Option<Uuid>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::Entry,
            postcode: String::new(),
            candidates: Vec::new(),
            location: None,
            notice: None,
            selection: RankedSelection::default(),
            comment: None,
            submitted: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn require(&self, stage: Stage) -> Result<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(SurveyError::WrongStage(self.stage))
        }
    }

    fn move_to(&mut self, to: Stage) -> Result<()> {
        if !self.stage.can_move_to(to) {
            return Err(SurveyError::InvalidTransition {
                from: self.stage,
                to,
            });
        }
        info!("Session {} moved {:?} -> {:?}", self.id, self.stage, to);
        self.stage = to;
        Ok(())
    }

    /// Resolves a typed postcode. A single match is chosen right away; any
    /// previous choice is dropped.
    pub fn enter_postcode(&mut self, table: &PostcodeTable, code: &str) -> Result<LookupOutcome> {
        self.require(Stage::Entry)?;

        let outcome = table.lookup(code);
        self.postcode = code.trim().to_string();
        self.candidates = outcome.candidates();
        self.location = match &outcome {
            LookupOutcome::Resolved { location } => Some(location.clone()),
            _ => None,
        };
        self.notice = match outcome {
            LookupOutcome::NotFound => {
                warn!("Session {}: postcode {} not found", self.id, self.postcode);
                Some(POSTCODE_NOT_FOUND.to_string())
            }
            _ => None,
        };
        Ok(outcome)
    }

    pub fn choose_location(&mut self, index: usize) -> Result<&LocationData> {
        self.require(Stage::Entry)?;
        let chosen = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(SurveyError::NoSuchCandidate {
                index,
                available: self.candidates.len(),
            })?;
        let chosen = self.location.insert(chosen);
        Ok(&*chosen)
    }

    pub fn confirm_location(&mut self) -> Result<()> {
        self.require(Stage::Entry)?;
        if self.location.is_none() {
            return Err(SurveyError::LocationMissing);
        }
        self.move_to(Stage::Selection)
    }

    pub fn toggle_policy(&mut self, catalog: &Catalog, policy_id: &str) -> Result<()> {
        self.require(Stage::Selection)?;
        if !catalog.contains(policy_id) {
            return Err(SurveyError::UnknownPolicy(policy_id.to_string()));
        }
        self.selection.toggle(policy_id);
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.require(Stage::Selection)?;
        self.selection.clear();
        Ok(())
    }

    pub fn confirm_selection(&mut self) -> Result<()> {
        self.require(Stage::Selection)?;
        if !self.selection.is_full() {
            return Err(SurveyError::SelectionIncomplete(self.selection.len()));
        }
        self.move_to(Stage::Confirmation)
    }

    /// The only backward step: Confirmation to Selection, answers kept.
    pub fn back_to_selection(&mut self) -> Result<()> {
        if self.stage != Stage::Confirmation {
            return Err(SurveyError::InvalidTransition {
                from: self.stage,
                to: Stage::Selection,
            });
        }
        self.move_to(Stage::Selection)
    }

    /// Builds the ballot for the current answers.
    pub fn ballot(&self, catalog: &Catalog, comment: Option<String>) -> Result<NewVote> {
        if self.submitted.is_some() {
            return Err(SurveyError::AlreadySubmitted);
        }
        self.require(Stage::Confirmation)?;
        let location = self.location.clone().ok_or(SurveyError::LocationMissing)?;
        NewVote::new(catalog, location, self.selection.ids(), comment)
    }

    /// Stores the ballot and moves on to the dashboard. On failure the stage
    /// and answers are left as they were so the same call can be retried.
    pub async fn submit(
        &mut self,
        catalog: &Catalog,
        store: &dyn VoteStore,
        comment: Option<String>,
    ) -> Result<VoteRecord> {
        let ballot = self.ballot(catalog, comment)?;
        self.comment = ballot.comment.clone();

        let record = store.append_vote(&ballot).await?;
        self.move_to(Stage::Dashboard)?;
        self.submitted = Some(record.id);
        info!("Session {} submitted vote {}", self.id, record.id);
        Ok(record)
    }

    /// Location and ranked ids for the results page. Only valid once the
    /// vote is in.
    pub fn dashboard_inputs(&self) -> Result<(&LocationData, &[String])> {
        self.require(Stage::Dashboard)?;
        let location = self.location.as_ref().ok_or(SurveyError::LocationMissing)?;
        if !self.selection.is_full() {
            return Err(SurveyError::SelectionIncomplete(self.selection.len()));
        }
        Ok((location, self.selection.ids()))
    }

    pub fn view(&self) -> WizardView {
        let can_continue = match self.stage {
            Stage::Entry => self.location.is_some(),
            Stage::Selection => self.selection.is_full(),
            Stage::Confirmation => self.submitted.is_none(),
            Stage::Dashboard => false,
        };
        WizardView {
            id: self.id,
            stage: self.stage,
            step: format!("{}/4", self.stage.number()),
            title: self.stage.title(),
            postcode: self.postcode.clone(),
            candidates: self.candidates.clone(),
            location: self.location.clone(),
            notice: self.notice.clone(),
            selected: self.selection.ids().to_vec(),
            hint: self.selection.hint(),
            can_continue,
            comment: self.comment.clone(),
            vote_id: self.submitted,
        }
    }
}
