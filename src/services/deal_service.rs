// src/services/deal_service.rs

use crate::common::error::AppError;
use crate::models::deal::{Deal, DealPatch, DealStage, NewDeal, StageSummary};
use crate::store::DealRepository;

#[derive(Clone)]
pub struct DealService {
    repo: DealRepository,
}

impl DealService {
    pub fn new(repo: DealRepository) -> Self {
        Self { repo }
    }

    pub fn create(&self, input: NewDeal) -> Result<Deal, AppError> {
        self.repo.create(input)
    }

    pub fn get(&self, id: &str) -> Result<Deal, AppError> {
        self.repo.get(id)
    }

    pub fn list(&self) -> Vec<Deal> {
        self.repo.list()
    }

    pub fn update(&self, id: &str, patch: DealPatch) -> Result<Deal, AppError> {
        self.repo.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete(id)
    }

    /// Apply a drag-and-drop result. Dropping a card back on its own column
    /// is a no-op; otherwise the stage change is atomic: a failure (stale
    /// id) leaves the board exactly as it was, and the client re-renders
    /// from the response instead of keeping an optimistic half-state.
    pub fn move_deal(
        &self,
        id: &str,
        source: DealStage,
        destination: DealStage,
    ) -> Result<Deal, AppError> {
        if source == destination {
            return self.repo.get(id);
        }
        self.repo.set_stage(id, destination)
    }

    /// Count and value sum per stage, for every stage in board order,
    /// empty columns included, a board always renders all seven.
    pub fn board_summary(&self) -> Vec<StageSummary> {
        let deals = self.repo.list();
        DealStage::ALL
            .iter()
            .map(|&stage| {
                let in_stage: Vec<&Deal> = deals.iter().filter(|d| d.stage == stage).collect();
                StageSummary {
                    stage,
                    deal_count: in_stage.len(),
                    total_value: in_stage.iter().map(|d| d.value).sum(),
                }
            })
            .collect()
    }
}
