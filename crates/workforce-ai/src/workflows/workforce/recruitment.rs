use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{Candidate, CandidateStage, JobOpening};
use super::store::{StoreError, WorkforceStore};
use super::validation::{CandidateForm, JobOpeningForm, Validate};

/// Placeholder until a real resume upload exists.
pub const RESUME_PLACEHOLDER: &str = "#";

/// One kanban column of a job's hiring pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineColumn<'a> {
    pub stage: CandidateStage,
    pub candidates: Vec<&'a Candidate>,
}

/// Candidates for `job_id` grouped into one column per stage, in funnel order.
pub fn pipeline_board(candidates: &[Candidate], job_id: u64) -> Vec<PipelineColumn<'_>> {
    CandidateStage::ordered()
        .into_iter()
        .map(|stage| PipelineColumn {
            stage,
            candidates: candidates
                .iter()
                .filter(|candidate| candidate.job_opening_id == job_id && candidate.stage == stage)
                .collect(),
        })
        .collect()
}

impl WorkforceStore {
    pub fn create_job_opening(
        &mut self,
        form: JobOpeningForm,
        now: DateTime<Utc>,
    ) -> Result<&JobOpening, StoreError> {
        form.validate()?;
        let job = JobOpening {
            id: self.ids.jobs.next_id(),
            title: form.title.trim().to_string(),
            department: form.department,
            location: form.location,
            status: form.status,
            description: form.description,
            posted_at: now,
        };
        info!(job_id = job.id, department = %job.department, "job opening posted");
        self.job_openings.insert(0, job);
        Ok(&self.job_openings[0])
    }

    pub fn update_job_opening(
        &mut self,
        id: u64,
        form: JobOpeningForm,
    ) -> Result<&JobOpening, StoreError> {
        form.validate()?;
        let job = self
            .job_openings
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| StoreError::not_found("job opening", id))?;
        job.title = form.title.trim().to_string();
        job.department = form.department;
        job.location = form.location;
        job.status = form.status;
        job.description = form.description;
        Ok(job)
    }

    /// Removes the opening together with every candidate attached to it.
    /// Returns the opening and the number of candidates dropped.
    pub fn delete_job_opening(&mut self, id: u64) -> Result<(JobOpening, usize), StoreError> {
        let index = self
            .job_openings
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| StoreError::not_found("job opening", id))?;
        let job = self.job_openings.remove(index);

        let before = self.candidates.len();
        self.candidates
            .retain(|candidate| candidate.job_opening_id != id);
        let dropped = before - self.candidates.len();

        info!(job_id = id, candidates_removed = dropped, "job opening deleted");
        Ok((job, dropped))
    }

    pub fn add_candidate(
        &mut self,
        form: CandidateForm,
        today: NaiveDate,
    ) -> Result<&Candidate, StoreError> {
        form.validate()?;
        if !self.job_openings.iter().any(|job| job.id == form.job_opening_id) {
            return Err(StoreError::not_found("job opening", form.job_opening_id));
        }

        let resume_url = if form.resume_url.trim().is_empty() {
            RESUME_PLACEHOLDER.to_string()
        } else {
            form.resume_url
        };
        let candidate = Candidate {
            id: self.ids.candidates.next_id(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone,
            job_opening_id: form.job_opening_id,
            stage: form.stage,
            resume_url,
            applied_date: today,
        };
        self.candidates.insert(0, candidate);
        Ok(&self.candidates[0])
    }

    /// Edits contact details; a stage change goes through the same guard as
    /// [`WorkforceStore::move_candidate`].
    pub fn update_candidate(
        &mut self,
        id: u64,
        form: CandidateForm,
    ) -> Result<&Candidate, StoreError> {
        form.validate()?;
        let candidate = self.candidate_mut(id)?;
        ensure_stage_move(candidate, form.stage)?;
        candidate.name = form.name.trim().to_string();
        candidate.email = form.email.trim().to_string();
        candidate.phone = form.phone;
        candidate.stage = form.stage;
        if !form.resume_url.trim().is_empty() {
            candidate.resume_url = form.resume_url;
        }
        Ok(candidate)
    }

    pub fn delete_candidate(&mut self, id: u64) -> Result<Candidate, StoreError> {
        let index = self
            .candidates
            .iter()
            .position(|candidate| candidate.id == id)
            .ok_or_else(|| StoreError::not_found("candidate", id))?;
        Ok(self.candidates.remove(index))
    }

    pub fn move_candidate(
        &mut self,
        id: u64,
        stage: CandidateStage,
    ) -> Result<&Candidate, StoreError> {
        let candidate = self.candidate_mut(id)?;
        ensure_stage_move(candidate, stage)?;
        if candidate.stage != stage {
            info!(
                candidate_id = id,
                from = candidate.stage.label(),
                to = stage.label(),
                "candidate moved"
            );
            candidate.stage = stage;
        }
        Ok(candidate)
    }

    pub fn pipeline_board(&self, job_id: u64) -> Result<Vec<PipelineColumn<'_>>, StoreError> {
        if !self.job_openings.iter().any(|job| job.id == job_id) {
            return Err(StoreError::not_found("job opening", job_id));
        }
        Ok(pipeline_board(&self.candidates, job_id))
    }

    fn candidate_mut(&mut self, id: u64) -> Result<&mut Candidate, StoreError> {
        self.candidates
            .iter_mut()
            .find(|candidate| candidate.id == id)
            .ok_or_else(|| StoreError::not_found("candidate", id))
    }
}

fn ensure_stage_move(candidate: &Candidate, to: CandidateStage) -> Result<(), StoreError> {
    if candidate.stage.can_advance_to(to) {
        Ok(())
    } else {
        Err(StoreError::StageRegression {
            id: candidate.id,
            from: candidate.stage,
            to,
        })
    }
}
