use std::borrow::Cow;

use serde::Serialize;
use tracing::info;

use super::domain::{Employee, EmployeeStatus, Review, ReviewStatus};
use super::store::{StoreError, WorkforceStore};
use super::validation::{ReviewForm, Validate};

/// A review row for one active employee in a cycle. Employees without a
/// stored review get an unsaved pending placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry<'a> {
    pub employee_id: u64,
    pub employee_name: &'a str,
    pub review: Cow<'a, Review>,
    pub placeholder: bool,
}

impl ReviewEntry<'_> {
    pub fn status(&self) -> ReviewStatus {
        self.review.status
    }
}

pub fn cycle_reviews<'a>(
    employees: &'a [Employee],
    reviews: &'a [Review],
    cycle_id: u64,
) -> Vec<ReviewEntry<'a>> {
    employees
        .iter()
        .filter(|employee| employee.status == EmployeeStatus::Active)
        .map(|employee| {
            let stored = reviews
                .iter()
                .find(|review| review.review_cycle_id == cycle_id && review.employee_id == employee.id);
            let (review, placeholder) = match stored {
                Some(review) => (Cow::Borrowed(review), false),
                None => (
                    Cow::Owned(Review {
                        id: 0,
                        review_cycle_id: cycle_id,
                        employee_id: employee.id,
                        status: ReviewStatus::Pending,
                        manager_feedback: String::new(),
                        employee_self_assessment: String::new(),
                        final_rating: 0,
                        completed_at: None,
                    }),
                    true,
                ),
            };
            ReviewEntry {
                employee_id: employee.id,
                employee_name: &employee.name,
                review,
                placeholder,
            }
        })
        .collect()
}

/// Rounded percentage of entries that are completed; zero for an empty cycle.
pub fn cycle_progress(entries: &[ReviewEntry<'_>]) -> u8 {
    if entries.is_empty() {
        return 0;
    }
    let completed = entries
        .iter()
        .filter(|entry| entry.status() == ReviewStatus::Completed)
        .count();
    ((completed as f64 / entries.len() as f64) * 100.0).round() as u8
}

impl WorkforceStore {
    /// The active cycle, or the first one when none is flagged active.
    pub fn default_review_cycle(&self) -> Option<u64> {
        self.review_cycles
            .iter()
            .find(|cycle| cycle.is_active)
            .or_else(|| self.review_cycles.first())
            .map(|cycle| cycle.id)
    }

    pub fn cycle_reviews(&self, cycle_id: u64) -> Result<Vec<ReviewEntry<'_>>, StoreError> {
        if !self.review_cycles.iter().any(|cycle| cycle.id == cycle_id) {
            return Err(StoreError::not_found("review cycle", cycle_id));
        }
        Ok(cycle_reviews(&self.employees, &self.reviews, cycle_id))
    }

    pub fn cycle_progress(&self, cycle_id: u64) -> Result<u8, StoreError> {
        Ok(cycle_progress(&self.cycle_reviews(cycle_id)?))
    }

    /// Upserts the review for `(cycle, employee)`. Completing it copies the
    /// final rating and completion date onto the employee.
    pub fn save_review(&mut self, form: ReviewForm) -> Result<&Review, StoreError> {
        form.validate()?;
        if !self
            .review_cycles
            .iter()
            .any(|cycle| cycle.id == form.review_cycle_id)
        {
            return Err(StoreError::not_found("review cycle", form.review_cycle_id));
        }
        let employee = self
            .employees
            .iter_mut()
            .find(|employee| employee.id == form.employee_id)
            .ok_or_else(|| StoreError::not_found("employee", form.employee_id))?;

        if let (ReviewStatus::Completed, Some(completed_at)) = (form.status, form.completed_at) {
            employee.performance_rating = form.final_rating;
            employee.last_review_date = completed_at;
            info!(
                employee_id = employee.id,
                rating = form.final_rating,
                "review completed"
            );
        }

        let index = match self.reviews.iter().position(|review| {
            review.review_cycle_id == form.review_cycle_id && review.employee_id == form.employee_id
        }) {
            Some(index) => index,
            None => {
                self.reviews.push(Review {
                    id: self.ids.reviews.next_id(),
                    review_cycle_id: form.review_cycle_id,
                    employee_id: form.employee_id,
                    status: ReviewStatus::Pending,
                    manager_feedback: String::new(),
                    employee_self_assessment: String::new(),
                    final_rating: 0,
                    completed_at: None,
                });
                self.reviews.len() - 1
            }
        };

        let review = &mut self.reviews[index];
        review.status = form.status;
        review.manager_feedback = form.manager_feedback;
        review.employee_self_assessment = form.employee_self_assessment;
        review.final_rating = form.final_rating;
        review.completed_at = form.completed_at;
        Ok(review)
    }
}
