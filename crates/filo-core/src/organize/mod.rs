//! Plan generation, execution and undo

mod execute;
mod plan;
mod undo;

pub use execute::{execute, resolve_collision, ExecuteOutcome, MoveOutcome};
pub use plan::{generate_plan, Plan};
pub use undo::{undo_batch, UndoOutcome};

use crate::classify::Classification;
use crate::error::Result;
use async_trait::async_trait;

/// The slice of the classifier the organizer needs: learning callbacks
/// only, so execution does not depend on the whole decision pipeline.
#[async_trait(?Send)]
pub trait Learner {
    /// A result was applied and counts as confirmed
    async fn confirm(&self, result: &Classification) -> Result<()>;

    /// The user replaced a result's labels
    async fn correct(
        &self,
        result: &Classification,
        category: &str,
        subcategory: &str,
    ) -> Result<()>;
}

#[async_trait(?Send)]
impl Learner for crate::classify::Classifier<'_> {
    async fn confirm(&self, result: &Classification) -> Result<()> {
        crate::classify::Classifier::confirm(self, result).await
    }

    async fn correct(
        &self,
        result: &Classification,
        category: &str,
        subcategory: &str,
    ) -> Result<()> {
        crate::classify::Classifier::correct(self, result, category, subcategory).await
    }
}
