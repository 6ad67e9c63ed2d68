//! Admin student directory with readiness backfill.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::student::StudentProfileRow;
use crate::placement::query::{non_blank, parse_param};
use crate::readiness::scoring::refresh_readiness;
use crate::store::PlacementStore;

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    /// Case-insensitive substring of the roll number.
    pub q: Option<String>,
    /// Case-insensitive substring of the branch.
    pub branch: Option<String>,
    pub min_cgpa: Option<String>,
    pub max_backlogs: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentDirectory {
    pub total_students: usize,
    /// Distinct branches across all profiles, sorted.
    pub available_branches: Vec<String>,
    pub students: Vec<StudentProfileRow>,
}

/// Missing or zero readiness is recomputed for students whose CGPA and
/// backlogs are both known.
fn needs_readiness(student: &StudentProfileRow) -> bool {
    matches!(student.placement_readiness_score, None | Some(0.0))
        && student.cgpa.is_some()
        && student.backlogs.is_some()
}

/// Lists every profile by roll number after backfilling readiness, then
/// applies the directory filters. Unknown CGPA or backlogs never pass the
/// numeric filters.
pub async fn student_directory(
    store: &dyn PlacementStore,
    query: &DirectoryQuery,
) -> Result<StudentDirectory, AppError> {
    let min_cgpa: Option<f64> = parse_param("min_cgpa", &query.min_cgpa)?;
    let max_backlogs: Option<i32> = parse_param("max_backlogs", &query.max_backlogs)?;
    let search = non_blank(&query.q).map(str::to_lowercase);
    let branch = non_blank(&query.branch).map(str::to_lowercase);

    let stale: Vec<_> = store
        .list_students()
        .await?
        .into_iter()
        .filter(needs_readiness)
        .map(|s| s.id)
        .collect();
    for id in &stale {
        refresh_readiness(store, *id).await?;
    }
    if !stale.is_empty() {
        info!("Backfilled readiness for {} students", stale.len());
    }

    let all = store.list_students().await?;
    let available_branches: Vec<String> = all
        .iter()
        .map(|s| s.branch.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let total_students = all.len();

    let students = all
        .into_iter()
        .filter(|s| {
            search
                .as_deref()
                .map_or(true, |q| s.roll_number.to_lowercase().contains(q))
        })
        .filter(|s| {
            branch
                .as_deref()
                .map_or(true, |b| s.branch.to_lowercase().contains(b))
        })
        .filter(|s| min_cgpa.map_or(true, |min| s.cgpa.is_some_and(|c| c >= min)))
        .filter(|s| max_backlogs.map_or(true, |max| s.backlogs.is_some_and(|b| b <= max)))
        .collect();

    Ok(StudentDirectory {
        total_students,
        available_branches,
        students,
    })
}
