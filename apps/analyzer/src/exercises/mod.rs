//! Catalogue of exercises with their rule registries and canonical solutions.

pub mod two_fer;

use crate::error::{AnalyzerError, Result};
use crate::registry::Registry;
use crate::tree::TreeQuery;

/// One exercise: its rule registry plus the solutions that count as optimal.
pub struct Exercise {
    slug: &'static str,
    registry: Registry<dyn TreeQuery>,
    canonical: &'static [&'static str],
}

impl Exercise {
    pub fn new(
        slug: &'static str,
        registry: Registry<dyn TreeQuery>,
        canonical: &'static [&'static str],
    ) -> Self {
        Self {
            slug,
            registry,
            canonical,
        }
    }

    pub fn slug(&self) -> &'static str {
        self.slug
    }

    pub fn registry(&self) -> &Registry<dyn TreeQuery> {
        &self.registry
    }

    pub fn canonical(&self) -> &'static [&'static str] {
        self.canonical
    }
}

/// All known exercises. Built once, then shared read-only.
pub struct Catalogue {
    exercises: Vec<Exercise>,
}

impl Catalogue {
    pub fn builtin() -> Self {
        Self {
            exercises: vec![Exercise::new(
                two_fer::SLUG,
                two_fer::register(),
                two_fer::CANONICAL,
            )],
        }
    }

    pub fn get(&self, slug: &str) -> Result<&Exercise> {
        self.exercises
            .iter()
            .find(|e| e.slug == slug)
            .ok_or_else(|| AnalyzerError::UnknownExercise(slug.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }
}
