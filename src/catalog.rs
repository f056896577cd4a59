//! The experiment library.
//!
//! [`EXPERIMENTS`] is the static catalog; [`filter`] narrows it by search
//! text, category and difficulty. `"All"` disables a selector.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Selector value that matches every record.
pub const ALL: &str = "All";

pub const CATEGORIES: [&str; 5] = [ALL, "Electronics", "Chemistry", "Biology", "Physics"];

pub const DIFFICULTIES: [&str; 4] = [ALL, "Beginner", "Intermediate", "Advanced"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experiment {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub duration: &'static str,
    pub difficulty: Difficulty,
    pub icon: &'static str,
}

impl Experiment {
    fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// The static experiment catalog, in display order.
pub static EXPERIMENTS: Lazy<Vec<Experiment>> = Lazy::new(|| {
    use Difficulty::*;
    vec![
        Experiment {
            id: "1",
            title: "Ohm's Law Verification",
            description: "Verify the relationship between voltage, current, and resistance using a resistor circuit.",
            category: "Electronics",
            duration: "45 min",
            difficulty: Beginner,
            icon: "⚡",
        },
        Experiment {
            id: "2",
            title: "Oscilloscope Waveform Analysis",
            description: "Learn to measure and analyze AC waveforms including amplitude, frequency, and phase.",
            category: "Electronics",
            duration: "60 min",
            difficulty: Intermediate,
            icon: "📊",
        },
        Experiment {
            id: "3",
            title: "RC Time Constant",
            description: "Study the charging and discharging behavior of capacitors in RC circuits.",
            category: "Electronics",
            duration: "50 min",
            difficulty: Intermediate,
            icon: "🔋",
        },
        Experiment {
            id: "4",
            title: "Transistor Characteristics",
            description: "Plot and analyze input/output characteristics of BJT transistors.",
            category: "Electronics",
            duration: "75 min",
            difficulty: Advanced,
            icon: "🔌",
        },
        Experiment {
            id: "5",
            title: "pH Measurement & Buffers",
            description: "Measure pH of solutions and prepare buffer systems for biological applications.",
            category: "Chemistry",
            duration: "40 min",
            difficulty: Beginner,
            icon: "🧪",
        },
        Experiment {
            id: "6",
            title: "Microscopy Fundamentals",
            description: "Learn proper microscope operation, focusing techniques, and sample preparation.",
            category: "Biology",
            duration: "55 min",
            difficulty: Beginner,
            icon: "🔬",
        },
        Experiment {
            id: "7",
            title: "Spectrophotometry Analysis",
            description: "Use spectrophotometer to determine concentration of colored solutions.",
            category: "Chemistry",
            duration: "60 min",
            difficulty: Intermediate,
            icon: "🌈",
        },
        Experiment {
            id: "8",
            title: "Op-Amp Configurations",
            description: "Build and test inverting, non-inverting, and differential amplifier circuits.",
            category: "Electronics",
            duration: "90 min",
            difficulty: Advanced,
            icon: "📈",
        },
    ]
});

/// Return the experiments matching every selector, in catalog order.
///
/// `search` is matched case-insensitively against title and description;
/// `category` and `difficulty` must match exactly unless they are `"All"`.
///
/// # Examples
///
/// ```
/// use lab_buddy::catalog::{EXPERIMENTS, filter};
///
/// let hits = filter(&EXPERIMENTS, "", "Chemistry", "Beginner");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].title, "pH Measurement & Buffers");
/// ```
pub fn filter<'a>(
    catalog: &'a [Experiment],
    search: &str,
    category: &str,
    difficulty: &str,
) -> Vec<&'a Experiment> {
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(|e| e.mentions(&needle))
        .filter(|e| category == ALL || e.category == category)
        .filter(|e| difficulty == ALL || e.difficulty.as_str() == difficulty)
        .collect()
}

pub fn find<'a>(catalog: &'a [Experiment], id: &str) -> Option<&'a Experiment> {
    catalog.iter().find(|e| e.id == id)
}

/// Query parameters of a catalog lookup; missing selectors mean `"All"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExperimentQuery {
    pub search: String,
    pub category: String,
    pub difficulty: String,
}

impl Default for ExperimentQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.into(),
            difficulty: ALL.into(),
        }
    }
}

impl ExperimentQuery {
    pub fn apply<'a>(&self, catalog: &'a [Experiment]) -> Vec<&'a Experiment> {
        filter(catalog, &self.search, &self.category, &self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = EXPERIMENTS.iter().map(|e| e.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), EXPERIMENTS.len());
    }

    #[test]
    fn every_category_is_selectable() {
        for e in EXPERIMENTS.iter() {
            assert!(CATEGORIES.contains(&e.category), "{}", e.category);
            assert!(DIFFICULTIES.contains(&e.difficulty.as_str()));
        }
    }

    #[test]
    fn default_query_returns_everything() {
        let q = ExperimentQuery::default();
        assert_eq!(q.apply(&EXPERIMENTS).len(), 8);
    }

    #[test]
    fn unknown_category_yields_nothing() {
        assert!(filter(&EXPERIMENTS, "", "Astronomy", ALL).is_empty());
        assert!(filter(&EXPERIMENTS, "", "Physics", ALL).is_empty());
    }

    #[test]
    fn selectors_are_case_sensitive_but_search_is_not() {
        assert!(filter(&EXPERIMENTS, "", "electronics", ALL).is_empty());
        assert_eq!(filter(&EXPERIMENTS, "RC CIRCUITS", ALL, ALL).len(), 1);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find(&EXPERIMENTS, "7").unwrap().title, "Spectrophotometry Analysis");
        assert!(find(&EXPERIMENTS, "99").is_none());
    }
}
