//! Problem-solving frameworks and the built-in catalog offered when no
//! collaborator supplies suggestions.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutKind;

/// Broad grouping used when presenting the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameworkCategory {
    Technical,
    Product,
    #[serde(rename = "Mental Model")]
    MentalModel,
    Strategic,
    Scientific,
}

/// A named problem-solving method: ordered steps plus a layout kind that
/// decides section count and arrangement. Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub id: String,
    pub name: String,
    pub category: FrameworkCategory,
    pub description: String,
    /// Why this framework fits the problem at hand; opaque collaborator
    /// output, empty for catalog entries.
    #[serde(default)]
    pub relevance: String,
    pub steps: Vec<String>,
    pub layout: LayoutKind,
}

fn framework(
    id: &str,
    name: &str,
    category: FrameworkCategory,
    description: &str,
    layout: LayoutKind,
    steps: &[&str],
) -> Framework {
    Framework {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        relevance: String::new(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        layout,
    }
}

/// The built-in catalog. Order is presentation order.
pub fn builtin_frameworks() -> Vec<Framework> {
    vec![
        framework(
            "swot",
            "SWOT Analysis",
            FrameworkCategory::Strategic,
            "Map strengths, weaknesses, opportunities, and threats in one view.",
            LayoutKind::Matrix2x2,
            &["Strengths", "Weaknesses", "Opportunities", "Threats"],
        ),
        framework(
            "eisenhower",
            "Eisenhower Matrix",
            FrameworkCategory::MentalModel,
            "Prioritize work by urgency and importance.",
            LayoutKind::Matrix2x2,
            &[
                "Do First (Urgent & Important)",
                "Schedule (Less Urgent & Important)",
                "Delegate (Urgent & Less Important)",
                "Don't Do (Not Urgent & Not Important)",
            ],
        ),
        framework(
            "six-hats",
            "Six Thinking Hats",
            FrameworkCategory::MentalModel,
            "Examine a problem from six deliberate thinking modes.",
            LayoutKind::SixHats,
            &[
                "White Hat (Data)",
                "Red Hat (Emotions)",
                "Black Hat (Caution)",
                "Yellow Hat (Optimism)",
                "Green Hat (Creativity)",
                "Blue Hat (Process)",
            ],
        ),
        framework(
            "first-principles",
            "First Principles",
            FrameworkCategory::Scientific,
            "Strip a problem to its fundamentals and rebuild from there.",
            LayoutKind::Linear,
            &[
                "Identify Assumptions",
                "Break Down to Basics",
                "Construct New Solutions",
            ],
        ),
        framework(
            "jtbd",
            "Jobs to be Done",
            FrameworkCategory::Product,
            "Work backwards from the job the customer hires the product for.",
            LayoutKind::Linear,
            &[
                "Define the Core Job",
                "Identify Pain Points",
                "Identify Gains",
                "Create Value Proposition",
            ],
        ),
        framework(
            "double-diamond",
            "Double Diamond",
            FrameworkCategory::Product,
            "Diverge and converge twice: on the problem, then on the solution.",
            LayoutKind::Linear,
            &[
                "Discover (Divergent)",
                "Define (Convergent)",
                "Develop (Divergent)",
                "Deliver (Convergent)",
            ],
        ),
        framework(
            "strangler-fig",
            "Strangler Fig Pattern",
            FrameworkCategory::Technical,
            "Incrementally replace a legacy system component by component.",
            LayoutKind::Linear,
            &[
                "Identify Component",
                "Build New Service",
                "Route Traffic",
                "Decommission Legacy",
            ],
        ),
        framework(
            "cap",
            "CAP Theorem Analysis",
            FrameworkCategory::Technical,
            "Choose the consistency/availability trade-off for a partition strategy.",
            LayoutKind::Linear,
            &[
                "Assess Consistency Needs",
                "Assess Availability Needs",
                "Determine Partition Strategy",
                "Select Trade-off",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_layouts_match_section_counts() {
        for fw in builtin_frameworks() {
            match fw.layout {
                LayoutKind::Matrix2x2 => assert_eq!(fw.steps.len(), 4, "{}", fw.name),
                LayoutKind::SixHats => assert_eq!(fw.steps.len(), 6, "{}", fw.name),
                LayoutKind::Linear => assert!(!fw.steps.is_empty(), "{}", fw.name),
            }
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        let frameworks = builtin_frameworks();
        for (i, a) in frameworks.iter().enumerate() {
            for b in &frameworks[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn category_serializes_with_display_labels() {
        let json = serde_json::to_string(&FrameworkCategory::MentalModel).unwrap();
        assert_eq!(json, "\"Mental Model\"");
        assert_eq!(
            serde_json::to_string(&FrameworkCategory::Technical).unwrap(),
            "\"Technical\""
        );
    }
}
