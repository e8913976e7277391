//! Terminal states of a run

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The event carries no pull request
    NotAPullRequest,
    /// The manifest is identical on both revisions
    NoChangedDependencies,
    /// Every resolved owner is already requested or authored the pull request
    NoReviewers { changed: usize },
    /// Reviewers were requested
    Requested {
        changed: usize,
        reviewers: Vec<String>,
    },
    /// Reviewers were computed but not requested
    DryRun {
        changed: usize,
        reviewers: Vec<String>,
    },
}

impl RunOutcome {
    /// Reviewers to report as the step output
    pub fn reviewers(&self) -> &[String] {
        match self {
            RunOutcome::Requested { reviewers, .. } | RunOutcome::DryRun { reviewers, .. } => {
                reviewers
            }
            _ => &[],
        }
    }

    /// Number of changed dependencies that were considered
    pub fn changed(&self) -> usize {
        match self {
            RunOutcome::NotAPullRequest | RunOutcome::NoChangedDependencies => 0,
            RunOutcome::NoReviewers { changed }
            | RunOutcome::Requested { changed, .. }
            | RunOutcome::DryRun { changed, .. } => *changed,
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::NotAPullRequest => write!(f, "not a pull request, nothing to do"),
            RunOutcome::NoChangedDependencies => write!(f, "no dependency changes"),
            RunOutcome::NoReviewers { changed } => {
                write!(f, "{} changed dependencies, no new reviewers", changed)
            }
            RunOutcome::Requested { changed, reviewers } => write!(
                f,
                "{} changed dependencies, requested {}",
                changed,
                reviewers.join(", ")
            ),
            RunOutcome::DryRun { changed, reviewers } => write!(
                f,
                "{} changed dependencies, would request {}",
                changed,
                reviewers.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_outcomes_report_no_reviewers() {
        assert!(RunOutcome::NotAPullRequest.reviewers().is_empty());
        assert!(RunOutcome::NoChangedDependencies.reviewers().is_empty());
        assert!(RunOutcome::NoReviewers { changed: 2 }.reviewers().is_empty());
        assert_eq!(RunOutcome::NoReviewers { changed: 2 }.changed(), 2);
    }

    #[test]
    fn test_display() {
        let outcome = RunOutcome::Requested {
            changed: 3,
            reviewers: vec!["x".to_string(), "z".to_string()],
        };
        assert_eq!(outcome.to_string(), "3 changed dependencies, requested x, z");
        assert_eq!(outcome.reviewers(), ["x", "z"]);
    }
}
