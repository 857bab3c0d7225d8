use crate::domain::citation::{CitationRequest, MatchReliability};

/// Local availability predicate.
///
/// Decides whether the host already believes the item is obtainable locally,
/// in which case the direct-borrowing service stays out of the way entirely.
/// The default looks at holdings; deployments can swap in their own logic via
/// configuration at construction time.
#[allow(dead_code)]
pub trait LocalAvailability: Send + Sync {
    fn locally_available(&self, request: &CitationRequest) -> bool;
}

/// Default predicate: any holding with a configured available status and a
/// non-ambiguous match.
#[derive(Debug, Clone)]
pub struct HoldingsAvailability {
    available_statuses: Vec<String>,
}

impl HoldingsAvailability {
    pub fn new(available_statuses: Vec<String>) -> Self {
        Self { available_statuses }
    }
}

impl LocalAvailability for HoldingsAvailability {
    fn locally_available(&self, request: &CitationRequest) -> bool {
        request.holdings.iter().any(|holding| {
            self.available_statuses.contains(&holding.status)
                && holding.match_reliability != MatchReliability::Unsure
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::citation::{Citation, Holding};
    use crate::domain::value_objects::RequestId;

    fn request_with(holdings: Vec<Holding>) -> CitationRequest {
        CitationRequest {
            id: RequestId::new(),
            referrer_id: None,
            citation: Citation::default(),
            holdings,
        }
    }

    fn predicate() -> HoldingsAvailability {
        HoldingsAvailability::new(vec!["Available".to_string()])
    }

    #[test]
    fn test_available_holding_counts() {
        let request = request_with(vec![Holding {
            status: "Available".to_string(),
            match_reliability: MatchReliability::Exact,
        }]);
        assert!(predicate().locally_available(&request));
    }

    #[test]
    fn test_unsure_match_does_not_count() {
        let request = request_with(vec![Holding {
            status: "Available".to_string(),
            match_reliability: MatchReliability::Unsure,
        }]);
        assert!(!predicate().locally_available(&request));
    }

    #[test]
    fn test_unavailable_status_does_not_count() {
        let request = request_with(vec![Holding {
            status: "Checked Out".to_string(),
            match_reliability: MatchReliability::Exact,
        }]);
        assert!(!predicate().locally_available(&request));
    }

    #[test]
    fn test_no_holdings() {
        assert!(!predicate().locally_available(&request_with(vec![])));
    }
}
