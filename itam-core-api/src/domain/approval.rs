use serde::{Deserialize, Serialize};

/// Sign-off stages of an accountability record, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountabilityStage {
    Prepared,
    Approved,
    Confirmed,
}

impl AccountabilityStage {
    /// The stage that must already be stamped before this one
    pub fn previous(&self) -> Option<AccountabilityStage> {
        match self {
            AccountabilityStage::Prepared => None,
            AccountabilityStage::Approved => Some(AccountabilityStage::Prepared),
            AccountabilityStage::Confirmed => Some(AccountabilityStage::Approved),
        }
    }
}

/// Sign-off stages of a return, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnStage {
    Checked,
    Received,
    Confirmed,
}

impl ReturnStage {
    pub fn previous(&self) -> Option<ReturnStage> {
        match self {
            ReturnStage::Checked => None,
            ReturnStage::Received => Some(ReturnStage::Checked),
            ReturnStage::Confirmed => Some(ReturnStage::Received),
        }
    }
}

/// A stage in one of the two approval workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "workflow", content = "stage", rename_all = "snake_case")]
pub enum ApprovalStage {
    Accountability(AccountabilityStage),
    Return(ReturnStage),
}

impl std::fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalStage::Accountability(stage) => write!(f, "accountability:{stage:?}"),
            ApprovalStage::Return(stage) => write!(f, "return:{stage:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_chain_back_to_first() {
        assert_eq!(AccountabilityStage::Prepared.previous(), None);
        assert_eq!(
            AccountabilityStage::Confirmed.previous(),
            Some(AccountabilityStage::Approved)
        );
        assert_eq!(ReturnStage::Checked.previous(), None);
        assert_eq!(ReturnStage::Received.previous(), Some(ReturnStage::Checked));
    }

    #[test]
    fn test_approval_stage_wire_format() {
        let json = serde_json::to_value(ApprovalStage::Return(ReturnStage::Received)).unwrap();
        assert_eq!(json["workflow"], "return");
        assert_eq!(json["stage"], "RECEIVED");
    }
}
