use serde::{Deserialize, Serialize};

/// A sequence of human-readable codes backed by one atomic counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "code_family", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeFamily {
    Accountability,
    Tracking,
    ComponentUid,
}

impl CodeFamily {
    pub const ALL: [CodeFamily; 3] = [
        CodeFamily::Accountability,
        CodeFamily::Tracking,
        CodeFamily::ComponentUid,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            CodeFamily::Accountability => "ACID",
            CodeFamily::Tracking => "TRID",
            CodeFamily::ComponentUid => "UID",
        }
    }

    /// Minimum number of digits; longer values are printed in full
    pub fn width(&self) -> usize {
        match self {
            CodeFamily::Accountability | CodeFamily::Tracking => 4,
            CodeFamily::ComponentUid => 3,
        }
    }

    pub fn format(&self, value: i64) -> String {
        format!("{}-{:0width$}", self.prefix(), value, width = self.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_family_width() {
        assert_eq!(CodeFamily::Accountability.format(1), "ACID-0001");
        assert_eq!(CodeFamily::Tracking.format(42), "TRID-0042");
        assert_eq!(CodeFamily::ComponentUid.format(7), "UID-007");
        assert_eq!(CodeFamily::Accountability.format(12345), "ACID-12345");
    }
}
