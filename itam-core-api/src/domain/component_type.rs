use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Internal part type; a computer holds at most one component per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "component_type", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentType {
    Ram,
    Ssd,
    Hdd,
    Gpu,
    Board,
}

impl ComponentType {
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Ram,
        ComponentType::Ssd,
        ComponentType::Hdd,
        ComponentType::Gpu,
        ComponentType::Board,
    ];
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::Ram => write!(f, "RAM"),
            ComponentType::Ssd => write!(f, "SSD"),
            ComponentType::Hdd => write!(f, "HDD"),
            ComponentType::Gpu => write!(f, "GPU"),
            ComponentType::Board => write!(f, "BOARD"),
        }
    }
}

impl FromStr for ComponentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RAM" => Ok(ComponentType::Ram),
            "SSD" => Ok(ComponentType::Ssd),
            "HDD" => Ok(ComponentType::Hdd),
            "GPU" => Ok(ComponentType::Gpu),
            "BOARD" => Ok(ComponentType::Board),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ram".parse::<ComponentType>(), Ok(ComponentType::Ram));
        assert_eq!("Board".parse::<ComponentType>(), Ok(ComponentType::Board));
        assert!("PSU".parse::<ComponentType>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for component_type in ComponentType::ALL {
            let json = serde_json::to_string(&component_type).unwrap();
            assert_eq!(json, format!("\"{component_type}\""));
        }
    }
}
