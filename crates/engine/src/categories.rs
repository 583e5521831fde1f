//! The closed set of transaction category tags.
//!
//! Categories are validated into this enumeration before they reach the
//! store; free-text category values never appear in a query.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Accommodation,
    Entertainment,
    Fitness,
    Food,
    Games,
    Gifts,
    Grooming,
    Hobbies,
    Insurance,
    Medical,
    #[default]
    Others,
    Pet,
    Shopping,
    Transfers,
    Transport,
    Travel,
    Utilities,
    Work,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accommodation => "ACCOMMODATION",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Fitness => "FITNESS",
            Self::Food => "FOOD",
            Self::Games => "GAMES",
            Self::Gifts => "GIFTS",
            Self::Grooming => "GROOMING",
            Self::Hobbies => "HOBBIES",
            Self::Insurance => "INSURANCE",
            Self::Medical => "MEDICAL",
            Self::Others => "OTHERS",
            Self::Pet => "PET",
            Self::Shopping => "SHOPPING",
            Self::Transfers => "TRANSFERS",
            Self::Transport => "TRANSPORT",
            Self::Travel => "TRAVEL",
            Self::Utilities => "UTILITIES",
            Self::Work => "WORK",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ACCOMMODATION" => Ok(Self::Accommodation),
            "ENTERTAINMENT" => Ok(Self::Entertainment),
            "FITNESS" => Ok(Self::Fitness),
            "FOOD" => Ok(Self::Food),
            "GAMES" => Ok(Self::Games),
            "GIFTS" => Ok(Self::Gifts),
            "GROOMING" => Ok(Self::Grooming),
            "HOBBIES" => Ok(Self::Hobbies),
            "INSURANCE" => Ok(Self::Insurance),
            "MEDICAL" => Ok(Self::Medical),
            "OTHERS" => Ok(Self::Others),
            "PET" => Ok(Self::Pet),
            "SHOPPING" => Ok(Self::Shopping),
            "TRANSFERS" => Ok(Self::Transfers),
            "TRANSPORT" => Ok(Self::Transport),
            "TRAVEL" => Ok(Self::Travel),
            "UTILITIES" => Ok(Self::Utilities),
            "WORK" => Ok(Self::Work),
            other => Err(EngineError::InvalidCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for category in [
            Category::Accommodation,
            Category::Food,
            Category::Others,
            Category::Work,
        ] {
            assert_eq!(Category::try_from(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            Category::try_from("GROCERIES"),
            Err(EngineError::InvalidCategory("GROCERIES".to_string()))
        );
    }
}
