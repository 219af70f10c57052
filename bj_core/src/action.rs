use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Every play the decision tables can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    #[serde(rename = "Double Down")]
    Double,
    Split,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Hit => "Hit",
            Action::Stand => "Stand",
            Action::Double => "Double Down",
            Action::Split => "Split",
        };
        write!(f, "{}", name)
    }
}
