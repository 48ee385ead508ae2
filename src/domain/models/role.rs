use serde::{Deserialize, Serialize};

/// Who is asking. Selects the prompt-template variant for the rewrite and
/// finalize stages; immutable for the life of a conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// General legal research framing.
    #[default]
    Citizen,

    /// Precedent and argument-extraction framing.
    Lawyer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Lawyer => "lawyer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "citizen" | "common citizen" => Ok(Role::Citizen),
            "lawyer" => Ok(Role::Lawyer),
            other => Err(format!("unknown role '{other}', expected 'citizen' or 'lawyer'")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
