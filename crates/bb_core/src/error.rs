use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Team '{team}' has an empty batting lineup")]
    EmptyLineup { team: String },

    #[error("Team '{team}' has no pitchers")]
    NoPitchers { team: String },

    #[error("Invalid outcome probabilities for {owner}: sum = {sum}")]
    InvalidProbabilities { owner: String, sum: f64 },

    #[error("Matchup table '{table}' has no rows")]
    EmptyMatchupTable { table: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl SimError {
    /// Configuration errors are raised before the first plate appearance.
    pub fn is_configuration(&self) -> bool {
        match self {
            SimError::EmptyLineup { .. } => true,
            SimError::NoPitchers { .. } => true,
            SimError::InvalidProbabilities { .. } => true,
            SimError::EmptyMatchupTable { .. } => true,
            SimError::InvalidConfig(_) => true,
            SimError::ConfigIo(_) | SimError::ConfigParse(_) => false,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::ConfigParse(err.to_string())
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(err: serde_yaml::Error) -> Self {
        SimError::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
