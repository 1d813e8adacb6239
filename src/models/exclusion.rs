use std::fmt;
use std::fmt::Formatter;

/// Pipeline stage in which a city dropped out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Calculate,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Stage::Fetch     => write!(f, "fetch"),
            Stage::Calculate => write!(f, "calculate"),
            Stage::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// A city left out of the ranking, with the reason why
#[derive(Clone, Debug, PartialEq)]
pub struct Exclusion {
    pub city: String,
    pub stage: Stage,
    pub reason: String,
}

impl Exclusion {
    pub fn new(city: &str, stage: Stage, reason: impl ToString) -> Self {
        Self { city: city.to_string(), stage, reason: reason.to_string() }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} excluded at {} stage: {}", self.city, self.stage, self.reason)
    }
}
