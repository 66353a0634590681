use thiserror::Error;

/// Error returned when a `SimulationConfig` cannot be used for a projection.
///
/// Raised before any replicate is started; no partial result exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// At least one replicate is required.
    #[error("Replicate count must be at least 1")]
    NoReplicates,

    /// At least one year is required.
    #[error("Year count must be at least 1")]
    NoYears,

    /// A numeric parameter is NaN or infinite.
    #[error("Parameter '{name}' must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },

    /// A parameter that must be non-negative was negative.
    #[error("Parameter '{name}' must be non-negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    /// Parametric bounds are inverted.
    #[error("Invalid bounds for {rate} rate: min {min} exceeds max {max}")]
    InvertedBounds {
        rate: &'static str,
        min: f64,
        max: f64,
    },

    /// A death rate used as a Binomial probability exceeds 1.
    #[error(
        "Parameter '{name}' is {value}, but demographic stochasticity needs a death probability in [0, 1]"
    )]
    DeathProbabilityAboveOne { name: &'static str, value: f64 },
}

/// A distribution parameter that fell outside its valid domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingFault {
    #[error("Poisson mean {0} is not a valid rate")]
    PoissonMean(f64),

    #[error("Binomial trial count cannot be formed from population size {0}")]
    BinomialTrials(f64),

    #[error("Binomial probability {0} is outside [0, 1]")]
    BinomialProbability(f64),

    #[error("Normal distribution with mean {mean} and sd {sd} is undefined")]
    Normal { mean: f64, sd: f64 },

    #[error("Population size {0} is not representable")]
    SizeOverflow(f64),
}

/// A sampling failure, located at the replicate and year where it occurred.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Sampling failed in replicate {replicate}, year {year}: {fault}")]
pub struct SamplingDomainError {
    /// Zero-based replicate index.
    pub replicate: usize,
    /// One-based year whose population produced the failing draw, or
    /// the year whose size overflowed.
    pub year: usize,
    pub fault: SamplingFault,
}

/// Error returned by the quasi-extinction evaluator for unusable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Quasi-extinction threshold must be a non-negative number (got {0})")]
pub struct InvalidThresholdError(pub f64);

/// Any failure of a projection run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Sampling(#[from] SamplingDomainError),
}

/// Database error types.
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database initialization error: {0}")]
    Initialization(String),
    #[error("Transaction error: {0}")]
    Transaction(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Insert error: {0}")]
    Insert(String),
    #[error("Close error: {0}")]
    Close(String),
    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),
    #[error("Result was produced under a different configuration than the one recorded")]
    ConfigMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_error_names_location() {
        let err = SamplingDomainError {
            replicate: 7,
            year: 12,
            fault: SamplingFault::BinomialProbability(1.4),
        };
        let msg = err.to_string();
        assert!(msg.contains("replicate 7"));
        assert!(msg.contains("year 12"));
        assert!(msg.contains("1.4"));
    }

    #[test]
    fn test_projection_error_is_transparent() {
        let err: ProjectionError = ConfigurationError::NoYears.into();
        assert_eq!(err.to_string(), "Year count must be at least 1");
    }
}
