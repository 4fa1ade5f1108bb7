//! Verifier configuration

/// Configuration for a [`Verifier`](crate::oracle::Verifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Emit and collect warnings. When off, non-fatal findings are dropped.
    pub warnings: bool,

    /// Seed for the value generator. `None` draws one from entropy; the seed
    /// in use is logged at debug level either way.
    pub seed: Option<u64>,

    /// Exclusive upper bound on generated array and byte-stream lengths.
    pub max_array_len: usize,

    /// Compare string representations of each pair.
    pub check_string_representation: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            warnings: true,
            seed: None,
            max_array_len: 42,
            check_string_representation: true,
        }
    }
}

impl VerifierConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_warnings(mut self, enabled: bool) -> Self {
        self.warnings = enabled;
        self
    }

    /// Lengths are drawn from `1..max_array_len`; values below 2 are raised to 2.
    pub fn with_max_array_len(mut self, max_array_len: usize) -> Self {
        self.max_array_len = max_array_len.max(2);
        self
    }

    pub fn with_string_checks(mut self, enabled: bool) -> Self {
        self.check_string_representation = enabled;
        self
    }
}
