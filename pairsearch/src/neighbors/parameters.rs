use crate::Error;

/// Algorithm used to find candidate pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum Strategy {
    /// Check all possible pairs of particles, with a cost quadratic in the
    /// number of particles
    BruteForce,
    /// Sort the particles in bins of the size of the cutoff, and only check
    /// pairs of particles in neighboring bins
    #[default]
    CellList,
}

fn default_exclusions() -> bool {
    true
}

/// Serializable configuration of a [`NeighborSearch`](super::NeighborSearch).
///
/// Callbacks (match function and pair factory) and the exclusion table can
/// not be serialized and are set directly on the search.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchParameters {
    /// Pairs separated by more than this distance are never reported. A pair
    /// exactly at the cutoff distance is reported.
    pub cutoff: f64,
    /// Should pairs in the exclusion table be skipped?
    #[serde(default = "default_exclusions")]
    pub exclusions: bool,
    /// Algorithm used to find candidate pairs
    #[serde(default)]
    pub strategy: Strategy,
}

impl SearchParameters {
    /// Parse and validate parameters from a JSON string
    pub fn from_json(json: &str) -> Result<SearchParameters, Error> {
        let parameters = serde_json::from_str::<SearchParameters>(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Serialize these parameters to JSON
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that these parameters are valid
    pub fn validate(&self) -> Result<(), Error> {
        check_cutoff(self.cutoff)
    }
}

pub(crate) fn check_cutoff(cutoff: f64) -> Result<(), Error> {
    if cutoff > 0.0 && cutoff.is_finite() {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "the cutoff must be a positive and finite number, got {}", cutoff
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let parameters = SearchParameters::from_json(r#"{"cutoff": 3.5}"#).unwrap();
        assert_eq!(parameters, SearchParameters {
            cutoff: 3.5,
            exclusions: true,
            strategy: Strategy::CellList,
        });
    }

    #[test]
    fn roundtrip() {
        let json = r#"{"cutoff":2.0,"exclusions":false,"strategy":"BruteForce"}"#;
        let parameters = SearchParameters::from_json(json).unwrap();
        assert!(!parameters.exclusions);
        assert_eq!(parameters.strategy, Strategy::BruteForce);
        assert_eq!(parameters.to_json().unwrap(), json);
    }

    #[test]
    fn invalid() {
        let error = SearchParameters::from_json(r#"{"cutoff": -1.0}"#).unwrap_err();
        assert_eq!(error.to_string(), "invalid configuration: the cutoff must be a positive and finite number, got -1");

        let error = SearchParameters::from_json(r#"{"exclusions": true}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));

        let error = SearchParameters::from_json(r#"{"cutoff": 1.0, "cut_off": 2.0}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));

        let error = SearchParameters::from_json(r#"{"cutoff": 1.0, "strategy": "Octree"}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));
    }
}
