use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside of its permitted range
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings for the active-set QP solver

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QpSettings<T: FloatT> {
    ///maximum number of iterations
    #[builder(default = "1000")]
    pub max_iter: u32,

    ///verbose printing
    #[builder(default = "true")]
    pub verbose: bool,

    ///smallest magnitude of a nonzero multiplier
    #[builder(default = "T::min_positive_value()")]
    pub dmin: T,

    ///bounds with magnitude at least `inf` are treated as absent
    #[builder(default = "T::infinity()")]
    pub inf: T,

    ///weight of the dual error relative to the primal error
    #[builder(default = "(1000.).as_T()")]
    pub du_to_pr: T,

    ///primal feasibility tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_pr: T,

    ///dual feasibility tolerance
    #[builder(default = "(1e-8).as_T()")]
    pub tol_du: T,

    ///threshold on |diag(R)| for declaring the KKT matrix singular
    #[builder(default = "(1e-12).as_T()")]
    pub sing_tol: T,

    ///step components below this magnitude are set to zero
    #[builder(default = "(1e-14).as_T()")]
    pub step_zero_tol: T,

    ///a step no longer than this does not count as progress
    #[builder(default = "(1e-16).as_T()")]
    pub min_terminate_step_length: T,

    ///fill-reducing (AMD) column ordering for the KKT factorization
    #[builder(default = "true")]
    pub qr_ordering_enable: bool,
}

impl<T> Default for QpSettings<T>
where
    T: FloatT,
{
    fn default() -> QpSettings<T> {
        QpSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> QpSettings<T>
where
    T: FloatT,
{
    /// Checks that all numerical settings are in range
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_positive("dmin", self.dmin)?;
        validate_positive("inf", self.inf)?;
        validate_positive("du_to_pr", self.du_to_pr)?;
        validate_positive("tol_pr", self.tol_pr)?;
        validate_positive("tol_du", self.tol_du)?;
        validate_positive("sing_tol", self.sing_tol)?;
        validate_positive("step_zero_tol", self.step_zero_tol)?;
        validate_positive("min_terminate_step_length", self.min_terminate_step_length)?;
        Ok(())
    }

    /// true if `bound` is to be treated as absent
    #[inline]
    pub(crate) fn is_inf(&self, bound: T) -> bool {
        T::abs(bound) >= self.inf
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for QpSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        QpSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> QpSettingsBuilder<T>
where
    T: FloatT,
{
    /// check that any explicitly set numerical values are positive
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("dmin", self.dmin),
            ("inf", self.inf),
            ("du_to_pr", self.du_to_pr),
            ("tol_pr", self.tol_pr),
            ("tol_du", self.tol_du),
            ("sing_tol", self.sing_tol),
            ("step_zero_tol", self.step_zero_tol),
            ("min_terminate_step_length", self.min_terminate_step_length),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                validate_positive(name, v)?;
            }
        }
        Ok(())
    }
}

fn validate_positive<T: FloatT>(name: &'static str, value: T) -> Result<(), SettingsError> {
    // also rejects NaN
    if value > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(name))
    }
}

#[test]
fn test_settings_validate() {
    let settings = QpSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.max_iter, 1000);
    assert_eq!(settings.min_terminate_step_length, 1e-16);
    assert!(settings.is_inf(f64::NEG_INFINITY));
    assert!(!settings.is_inf(1e300));

    // bad values are rejected by the builder
    assert!(QpSettingsBuilder::<f64>::default()
        .tol_pr(-1.0)
        .build()
        .is_err());
    assert!(QpSettingsBuilder::<f64>::default()
        .dmin(f64::NAN)
        .build()
        .is_err());

    // finite infinity is allowed
    let settings = QpSettingsBuilder::<f64>::default().inf(1e20).build().unwrap();
    assert!(settings.is_inf(-1e20));

    // and by direct validation
    let mut settings = QpSettings::<f64>::default();
    settings.du_to_pr = 0.0;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("du_to_pr"))
    );
}
