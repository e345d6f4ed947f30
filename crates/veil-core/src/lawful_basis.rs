//! GDPR lawful bases for processing.
//!
//! Convenience constants for [`PersonalData::processing_requirements`]
//! (crate::data::PersonalData::processing_requirements). The field itself is
//! free-form; these cover the six bases of GDPR Article 6.

use serde::{Deserialize, Serialize};

/// A lawful basis for processing personal data under GDPR Article 6.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GdprLawfulBasis {
  /// The data subject has given consent (Art. 6(1)(a)).
  UserConsent,
  /// Processing is necessary for a contract with the subject (Art. 6(1)(b)).
  Contract,
  /// Processing is required by law (Art. 6(1)(c)).
  LegalRequirement,
  /// Processing protects someone's vital interests (Art. 6(1)(d)).
  VitalInterest,
  /// Processing is in the public interest (Art. 6(1)(e)).
  PublicInterest,
  /// Processing serves the controller's legitimate interests (Art. 6(1)(f)).
  LegitimateInterest,
}

impl GdprLawfulBasis {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::UserConsent => "USER_CONSENT",
      Self::Contract => "CONTRACT",
      Self::LegalRequirement => "LEGAL_REQUIREMENT",
      Self::VitalInterest => "VITAL_INTEREST",
      Self::PublicInterest => "PUBLIC_INTEREST",
      Self::LegitimateInterest => "LEGITIMATE_INTEREST",
    }
  }
}

impl std::fmt::Display for GdprLawfulBasis {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<GdprLawfulBasis> for String {
  fn from(basis: GdprLawfulBasis) -> Self { basis.as_str().to_owned() }
}
