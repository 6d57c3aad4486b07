//! Ready-made questionnaires used by the tests and as usage references.
//!
//! Each builder takes the completion callback and returns a fresh
//! [`Questionnaire`](questionnaire::Questionnaire) positioned on its first item.

pub mod contact;
pub mod onboarding;
pub mod screener;

pub use contact::{contact_details, validate_email};
pub use onboarding::onboarding;
pub use screener::{REFERRAL_THRESHOLD, option_score, sleep_screener};
