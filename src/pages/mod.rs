//! Page objects
//!
//! - `planity` - home screen, search form and results
//! - `consent` - cookie consent overlay

pub mod consent;
pub mod planity;

pub use consent::{ConsentBanner, CONSENT_BUTTONS};
pub use planity::PlanityPage;
