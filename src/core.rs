pub mod credential;
pub mod date_range;

pub use self::{credential::Credential, date_range::DateRange};
