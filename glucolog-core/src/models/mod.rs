mod glucose_log;
mod profile;
mod reading_context;

pub use glucose_log::{to_iso_string, CreatedLogError, GlucoseLog, NewGlucoseLog};
pub use profile::{Gender, NewProfile, ProfileForm, ValidationError, MAX_AGE, MIN_AGE};
pub use reading_context::ReadingContext;
