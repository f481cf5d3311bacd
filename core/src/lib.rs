pub mod dispatch;
pub mod forecast;
pub mod narrative;
pub mod store;
pub mod suitability;

pub use dispatch::{compute_with_deadline, DispatchError};
pub use forecast::{DailyForecast, ForecastEngine};
pub use narrative::narrative_for;
pub use store::{StaticSubjectStore, SubjectStore};
pub use suitability::{day_suitability, Activity, Suitability};
