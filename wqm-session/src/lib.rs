//! Page sessions for the water quality maps.
//!
//! Each session owns a map surface, the rows loaded for its page, and the
//! layers drawn from them. Loads are split into a synchronous `begin_*` that
//! returns the query, the awaited fetch, and a synchronous `finish_*` that
//! applies the result, so UI hosts never hold session state across an
//! await. The `load*` helpers run all three in sequence.

pub mod error;
pub mod kpi;
pub mod samples;
pub mod status;
pub mod ticket;
pub mod timeslider;
pub mod zones;

pub use error::SessionError;
pub use kpi::{DateOutcome, DateRequest, KpiMap};
pub use samples::{SampleLayer, SampleMap};
pub use status::Status;
pub use timeslider::TimeSliderMap;
pub use zones::ZoneMap;
