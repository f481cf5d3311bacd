pub mod lunar_day;
pub mod phase;
pub mod riseset;
pub mod sign;

pub use lunar_day::{
    lunar_day, lunar_day_end, lunar_day_number, lunar_day_start, main_lunar_day_on_date,
    next_lunar_day, next_new_moon, previous_lunar_day, previous_new_moon, LunarDay,
};
pub use phase::{illuminated_fraction, moon_phase, MoonPhase};
pub use riseset::{next_moonrise, previous_moonrise};
pub use sign::{
    moon_sign_at, moon_sign_period, moon_signs_on_date, sign_ingresses, MoonSignChange,
    MoonSignSegment, MoonSignsOnDate,
};
