//! Conversion of Gregorian dates into the Chinese lunisolar calendar (农历).
//!
//! The calendar is computed, not looked up: solar terms and new moons come
//! from embedded astronomical algorithms ([`astronomy`]), and months are
//! numbered from them following the modern rules, in Beijing time. Dates
//! within the 歲 1900 to 2100 are supported, see [`chinese::ephemeris`].
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use nongli::Date;
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//!
//! assert_eq!(6, date.day_of_week()); // Saturday
//! assert_eq!(2451545, date.jdn());
//! ```
//!
//! Display-ready lunisolar date:
//!
//! ```
//! use nongli::{Date, to_lunisolar};
//!
//! let date = Date::from_gregorian(2024, 2, 4).unwrap();
//! let lunar = to_lunisolar(date).unwrap();
//!
//! assert_eq!("癸卯年 腊月廿五 季冬 立春", lunar.to_string());
//! ```
//!
//! Lower-level access to the months of a 歲:
//!
//! ```
//! use nongli::Date;
//! use nongli::chinese::{Annus, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let annus = Annus::from_date(date).unwrap();
//!
//! assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
//! ```

pub mod astronomy;
pub mod chinese;
pub mod date;
pub mod error;
pub mod time_scales;

pub use chinese::lunisolar::{LunisolarDate, to_lunisolar};
pub use chinese::{season, sexagenary_year};
pub use date::Date;
pub use error::{Error, Result};
