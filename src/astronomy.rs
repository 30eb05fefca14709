//! Solar and lunar positions precise enough for calendar computation.
//!
//! The solar longitude uses a truncated VSOP87 series for the Earth and is
//! good to about one arcsecond; new moons follow Jean Meeus, *Astronomical
//! Algorithms*, ch. 49, good to well under a minute. Both are evaluated in
//! TDB (treated as TT).

use crate::time_scales::Tdb;

/// J2000.0 epoch in Julian date.
pub const J2000: f64 = 2451545.0;
/// Length of the tropical year in days.
pub const TROPICAL_YEAR: f64 = 365.242_189;
/// Mean length of a lunation in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_861;
/// Mean new moon of lunation 0 (2000-01-06).
const NEW_MOON_EPOCH: f64 = 2451550.09766;

const ARCSEC: f64 = 1.0 / 3600.0;

/// VSOP87 periodic term `A·cos(B + C·τ)`, `A` in 1e-8 rad, `τ` in millennia.
type Term = (f64, f64, f64);

mod vsop87 {
    use super::Term;

    pub(super) const L0: &[Term] = &[
        (175347046.0, 0.0, 0.0),
        (3341656.0, 4.6692568, 6283.0758500),
        (34894.0, 4.62610, 12566.15170),
        (3497.0, 2.7441, 5753.3849),
        (3418.0, 2.8289, 3.5231),
        (3136.0, 3.6277, 77713.7715),
        (2676.0, 4.4181, 7860.4194),
        (2343.0, 6.1352, 3930.2097),
        (1324.0, 0.7425, 11506.7698),
        (1273.0, 2.0371, 529.6910),
        (1199.0, 1.1096, 1577.3435),
        (990.0, 5.233, 5884.927),
        (902.0, 2.045, 26.298),
        (857.0, 3.508, 398.149),
        (780.0, 1.179, 5223.694),
        (753.0, 2.533, 5507.553),
        (505.0, 4.583, 18849.228),
        (492.0, 4.205, 775.523),
        (357.0, 2.920, 0.067),
        (317.0, 5.849, 11790.629),
        (284.0, 1.899, 796.298),
        (271.0, 0.315, 10977.079),
        (243.0, 0.345, 5486.778),
        (206.0, 4.806, 2544.314),
        (205.0, 1.869, 5573.143),
        (202.0, 2.458, 6069.777),
        (156.0, 0.833, 213.299),
        (132.0, 3.411, 2942.463),
        (126.0, 1.083, 20.775),
        (115.0, 0.645, 0.980),
        (103.0, 0.636, 4694.003),
        (102.0, 0.976, 15720.839),
        (102.0, 4.267, 7.114),
        (99.0, 6.21, 2146.17),
        (98.0, 0.68, 155.42),
        (86.0, 5.98, 161000.69),
        (85.0, 1.30, 6275.96),
        (85.0, 3.67, 71430.70),
        (80.0, 1.81, 17260.15),
        (79.0, 3.04, 12036.46),
        (75.0, 1.76, 5088.63),
        (74.0, 3.50, 3154.69),
        (74.0, 4.68, 801.82),
        (70.0, 0.83, 9437.76),
        (62.0, 3.98, 8827.39),
        (61.0, 1.82, 7084.90),
        (57.0, 2.78, 6286.60),
        (56.0, 4.39, 14143.50),
        (56.0, 3.47, 6279.55),
        (52.0, 0.19, 12139.55),
        (52.0, 1.33, 1748.02),
        (51.0, 0.28, 5856.48),
        (49.0, 0.49, 1194.45),
        (41.0, 5.37, 8429.24),
        (41.0, 2.40, 19651.05),
        (39.0, 6.17, 10447.39),
        (37.0, 6.04, 10213.29),
        (37.0, 2.57, 1059.38),
        (36.0, 1.71, 2352.87),
        (36.0, 1.78, 6812.77),
        (33.0, 0.59, 17789.85),
        (30.0, 0.44, 83996.85),
        (30.0, 2.74, 1349.87),
        (25.0, 3.16, 4690.48),
    ];
    pub(super) const L1: &[Term] = &[
        (628331966747.0, 0.0, 0.0),
        (206059.0, 2.678235, 6283.075850),
        (4303.0, 2.6351, 12566.1517),
        (425.0, 1.590, 3.523),
        (119.0, 5.796, 26.298),
        (109.0, 2.966, 1577.344),
        (93.0, 2.59, 18849.23),
        (72.0, 1.14, 529.69),
        (68.0, 1.87, 398.15),
        (67.0, 4.41, 5507.55),
        (59.0, 2.89, 5223.69),
        (56.0, 2.17, 155.42),
        (45.0, 0.40, 796.30),
        (36.0, 0.47, 775.52),
        (29.0, 2.65, 7.11),
        (21.0, 5.34, 0.98),
        (19.0, 1.85, 5486.78),
        (19.0, 4.97, 213.30),
        (17.0, 2.99, 6275.96),
        (16.0, 0.03, 2544.31),
        (16.0, 1.43, 2146.17),
        (15.0, 1.21, 10977.08),
        (12.0, 2.83, 1748.02),
        (12.0, 3.26, 5088.63),
        (12.0, 5.27, 1194.45),
        (12.0, 2.08, 4694.00),
        (11.0, 0.77, 553.57),
        (10.0, 1.30, 6286.60),
        (10.0, 4.24, 1349.87),
        (9.0, 2.70, 242.73),
        (9.0, 5.64, 951.72),
        (8.0, 5.30, 2352.87),
        (6.0, 2.65, 9437.76),
        (6.0, 4.67, 4690.48),
    ];
    pub(super) const L2: &[Term] = &[
        (52919.0, 0.0, 0.0),
        (8720.0, 1.0721, 6283.0758),
        (309.0, 0.867, 12566.152),
        (27.0, 0.05, 3.52),
        (16.0, 5.19, 26.30),
        (16.0, 3.68, 155.42),
        (10.0, 0.76, 18849.23),
        (9.0, 2.06, 77713.77),
        (7.0, 0.83, 775.52),
        (5.0, 4.66, 1577.34),
        (4.0, 1.03, 7.11),
        (4.0, 3.44, 5573.14),
        (3.0, 5.14, 796.30),
        (3.0, 6.05, 5507.55),
        (3.0, 1.19, 242.73),
        (3.0, 6.12, 529.69),
        (3.0, 0.31, 398.15),
        (3.0, 2.28, 553.57),
        (2.0, 4.38, 5223.69),
        (2.0, 3.75, 0.98),
    ];
    pub(super) const L3: &[Term] = &[
        (289.0, 5.844, 6283.076),
        (35.0, 0.0, 0.0),
        (17.0, 5.49, 12566.15),
        (3.0, 5.20, 155.42),
        (1.0, 4.72, 3.52),
        (1.0, 5.30, 18849.23),
        (1.0, 5.97, 242.73),
    ];
    pub(super) const L4: &[Term] = &[
        (114.0, 3.142, 0.0),
        (8.0, 4.13, 6283.08),
        (1.0, 3.84, 12566.15),
    ];
    pub(super) const L5: &[Term] = &[(1.0, 3.14, 0.0)];

    pub(super) const R0: &[Term] = &[
        (100013989.0, 0.0, 0.0),
        (1670700.0, 3.0984635, 6283.0758500),
        (13956.0, 3.05525, 12566.15170),
        (3084.0, 5.1985, 77713.7715),
        (1628.0, 1.1739, 5753.3849),
        (1576.0, 2.8469, 7860.4194),
        (925.0, 5.453, 11506.770),
        (542.0, 4.564, 3930.210),
        (472.0, 3.661, 5884.927),
    ];
    pub(super) const R1: &[Term] = &[
        (103019.0, 1.107490, 6283.075850),
        (1721.0, 1.0644, 12566.1517),
        (702.0, 3.142, 0.0),
    ];
    pub(super) const R2: &[Term] = &[(4359.0, 5.7846, 6283.0758), (124.0, 5.579, 12566.152)];
}

fn series(terms: &[Term], tau: f64) -> f64 {
    terms.iter().map(|&(a, b, c)| a * (b + c * tau).cos()).sum()
}

/// Evaluates `Σ Sᵢ·τⁱ` for a VSOP87 variable, in its natural unit.
fn vsop(power_series: &[&[Term]], tau: f64) -> f64 {
    power_series
        .iter()
        .rev()
        .fold(0.0, |acc, terms| acc * tau + series(terms, tau))
        * 1e-8
}

/// Reduces an angle in degrees into `0.0..360.0`.
pub fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Reduces an angle difference in degrees into `-180.0..180.0`.
fn signed_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Nutation in longitude Δψ in degrees, from the four leading terms.
fn nutation_in_longitude(t: f64) -> f64 {
    let omega = (125.04452 - 1934.136261 * t).to_radians();
    let sun = (280.4665 + 36000.7698 * t).to_radians();
    let moon = (218.3165 + 481267.8813 * t).to_radians();
    (-17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * omega).sin())
        * ARCSEC
}

/// Apparent geocentric ecliptic longitude of the Sun, in degrees `0.0..360.0`.
///
/// # Example
///
/// ```
/// use nongli::astronomy::apparent_solar_longitude;
/// use nongli::time_scales::Tdb;
///
/// // 1992-10-13 0h TD, Meeus example 25.b: 199°54′21.818″
/// let lon = apparent_solar_longitude(Tdb(2448908.5));
/// assert!((lon - 199.906_06).abs() < 0.001);
/// ```
pub fn apparent_solar_longitude(tdb: Tdb) -> f64 {
    use vsop87::*;
    let tau = (tdb.0 - J2000) / 365250.0;
    let t = tau * 10.0;

    let earth_lon = vsop(&[L0, L1, L2, L3, L4, L5], tau).to_degrees();
    let radius = vsop(&[R0, R1, R2], tau);

    let geometric = earth_lon + 180.0;
    // FK5 frame correction
    let fk5 = -0.09033 * ARCSEC;
    let aberration = -20.4898 * ARCSEC / radius;
    normalize_degrees(geometric + fk5 + nutation_in_longitude(t) + aberration)
}

/// Finds the instant when the apparent solar longitude reaches `target`
/// degrees, starting from `estimate` which must be within a few days.
///
/// # Example
///
/// ```
/// use nongli::astronomy::solar_longitude_crossing;
/// use nongli::time_scales::Tdb;
///
/// // March equinox of 2024: 2024-03-20 03:06 UTC
/// let equinox = solar_longitude_crossing(0.0, Tdb(2460389.5));
/// assert!((equinox.0 - 2460389.6297).abs() < 0.001);
/// ```
pub fn solar_longitude_crossing(target: f64, estimate: Tdb) -> Tdb {
    const MAX_ITERATIONS: usize = 20;
    let mut jd = estimate.0;
    for _ in 0..MAX_ITERATIONS {
        let diff = signed_degrees(target - apparent_solar_longitude(Tdb(jd)));
        let step = diff * TROPICAL_YEAR / 360.0;
        jd += step;
        if step.abs() < 1e-6 {
            break;
        }
    }
    Tdb(jd)
}

/// Periodic terms of the true new moon: coefficient, powers of `E`, and
/// multiples of `(M, M′, F, Ω)`.
const NEW_MOON_TERMS: &[(f64, i32, [f64; 4])] = &[
    (-0.40720, 0, [0.0, 1.0, 0.0, 0.0]),
    (0.17241, 1, [1.0, 0.0, 0.0, 0.0]),
    (0.01608, 0, [0.0, 2.0, 0.0, 0.0]),
    (0.01039, 0, [0.0, 0.0, 2.0, 0.0]),
    (0.00739, 1, [-1.0, 1.0, 0.0, 0.0]),
    (-0.00514, 1, [1.0, 1.0, 0.0, 0.0]),
    (0.00208, 2, [2.0, 0.0, 0.0, 0.0]),
    (-0.00111, 0, [0.0, 1.0, -2.0, 0.0]),
    (-0.00057, 0, [0.0, 1.0, 2.0, 0.0]),
    (0.00056, 1, [1.0, 2.0, 0.0, 0.0]),
    (-0.00042, 0, [0.0, 3.0, 0.0, 0.0]),
    (0.00042, 1, [1.0, 0.0, 2.0, 0.0]),
    (0.00038, 1, [1.0, 0.0, -2.0, 0.0]),
    (-0.00024, 1, [-1.0, 2.0, 0.0, 0.0]),
    (-0.00017, 0, [0.0, 0.0, 0.0, 1.0]),
    (-0.00007, 0, [2.0, 1.0, 0.0, 0.0]),
    (0.00004, 0, [0.0, 2.0, -2.0, 0.0]),
    (0.00004, 0, [3.0, 0.0, 0.0, 0.0]),
    (0.00003, 0, [1.0, 1.0, -2.0, 0.0]),
    (0.00003, 0, [0.0, 2.0, 2.0, 0.0]),
    (-0.00003, 0, [1.0, 1.0, 2.0, 0.0]),
    (0.00003, 0, [-1.0, 1.0, 2.0, 0.0]),
    (-0.00002, 0, [-1.0, 1.0, -2.0, 0.0]),
    (-0.00002, 0, [1.0, 3.0, 0.0, 0.0]),
    (0.00002, 0, [0.0, 4.0, 0.0, 0.0]),
];

/// Planetary arguments `A₁..A₁₄` as (constant, rate per lunation, amplitude).
const PLANETARY_TERMS: &[(f64, f64, f64)] = &[
    (299.77, 0.107408, 0.000325),
    (251.88, 0.016321, 0.000165),
    (251.83, 26.651886, 0.000164),
    (349.42, 36.412478, 0.000126),
    (84.66, 18.206239, 0.000110),
    (141.74, 53.303771, 0.000062),
    (207.14, 2.453732, 0.000060),
    (154.84, 7.306860, 0.000056),
    (34.52, 27.261239, 0.000047),
    (207.19, 0.121824, 0.000042),
    (291.34, 1.844379, 0.000040),
    (161.72, 24.198154, 0.000037),
    (239.56, 25.513099, 0.000035),
    (331.55, 3.592518, 0.000023),
];

/// Instant of the true new moon of lunation `k`, where lunation 0 is the
/// new moon of 2000-01-06.
///
/// # Example
///
/// ```
/// use nongli::astronomy::new_moon;
///
/// // Meeus example 49.a: 1977-02-18 3h37m42s TD
/// let tdb = new_moon(-283);
/// assert!((tdb.0 - 2443192.65118).abs() < 0.0001);
/// ```
pub fn new_moon(k: i32) -> Tdb {
    let k = f64::from(k);
    let t = k / 1236.85;
    let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);

    let mean = NEW_MOON_EPOCH + SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let m_moon = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    let omega = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;
    let args = [m, m_moon, f, omega];

    let periodic: f64 = NEW_MOON_TERMS
        .iter()
        .map(|&(coef, e_power, mult)| {
            let angle: f64 = mult.iter().zip(args).map(|(n, a)| n * a).sum();
            coef * e.powi(e_power) * angle.to_radians().sin()
        })
        .sum();

    let planetary: f64 = PLANETARY_TERMS
        .iter()
        .enumerate()
        .map(|(i, &(a0, rate, amp))| {
            let mut arg = a0 + rate * k;
            if i == 0 {
                arg -= 0.009173 * t2;
            }
            amp * arg.to_radians().sin()
        })
        .sum();

    Tdb(mean + periodic + planetary)
}

/// Lunation number of the last new moon at or before `tdb`.
///
/// # Example
///
/// ```
/// use nongli::astronomy::{lunation_at_or_before, new_moon};
/// use nongli::time_scales::Tdb;
///
/// let k = lunation_at_or_before(Tdb(2451560.0));
/// assert_eq!(0, k);
/// assert!(new_moon(k).0 <= 2451560.0);
/// ```
pub fn lunation_at_or_before(tdb: Tdb) -> i32 {
    let mut k = ((tdb.0 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i32;
    while new_moon(k) > tdb {
        k -= 1;
    }
    while new_moon(k + 1) <= tdb {
        k += 1;
    }
    k
}
