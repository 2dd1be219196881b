#![no_main]

use chrono::{Days, NaiveDate};
use libfuzzer_sys::fuzz_target;

use birthright_balance::{age, days_lived};
use birthright_types::Birthdate;

// Fuzz days-lived and age over arbitrary date pairs.
// Ensures the arithmetic never panics and stays symmetric.
fuzz_target!(|data: (u32, u32)| {
    let Some(epoch) = NaiveDate::from_ymd_opt(1800, 1, 1) else {
        return;
    };
    let (Some(birth), Some(today)) = (
        epoch.checked_add_days(Days::new((data.0 % 200_000) as u64)),
        epoch.checked_add_days(Days::new((data.1 % 200_000) as u64)),
    ) else {
        return;
    };

    let forward = days_lived(Birthdate::new(birth), today);
    let backward = days_lived(Birthdate::new(today), birth);
    assert_eq!(forward, backward);

    let _ = age(Birthdate::new(birth), today);
});
