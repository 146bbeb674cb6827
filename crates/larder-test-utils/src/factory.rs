use chrono::{DateTime, SubsecRound, Utc};
use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn string() -> String {
    string_len(12)
}

pub fn string_len(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}
