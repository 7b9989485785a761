// Synthetic person records for seeding the store

use crate::person::Person;
use crate::store::Store;
use anyhow::Result;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

pub const NAMES: [&str; 50] = [
    "Alice", "Bob", "Carol", "David", "Eve", "Frank", "Grace", "Hannah", "Ivan", "Julia",
    "Kevin", "Laura", "Mike", "Nina", "Oscar", "Paula", "Quinn", "Rita", "Sam", "Tina",
    "Uma", "Victor", "Wendy", "Xavier", "Yara", "Zane", "Luca", "Sara", "Giorgio", "Marta",
    "Elena", "Matteo", "Clara", "Paolo", "Giulia", "Marco", "Silvia", "Andrea", "Chiara",
    "Roberto", "Francesca", "Antonio", "Martina", "Federico", "Camilla", "Stefano", "Sofia",
    "Riccardo", "Beatrice", "Leonardo",
];

pub const EYE_COLORS: [&str; 5] = ["blue", "green", "brown", "hazel", "gray"];
pub const HAIR_COLORS: [&str; 5] = ["blonde", "brown", "black", "red", "gray"];

pub const MIN_WEIGHT: f64 = 50.0;
pub const MAX_WEIGHT: f64 = 100.0;

/// Draw one random record per name
pub fn generate_people<R: Rng>(names: &[&str], rng: &mut R) -> Vec<Person> {
    names
        .iter()
        .map(|name| {
            // Arrays are non-empty, choose() only fails on empty slices
            let eye = EYE_COLORS.choose(rng).copied().unwrap_or(EYE_COLORS[0]);
            let hair = HAIR_COLORS.choose(rng).copied().unwrap_or(HAIR_COLORS[0]);
            let weight = round_one_decimal(rng.gen_range(MIN_WEIGHT..=MAX_WEIGHT));
            Person::new(name, eye, hair, weight)
        })
        .collect()
}

/// Generate a record for every entry of [`NAMES`] and upsert them all at once
pub fn seed<R: Rng>(store: &mut Store, rng: &mut R) -> Result<usize> {
    let people = generate_people(&NAMES, rng);
    let written = store.upsert_people(&people)?;
    info!("seeded {} people", written);
    Ok(written)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
