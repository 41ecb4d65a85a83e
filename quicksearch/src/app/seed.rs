//! Deterministic user generation.
//!
//! The same seed and count always produce the same users, so requests
//! against a freshly started server are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::models::{Account, User};

const FIRST_NAMES: [&str; 16] = [
    "Ada", "Bruno", "Chloe", "Dmitri", "Elena", "Farah", "Gustavo", "Hana", "Igor", "Jade",
    "Kofi", "Lena", "Mateo", "Nadia", "Oscar", "Yvette",
];

const LAST_NAMES: [&str; 12] = [
    "Abbott", "Becker", "Castillo", "Dubois", "Eriksen", "Fischer", "Gallo", "Haddad", "Ito",
    "Jensen", "Kowalski", "Larsen",
];

const COMPANIES: [&str; 6] = [
    "Acme", "Globex", "Initech", "Umbrella", "Vandelay", "Wonka",
];

const JOB_TITLES: [&str; 10] = [
    "Central Data Officer",
    "Central Marketing Analyst",
    "Direct Operations Manager",
    "Dynamic Research Planner",
    "Forward Security Engineer",
    "Global Program Designer",
    "Internal Quality Consultant",
    "Lead Accounts Strategist",
    "Principal Web Architect",
    "Regional Response Agent",
];

/// Fraction of users generated without an account.
const NO_ACCOUNT_RATE: f64 = 0.1;

/// Generate `count` users with ids `0..count`.
#[must_use]
pub fn generate_users(seed: u64, count: usize) -> Vec<User> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            #[allow(clippy::cast_possible_wrap)]
            let id = index as i64;
            generate_user(&mut rng, id)
        })
        .collect()
}

fn generate_user(rng: &mut StdRng, id: i64) -> User {
    let first_name = pick(rng, &FIRST_NAMES);
    let last_name = pick(rng, &LAST_NAMES);
    let company_name = pick(rng, &COMPANIES);

    let account = (rng.random::<f64>() >= NO_ACCOUNT_RATE).then(|| Account {
        id: 10_000 + id,
        balance: rng.random_range(0..=1000),
        latest_transactions: rng.random_range(0..=10),
    });

    User {
        id,
        account,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone_number: format!(
            "555-{:03}-{:04}",
            rng.random_range(0..1000),
            rng.random_range(0..10_000)
        ),
        email: format!(
            "{first_name}.{last_name}@{}.example",
            company_name.to_ascii_lowercase()
        ),
        company_name: company_name.to_string(),
        job_title: pick(rng, &JOB_TITLES).to_string(),
    }
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values[rng.random_range(0..values.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_users() {
        assert_eq!(generate_users(7, 20), generate_users(7, 20));
        assert_ne!(generate_users(7, 20), generate_users(8, 20));
    }

    #[test]
    fn test_ids_are_sequential() {
        let users = generate_users(12345, 50);
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_values_in_range() {
        for user in generate_users(3, 200) {
            if let Some(account) = &user.account {
                assert!((0..=1000).contains(&account.balance));
                assert!((0..=10).contains(&account.latest_transactions));
            }
            assert!(user.email.starts_with(&user.first_name));
        }
    }
}
