//! `tabula generate`: synthetic users for exercising large collections.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabula_query::Record;

use crate::cli::GenerateArgs;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bob", "Chen", "Dana", "Eli", "Farah", "Goran", "Hana", "Ivo", "Jun", "Kai", "Lena",
    "Mateo", "Nia", "Omar", "Priya", "Quinn", "Rosa", "Sven", "Tariq", "Uma", "Viktor", "Wen",
    "Yara", "Zoë",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Brown", "Costa", "Dubois", "Eriksen", "Fischer", "García", "Horvat", "Ito",
    "Jensen", "Kowalski", "López", "Müller", "Novak", "Okafor", "Petrov", "Rossi", "Silva",
    "Tanaka", "Weber",
];

const ROLES: &[&str] = &["Admin", "Editor", "Viewer"];

const DOMAINS: &[&str] = &["example.com", "example.org", "mail.test"];

pub fn run(args: &GenerateArgs, out: &mut dyn Write) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let file = File::create(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let mut writer = BufWriter::new(file);
    write_users(&mut writer, args.count, &mut rng)?;
    writer.flush()?;
    tracing::info!(count = args.count, path = %args.out.display(), "generated dataset");
    writeln!(out, "wrote {} records to {}", args.count, args.out.display())?;
    Ok(())
}

/// Streams `count` users as a JSON array.
pub fn write_users<W: Write, R: Rng>(writer: &mut W, count: usize, rng: &mut R) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid base date")?;
    writer.write_all(b"[")?;
    for i in 0..count {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(b"\n  ")?;
        serde_json::to_writer(&mut *writer, &user(i + 1, epoch, rng))?;
    }
    writer.write_all(b"\n]\n")?;
    Ok(())
}

fn user<R: Rng>(n: usize, epoch: NaiveDate, rng: &mut R) -> Record {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let domain = DOMAINS[rng.gen_range(0..DOMAINS.len())];
    let created = epoch + Duration::days(rng.gen_range(0..2000));
    Record::new()
        .with("id", format!("u-{}", n))
        .with("name", format!("{} {}", first, last))
        .with(
            "email",
            format!("{}.{}{}@{}", first, last, n, domain).to_lowercase(),
        )
        .with("role", ROLES[rng.gen_range(0..ROLES.len())])
        .with("created_at", created.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(count: usize, seed: u64) -> Vec<Record> {
        let mut buf = Vec::new();
        write_users(&mut buf, count, &mut StdRng::seed_from_u64(seed)).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn output_is_a_json_array_of_users() {
        let users = generate(50, 7);
        assert_eq!(users.len(), 50);
        assert_eq!(users[0].text("id"), "u-1");
        assert_eq!(users[49].text("id"), "u-50");
        for user in &users {
            assert!(ROLES.contains(&user.text("role").as_str()));
            assert!(user.text("email").contains('@'));
            assert!(NaiveDate::parse_from_str(&user.text("created_at"), "%Y-%m-%d").is_ok());
        }
    }

    #[test]
    fn seed_is_reproducible() {
        assert_eq!(generate(20, 42), generate(20, 42));
    }

    #[test]
    fn empty_dataset() {
        assert!(generate(0, 1).is_empty());
    }
}
