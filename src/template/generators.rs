//! Random value catalog for `{{$random.<name>}}`.
//!
//! Every invocation draws fresh values; nothing is seeded or memoized.

use std::str::FromStr;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::template::clock::format_iso8601;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Diego", "Elena", "Felix", "Grace", "Hiro", "Isla", "Jonas",
    "Keira", "Liam", "Maya", "Noah", "Olivia", "Pablo", "Quinn", "Rosa", "Sam", "Tara",
    "Umar", "Vera", "Wes", "Yara", "Zane",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Chen", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ito",
    "Johnson", "Kowalski", "Lopez", "Miller", "Nakamura", "Okafor", "Patel", "Rossi",
    "Schmidt", "Turner", "Walsh", "Young",
];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua",
    "enim", "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris",
    "nisi", "aliquip", "commodo", "consequat", "aute", "irure", "voluptate", "velit", "esse",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "inbox.test"];

const URL_TLDS: &[&str] = &["com", "org", "net", "io", "dev"];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "and Sons", "Labs", "Partners"];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Boulevard", "Way", "Court"];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Lakeside", "Fairview", "Greenville", "Madison", "Georgetown",
    "Franklin", "Clinton", "Ashland", "Oakridge", "Brookfield",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Brazil", "Canada", "Denmark", "Egypt", "France", "Germany",
    "India", "Japan", "Kenya", "Mexico", "Norway", "Portugal", "Singapore", "Spain",
];

const COLORS: &[&str] = &[
    "red", "green", "blue", "yellow", "purple", "orange", "teal", "magenta", "olive", "navy",
    "maroon", "silver", "gold", "indigo", "violet", "turquoise",
];

/// Named random generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandomGenerator {
    Uuid,
    Name,
    Email,
    Phone,
    Number,
    Boolean,
    Avatar,
    Url,
    Date,
    Text,
    Paragraph,
    Word,
    Company,
    Address,
    City,
    Country,
    ZipCode,
    Color,
}

impl RandomGenerator {
    pub const ALL: [RandomGenerator; 18] = [
        RandomGenerator::Uuid,
        RandomGenerator::Name,
        RandomGenerator::Email,
        RandomGenerator::Phone,
        RandomGenerator::Number,
        RandomGenerator::Boolean,
        RandomGenerator::Avatar,
        RandomGenerator::Url,
        RandomGenerator::Date,
        RandomGenerator::Text,
        RandomGenerator::Paragraph,
        RandomGenerator::Word,
        RandomGenerator::Company,
        RandomGenerator::Address,
        RandomGenerator::City,
        RandomGenerator::Country,
        RandomGenerator::ZipCode,
        RandomGenerator::Color,
    ];

    /// Name used in templates.
    pub fn name(&self) -> &'static str {
        match self {
            RandomGenerator::Uuid => "uuid",
            RandomGenerator::Name => "name",
            RandomGenerator::Email => "email",
            RandomGenerator::Phone => "phone",
            RandomGenerator::Number => "number",
            RandomGenerator::Boolean => "boolean",
            RandomGenerator::Avatar => "avatar",
            RandomGenerator::Url => "url",
            RandomGenerator::Date => "date",
            RandomGenerator::Text => "text",
            RandomGenerator::Paragraph => "paragraph",
            RandomGenerator::Word => "word",
            RandomGenerator::Company => "company",
            RandomGenerator::Address => "address",
            RandomGenerator::City => "city",
            RandomGenerator::Country => "country",
            RandomGenerator::ZipCode => "zipCode",
            RandomGenerator::Color => "color",
        }
    }

    /// Produce one value.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            RandomGenerator::Uuid => uuid::Uuid::new_v4().to_string(),
            RandomGenerator::Name => format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
            RandomGenerator::Email => format!(
                "{}.{}{}@{}",
                pick(rng, FIRST_NAMES).to_lowercase(),
                pick(rng, LAST_NAMES).to_lowercase(),
                rng.gen_range(1..100),
                pick(rng, EMAIL_DOMAINS)
            ),
            RandomGenerator::Phone => format!(
                "({:03}) {:03}-{:04}",
                rng.gen_range(200..1000),
                rng.gen_range(200..1000),
                rng.gen_range(0..10_000)
            ),
            RandomGenerator::Number => rng.gen_range(1..=1000).to_string(),
            RandomGenerator::Boolean => rng.gen_bool(0.5).to_string(),
            RandomGenerator::Avatar => format!(
                "https://avatars.githubusercontent.com/u/{}",
                rng.gen_range(1..100_000_000)
            ),
            RandomGenerator::Url => format!("https://{}.{}", pick(rng, LOREM), pick(rng, URL_TLDS)),
            RandomGenerator::Date => {
                // Somewhere within the last day.
                let back = chrono::Duration::milliseconds(rng.gen_range(0..86_400_000));
                format_iso8601(Utc::now() - back)
            }
            RandomGenerator::Text => sentence(rng),
            RandomGenerator::Paragraph => {
                let count = rng.gen_range(3..=6);
                (0..count).map(|_| sentence(rng)).collect::<Vec<_>>().join(" ")
            }
            RandomGenerator::Word => pick(rng, LOREM).to_string(),
            RandomGenerator::Company => format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)),
            RandomGenerator::Address => format!(
                "{} {} {}",
                rng.gen_range(1..10_000),
                pick(rng, LAST_NAMES),
                pick(rng, STREET_SUFFIXES)
            ),
            RandomGenerator::City => pick(rng, CITIES).to_string(),
            RandomGenerator::Country => pick(rng, COUNTRIES).to_string(),
            RandomGenerator::ZipCode => format!("{:05}", rng.gen_range(0..100_000)),
            RandomGenerator::Color => pick(rng, COLORS).to_string(),
        }
    }
}

/// Returned for names outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown random generator: {0}")]
pub struct UnknownGenerator(pub String);

impl FromStr for RandomGenerator {
    type Err = UnknownGenerator;

    /// Names are case-sensitive (`zipCode`, not `zipcode`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RandomGenerator::ALL
            .into_iter()
            .find(|g| g.name() == s)
            .ok_or_else(|| UnknownGenerator(s.to_string()))
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(4..=10);
    let mut text = (0..count).map(|_| pick(rng, LOREM)).collect::<Vec<_>>().join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}
