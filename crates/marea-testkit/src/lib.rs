// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use marea_app::{Quote, QuoteFields, QuoteId, QuoteStatus, QuoteStore};
use time::{Date, Duration, Month};

const REFERENCE_YEAR: i32 = 2026;

const FIRST_NAMES: [&str; 16] = [
    "Ana", "Luis", "Marta", "Jorge", "Sofía", "Diego", "Carmen", "Raúl", "Elena", "Pablo",
    "Lucía", "Andrés", "Valeria", "Tomás", "Irene", "Héctor",
];
const LAST_NAMES: [&str; 16] = [
    "Pérez",
    "Gómez",
    "Ruiz",
    "Hernández",
    "Castillo",
    "Navarro",
    "Ortega",
    "Morales",
    "Vega",
    "Ramos",
    "Silva",
    "Delgado",
    "Cruz",
    "Romero",
    "Flores",
    "Ibarra",
];

const UNIT_MAKES: [&str; 4] = ["Seadoo", "Yamaha", "Kawasaki", "Honda"];
const UNIT_MODELS: [&str; 12] = [
    "GTX", "RXP-X", "Spark", "GTI", "VX", "FX Cruiser", "GP1800", "Ultra 310", "STX 160",
    "Aquatrax", "Wake Pro", "Fish Pro",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of shop quotes for demos and tests.
#[derive(Debug, Clone)]
pub struct QuoteFaker {
    rng: DeterministicRng,
    sequence: u32,
}

impl QuoteFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            sequence: 0,
        }
    }

    pub fn client(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn unit(&mut self) -> String {
        format!("{} {}", self.pick(&UNIT_MAKES), self.pick(&UNIT_MODELS))
    }

    pub fn quote_fields(&mut self) -> QuoteFields {
        self.sequence += 1;
        let status = QuoteStatus::ALL[self.rng.int_n(QuoteStatus::ALL.len())];
        QuoteFields {
            reception: format!("R-{:04}", 1000 + self.sequence),
            date: self.date_in_reference_year().to_string(),
            client: self.client(),
            unit: self.unit(),
            document: format!("COT-{REFERENCE_YEAR}-{:03}", self.sequence),
            status,
        }
    }

    /// Fills a fresh store with `count` quotes.
    pub fn store(&mut self, count: usize) -> QuoteStore {
        let mut store = QuoteStore::new();
        for _ in 0..count {
            let fields = self.quote_fields();
            store.add(fields);
        }
        store
    }

    pub fn date_in_reference_year(&mut self) -> Date {
        let start = reference_date();
        let offset = self.rng.int_n(365) as i64;
        start + Duration::days(offset)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// A fixed quote for assertions that need known values.
pub fn sample_quote() -> Quote {
    Quote::from_fields(QuoteId::new(1), sample_fields())
}

pub fn sample_fields() -> QuoteFields {
    QuoteFields {
        reception: "R-1042".to_owned(),
        date: "2026-03-14".to_owned(),
        client: "Ana Pérez".to_owned(),
        unit: "Seadoo GTX".to_owned(),
        document: "COT-2026-042".to_owned(),
        status: QuoteStatus::Pending,
    }
}

fn reference_date() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1).unwrap_or(Date::MIN)
}
