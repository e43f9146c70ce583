use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kontor_core::{new_id, now_rfc3339};

use crate::model::Person;
use super::{FactoryError, FactoryState, UniqueSeq};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Fernando", "Gabriela",
    "Hugo", "Ines", "Jorge", "Lucia", "Mario", "Natalia", "Oscar", "Paula",
];

const LAST_NAMES: &[&str] = &[
    "Quispe", "Rojas", "Sanchez", "Torres", "Vargas", "Flores", "Castro",
    "Mendoza", "Paredes", "Salazar", "Huaman", "Delgado",
];

// 8-digit national ids are drawn from [40_000_000, 100_000_000).
const NATIONAL_ID_BASE: u64 = 40_000_000;
const NATIONAL_ID_SPACE: u64 = 60_000_000;

/// Builds synthetic Person records.
///
/// Default shape: an active lead with status "Activo", a unique email,
/// and a unique national id.
pub struct PersonFactory {
    rng: StdRng,
    seq: UniqueSeq,
    states: Vec<FactoryState>,
}

impl PersonFactory {
    /// Factory with a fixed default seed — fine for seeding demo data.
    pub fn new() -> Self {
        Self::seeded(0x5EED)
    }

    /// Factory with an explicit RNG seed, for reproducible runs. The
    /// unique sequence starts at a seed-derived offset, so repeated
    /// seeding against the same store with different seeds does not
    /// collide on emails or national ids.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seq: UniqueSeq::offset_by("person unique fields", seed, NATIONAL_ID_SPACE),
            states: Vec::new(),
        }
    }

    /// Cap the unique sequence (test hook for exhaustion behavior).
    pub fn with_unique_limit(mut self, limit: u64) -> Self {
        self.seq = UniqueSeq::new("person unique fields", limit);
        self
    }

    /// Attach a state. States apply in attachment order; on conflicting
    /// attributes the last one wins.
    pub fn state(mut self, state: FactoryState) -> Self {
        self.states.push(state);
        self
    }

    // ── Named states ──

    pub fn lead() -> FactoryState {
        FactoryState::new("lead", serde_json::json!({"personTypeId": 1}))
    }

    pub fn client() -> FactoryState {
        FactoryState::new("client", serde_json::json!({"personTypeId": 2}))
    }

    pub fn inactive() -> FactoryState {
        FactoryState::new(
            "inactive",
            serde_json::json!({"active": false, "status": "Inactivo"}),
        )
    }

    pub fn without_national_id() -> FactoryState {
        FactoryState::new("without_national_id", serde_json::json!({"nationalId": null}))
    }

    /// Produce one synthetic person.
    pub fn build(&mut self) -> Result<Person, FactoryError> {
        self.build_with(&[])
    }

    /// Produce one synthetic person with extra states applied after the
    /// factory's own, sharing this factory's unique sequence.
    pub fn build_with(&mut self, extra: &[FactoryState]) -> Result<Person, FactoryError> {
        let n = self.seq.next()?;
        let first = FIRST_NAMES[self.rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[self.rng.gen_range(0..LAST_NAMES.len())];
        let second = LAST_NAMES[self.rng.gen_range(0..LAST_NAMES.len())];

        let mut attrs = serde_json::json!({
            "name": first,
            "lastName": last,
            "secondLastName": second,
            "nationalId": format!("{}", NATIONAL_ID_BASE + n),
            "email": format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), n),
            "phone": format!("+51 9{:08}", self.rng.gen_range(0..100_000_000u64)),
            "status": "Activo",
            "personTypeId": 1,
            "active": true,
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        for state in self.states.iter().chain(extra) {
            state.apply(&mut attrs);
        }

        let mut person: Person = serde_json::from_value(serde_json::Value::Object(attrs))
            .map_err(|e| FactoryError::Shape { entity: "person", message: e.to_string() })?;
        person.id = new_id();
        let now = now_rfc3339();
        person.created_at = now.clone();
        person.updated_at = now;
        Ok(person)
    }

    /// Produce `count` synthetic persons.
    pub fn build_many(&mut self, count: usize) -> Result<Vec<Person>, FactoryError> {
        (0..count).map(|_| self.build()).collect()
    }
}

impl Default for PersonFactory {
    fn default() -> Self {
        Self::new()
    }
}
