//! Rival persona generation.
//!
//! Stands in for the AI generator: a name from the personality's pool, a
//! fixed archetype, and a taunt that calls out one of the user's quests.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Personality;

const MAX_NAME_LEN: usize = 50;
const MAX_ARCHETYPE_LEN: usize = 30;
const MAX_TAUNT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub archetype: String,
    pub taunt: String,
}

pub fn name_pool(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Competitive => &["Blaze", "Storm", "Fury", "Apex", "Titan"],
        Personality::Encouraging => &["Hope", "Dawn", "Sage", "Light", "Grace"],
        Personality::Mystical => &["Rune", "Oracle", "Mystic", "Shadow", "Void"],
        Personality::Warrior => &["Blade", "Steel", "Honor", "Valor", "Knight"],
        Personality::Trickster => &["Jinx", "Trick", "Riddle", "Chaos", "Jest"],
    }
}

fn archetype(personality: Personality) -> &'static str {
    match personality {
        Personality::Competitive => "Berserker",
        Personality::Encouraging => "Paladin",
        Personality::Mystical => "Mage",
        Personality::Warrior => "Warrior",
        Personality::Trickster => "Rogue",
    }
}

fn taunt(personality: Personality, quest: Option<&str>) -> String {
    match (personality, quest) {
        (Personality::Competitive, Some(q)) => {
            format!("You call '{q}' a streak? I'll finish mine before you wake!")
        }
        (Personality::Encouraging, Some(q)) => {
            format!("Every day of '{q}' counts. Let's both level up today!")
        }
        (Personality::Mystical, Some(q)) => {
            format!("The runes foretell '{q}' broken by dusk... prove them wrong.")
        }
        (Personality::Warrior, Some(q)) => {
            format!("Honor demands '{q}' be done. My blade is already drawn.")
        }
        (Personality::Trickster, Some(q)) => {
            format!("Bet you skip '{q}' today. Go on, surprise me!")
        }
        (p, None) => format!("A {p} rival challenges you to greatness!"),
    }
}

/// Build a persona for `personality`, drawing on the user's recent quests.
pub fn generate<R: Rng + ?Sized>(
    personality: Personality,
    recent_quests: &[String],
    rng: &mut R,
) -> Persona {
    let name = name_pool(personality)
        .choose(rng)
        .copied()
        .unwrap_or("Rival");
    let quest = recent_quests.choose(rng).map(String::as_str);

    Persona {
        name: truncate(name, MAX_NAME_LEN),
        archetype: truncate(archetype(personality), MAX_ARCHETYPE_LEN),
        taunt: truncate(&taunt(personality, quest), MAX_TAUNT_LEN),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
