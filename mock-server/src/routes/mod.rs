pub mod health;
pub mod payments;
pub mod quests;
pub mod rivals;
