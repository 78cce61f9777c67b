pub mod quiz;
pub mod user_quiz;
