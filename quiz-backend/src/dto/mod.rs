pub mod leaderboard_dto;
pub mod pagination;
pub mod quiz_dto;
pub mod user_quiz_dto;
