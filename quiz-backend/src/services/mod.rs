pub mod ai_service;
pub mod attempt_service;
pub mod extract_service;
pub mod grading_service;
pub mod leaderboard_service;
pub mod quiz_service;
