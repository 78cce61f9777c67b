pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;
pub use store::QuizStore;
