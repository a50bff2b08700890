pub mod code_sequence_repository;

pub use code_sequence_repository::CodeSequenceRepositoryImpl;
