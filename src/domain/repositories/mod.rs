pub mod prediction_repository;
