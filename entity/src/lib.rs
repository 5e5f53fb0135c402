pub mod audio_training_files;
pub mod users;
