pub mod diarize;
